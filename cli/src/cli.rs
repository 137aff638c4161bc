use std::path::PathBuf;

use covergrid::geom::Crs;

/// Coverage grid CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "covergrid", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Classify the grid and write the interactive map (plus optional exports)
    Render(RenderArgs),

    /// Classify the grid and print per-region statistics as JSON
    Stats(InputArgs),
}

/// Inputs and engine settings shared by every subcommand.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Boundary file with regions and exclusion zones (.geojson, .json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Endpoint table (CSV)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub endpoints: PathBuf,

    /// Prospective endpoint table (CSV, same columns)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub prospective: Option<PathBuf>,

    /// JSON config file; flags below override it
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Cell edge length in projected units (metres)
    #[arg(long)]
    pub step: Option<f64>,

    /// Planar projection used for the grid
    #[arg(long, value_enum)]
    pub projection: Option<Projection>,

    /// Label prefix marking exclusion zones
    #[arg(long)]
    pub exclusion_prefix: Option<String>,

    /// Boundary property holding the feature label
    #[arg(long)]
    pub label_field: Option<String>,

    /// CSV field separator
    #[arg(long)]
    pub separator: Option<char>,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output HTML map, defaults to "./coverage.html"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write a static SVG image
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// Also write every layer as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,

    /// Also write the statistics document as JSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub stats: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Projection {
    WebMercator,
    Utm,
}

impl From<Projection> for Crs {
    fn from(projection: Projection) -> Self {
        match projection {
            Projection::WebMercator => Crs::WebMercator,
            Projection::Utm => Crs::Utm,
        }
    }
}
