use std::path::PathBuf;

use anyhow::Result;
use covergrid::report;

use super::{load_config, run_engine};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let config = load_config(&args.input)?;
    let out_path = args.output.clone().unwrap_or_else(|| PathBuf::from("./coverage.html"));

    let report = run_engine(&args.input, &config)?;

    tracing::info!(path = %out_path.display(), "writing map");
    report::write_html(&out_path, &report, &config.map)?;

    if let Some(path) = &args.svg {
        tracing::info!(path = %path.display(), "writing svg");
        report::write_svg_file(path, &report)?;
    }
    if let Some(path) = &args.geojson {
        tracing::info!(path = %path.display(), "writing geojson");
        report::write_geojson(path, &report)?;
    }
    if let Some(path) = &args.stats {
        tracing::info!(path = %path.display(), "writing statistics");
        report::write_stats_file(path, &report)?;
    }

    Ok(())
}
