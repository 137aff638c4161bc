pub mod render;
pub mod stats;

use anyhow::Result;
use covergrid::{
    config::Config,
    engine::{analyze, CoverageReport},
    io::{read_boundaries, read_points},
};

use crate::cli::InputArgs;

/// Load the config file (if any) and apply flag overrides.
pub(crate) fn load_config(args: &InputArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(step) = args.step { config.grid.step = step }
    if let Some(projection) = args.projection { config.grid.projection = projection.into() }
    if let Some(prefix) = &args.exclusion_prefix { config.boundaries.exclusion_prefix = prefix.clone() }
    if let Some(field) = &args.label_field { config.boundaries.label_field = field.clone() }
    if let Some(separator) = args.separator { config.points.separator = separator }

    config.validate()?;
    Ok(config)
}

/// Read every input and run the engine.
pub(crate) fn run_engine(args: &InputArgs, config: &Config) -> Result<CoverageReport> {
    let boundaries = read_boundaries(&args.boundaries, &config.boundaries)?;
    let mut endpoints = read_points(&args.endpoints, &config.points)?;
    let prospective = match &args.prospective {
        Some(path) => read_points(path, &config.points)?,
        None => Default::default(),
    };

    let mut report = analyze(&config.grid, boundaries, endpoints.endpoints, prospective.endpoints)?;
    report.warnings.append(&mut endpoints.warnings);
    report.warnings.extend(prospective.warnings);
    Ok(report)
}
