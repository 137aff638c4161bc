use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{engine::CoverageReport, error::DataIntegrityWarning, stats::RegionStatistics};

/// One region's statistics with its derived ratios.
#[derive(Debug, Clone, Serialize)]
pub struct RegionSummary<'a> {
    #[serde(flatten)]
    pub statistics: &'a RegionStatistics,
    pub display_name: String,
    pub coverage_ratio: u32,
    pub resilience_ratio: u32,
}

/// Machine-readable statistics for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct StatsDocument<'a> {
    pub step: f64,
    pub total_cells: usize,
    pub endpoints: usize,
    pub endpoints_in_regions: usize,
    pub prospective: usize,
    pub prospective_in_regions: usize,
    pub regions: Vec<RegionSummary<'a>>,
    pub warnings: &'a [DataIntegrityWarning],
}

impl<'a> StatsDocument<'a> {
    pub fn new(report: &'a CoverageReport) -> Self {
        Self {
            step: report.grid.step(),
            total_cells: report.grid.len(),
            endpoints: report.endpoints.len(),
            endpoints_in_regions: report.endpoints_in_any_region().len(),
            prospective: report.prospective.len(),
            prospective_in_regions: report.prospective_in_any_region().len(),
            regions: report.statistics.iter()
                .map(|statistics| RegionSummary {
                    statistics,
                    display_name: super::display_name(&statistics.name),
                    coverage_ratio: statistics.coverage_ratio(),
                    resilience_ratio: statistics.resilience_ratio(),
                })
                .collect(),
            warnings: &report.warnings,
        }
    }
}

/// Write the statistics document as pretty JSON to any writer.
pub fn write_stats_json<W: Write>(writer: W, report: &CoverageReport) -> Result<()> {
    serde_json::to_writer_pretty(writer, &StatsDocument::new(report))
        .context("[report::json] Failed to serialize statistics")
}

/// Write the statistics document to `path`.
pub fn write_stats_file(path: &Path, report: &CoverageReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[report::json] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_stats_json(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
