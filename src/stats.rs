//! Per-region coverage counts and derived ratios.

use serde::Serialize;

use crate::classify::{Classification, RegionCells};

/// Cell and endpoint counts for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionStatistics {
    pub region: usize,
    pub name: String,
    pub total_cells: usize,
    pub valid_cells: usize,
    pub cells_with_endpoint: usize,
    pub dead_zone_cells: usize,
    pub resilience_cells: usize,
    pub total_endpoints: usize,
    pub total_prospective: usize,
}

/// `part / whole` as a percentage rounded to the nearest integer, ties to even; `0` when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 { return 0 }
    (part as f64 / whole as f64 * 100.0).round_ties_even() as u32
}

impl RegionStatistics {
    /// Count one region's classified cells.
    pub fn from_cells(name: impl Into<String>, cells: &RegionCells) -> Self {
        let count = |class: Classification| cells.cells.iter()
            .filter(|cell| cell.classification == class)
            .count();

        let total_cells = cells.cells.len();
        let dead_zone_cells = count(Classification::DeadZone);

        Self {
            region: cells.region,
            name: name.into(),
            total_cells,
            valid_cells: total_cells - dead_zone_cells,
            cells_with_endpoint: count(Classification::HasEndpoint),
            dead_zone_cells,
            resilience_cells: cells.cells.iter().filter(|cell| cell.resilient).count(),
            total_endpoints: cells.endpoints.len(),
            total_prospective: cells.prospective.len(),
        }
    }

    /// Percentage of valid cells that contain an endpoint.
    #[inline] pub fn coverage_ratio(&self) -> u32 { percent(self.cells_with_endpoint, self.valid_cells) }

    /// Percentage of valid cells flagged as resilience zones.
    #[inline] pub fn resilience_ratio(&self) -> u32 { percent(self.resilience_cells, self.valid_cells) }
}

/// Build statistics for every region, in the order of `classified`.
/// `names[i]` must name region `i`.
pub fn aggregate(names: &[String], classified: &[RegionCells]) -> Vec<RegionStatistics> {
    classified.iter()
        .map(|cells| RegionStatistics::from_cells(names[cells.region].clone(), cells))
        .collect()
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;
    use crate::classify::GridCell;

    fn cell(id: u32, classification: Classification, resilient: bool) -> GridCell {
        GridCell { id, region: 0, tile: id as usize, classification, resilient, endpoints: smallvec![] }
    }

    #[test]
    fn percent_rounds_and_guards_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(1, 4), 25);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 12);
        assert_eq!(percent(5, 8), 62);
        assert_eq!(percent(3, 8), 38);
        assert_eq!(percent(7, 7), 100);
    }

    #[test]
    fn counts_split_by_classification() {
        let cells = RegionCells {
            region: 0,
            cells: vec![
                cell(1, Classification::HasEndpoint, true),
                cell(2, Classification::HasEndpoint, false),
                cell(3, Classification::DeadZone, false),
                cell(4, Classification::Empty, false),
                cell(5, Classification::Empty, false),
            ],
            endpoints: vec![0, 1, 2],
            prospective: vec![4],
        };
        let stats = RegionStatistics::from_cells("Moema", &cells);
        assert_eq!(stats.total_cells, 5);
        assert_eq!(stats.dead_zone_cells, 1);
        assert_eq!(stats.valid_cells, 4);
        assert_eq!(stats.cells_with_endpoint, 2);
        assert_eq!(stats.resilience_cells, 1);
        assert_eq!(stats.total_endpoints, 3);
        assert_eq!(stats.total_prospective, 1);
        assert_eq!(stats.coverage_ratio(), 50);
        assert_eq!(stats.resilience_ratio(), 25);
    }

    #[test]
    fn aggregate_keeps_region_order() {
        let names = vec!["b".to_string(), "a".to_string()];
        let classified = vec![
            RegionCells { region: 0, ..Default::default() },
            RegionCells { region: 1, ..Default::default() },
        ];
        let stats = aggregate(&names, &classified);
        assert_eq!(stats.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(stats.iter().all(|s| s.coverage_ratio() == 0 && s.resilience_ratio() == 0));
    }
}
