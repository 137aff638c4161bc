//! End-to-end coverage analysis: projection, grid, classification and statistics.

use crate::{
    classify::{self, GridCell, RegionCells, Scene},
    config::GridConfig,
    error::{DataIntegrityWarning, EngineError},
    geom::{self, Projector},
    grid::{Grid, GridTile},
    stats::{self, RegionStatistics},
    types::{BoundarySet, Endpoint, ExclusionZone, Region},
};

/// Everything a renderer needs, as read-only data.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub regions: Vec<Region>,
    pub exclusion_zones: Vec<ExclusionZone>,
    pub endpoints: Vec<Endpoint>,
    pub prospective: Vec<Endpoint>,
    pub grid: Grid,
    /// One entry per region, in region order.
    pub classified: Vec<RegionCells>,
    /// One entry per region, in region order.
    pub statistics: Vec<RegionStatistics>,
    pub warnings: Vec<DataIntegrityWarning>,
}

impl CoverageReport {
    /// Every classified cell, grouped by region in region order, then by cell id.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.classified.iter().flat_map(|region| region.cells.iter())
    }

    /// Cells selected by one region.
    pub fn cells_of(&self, region: usize) -> &[GridCell] {
        self.classified.get(region).map(|r| r.cells.as_slice()).unwrap_or(&[])
    }

    /// Geometry of a classified cell.
    #[inline] pub fn tile(&self, cell: &GridCell) -> &GridTile { &self.grid.tiles()[cell.tile] }

    /// Endpoints strictly inside one region.
    pub fn endpoints_in(&self, region: usize) -> impl Iterator<Item = &Endpoint> {
        self.classified.get(region).into_iter()
            .flat_map(|r| r.endpoints.iter().map(|&i| &self.endpoints[i]))
    }

    /// Prospective endpoints strictly inside one region.
    pub fn prospective_in(&self, region: usize) -> impl Iterator<Item = &Endpoint> {
        self.classified.get(region).into_iter()
            .flat_map(|r| r.prospective.iter().map(|&i| &self.prospective[i]))
    }

    /// Indices of endpoints inside at least one region, ascending.
    pub fn endpoints_in_any_region(&self) -> Vec<usize> {
        let mut found = self.classified.iter()
            .flat_map(|r| r.endpoints.iter().copied())
            .collect::<Vec<_>>();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Indices of prospective endpoints inside at least one region, ascending.
    pub fn prospective_in_any_region(&self) -> Vec<usize> {
        let mut found = self.classified.iter()
            .flat_map(|r| r.prospective.iter().copied())
            .collect::<Vec<_>>();
        found.sort_unstable();
        found.dedup();
        found
    }
}

/// Run the engine over loaded inputs.
///
/// Zero regions is not an error: the report is empty and no grid is built.
pub fn analyze(
    config: &GridConfig,
    boundaries: BoundarySet,
    endpoints: Vec<Endpoint>,
    prospective: Vec<Endpoint>,
) -> Result<CoverageReport, EngineError> {
    config.validate()?;
    boundaries.check_unique_names()?;

    let extent = boundaries.bounds();
    let BoundarySet { regions, exclusion_zones, warnings } = boundaries;

    if regions.is_empty() {
        tracing::info!("no regions loaded; nothing to classify");
        return Ok(CoverageReport {
            regions,
            exclusion_zones,
            endpoints,
            prospective,
            grid: Grid::empty(config.step),
            classified: Vec::new(),
            statistics: Vec::new(),
            warnings,
        })
    }

    let projector = Projector::new(config.projection, extent)?;
    tracing::debug!(?projector, "projecting inputs");

    let zones = exclusion_zones.iter()
        .map(|zone| projector.to_planar(&zone.boundary))
        .collect::<Result<Vec<_>, _>>()?;

    let scene = Scene {
        regions: regions.iter()
            .map(|region| projector.to_planar(&region.boundary))
            .collect::<Result<_, _>>()?,
        exclusion: geom::union(&zones),
        endpoints: endpoints.iter()
            .map(|e| projector.to_planar(&e.point()))
            .collect::<Result<_, _>>()?,
        priority: endpoints.iter().map(|e| e.is_priority_class).collect(),
        prospective: prospective.iter()
            .map(|e| projector.to_planar(&e.point()))
            .collect::<Result<_, _>>()?,
    };

    let union = geom::union(&scene.regions)
        .ok_or_else(|| EngineError::InvalidGeometry("region union is empty".into()))?;
    let grid = Grid::generate(&union, config.step, &projector)?;
    tracing::info!(regions = regions.len(), cells = grid.len(), step = config.step, "grid generated");

    let classified = classify::classify(&grid, &scene);
    let names = regions.iter().map(|r| r.name.clone()).collect::<Vec<_>>();
    let statistics = stats::aggregate(&names, &classified);

    for s in &statistics {
        tracing::debug!(
            region = %s.name,
            valid = s.valid_cells,
            with_endpoint = s.cells_with_endpoint,
            dead_zone = s.dead_zone_cells,
            coverage = s.coverage_ratio(),
            "region statistics"
        );
    }

    Ok(CoverageReport {
        regions,
        exclusion_zones,
        endpoints,
        prospective,
        grid,
        classified,
        statistics,
        warnings,
    })
}
