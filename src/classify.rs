//! Per-region cell selection, endpoint attribution and classification.

use ahash::AHashMap;
use geo::{BoundingRect, MultiPolygon, Point, Rect};
use rayon::prelude::*;
use serde::Serialize;
use smallvec::SmallVec;

use crate::{geom, grid::Grid};

/// Mutually exclusive state of a cell within one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// No endpoint and no exclusion-zone overlap.
    Empty,
    /// Contains at least one endpoint.
    HasEndpoint,
    /// Overlaps the exclusion union and contains no endpoint.
    DeadZone,
}

/// A grid tile as seen from one region. The same tile appears once per region it intersects.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// 1-based, sequential within the region.
    pub id: u32,
    pub region: usize,
    /// Index into [`Grid::tiles`].
    pub tile: usize,
    pub classification: Classification,
    /// Redundant coverage: several endpoints, or a single priority-class one.
    pub resilient: bool,
    /// Indices of the endpoints this cell contains.
    pub endpoints: SmallVec<[usize; 4]>,
}

impl GridCell {
    #[inline] pub fn is_resilience_zone(&self) -> bool { self.resilient }
}

/// Planar snapshot of everything the classifier reads.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub regions: Vec<MultiPolygon<f64>>,
    pub exclusion: Option<MultiPolygon<f64>>,
    pub endpoints: Vec<Point<f64>>,
    /// Priority-class flag per entry of `endpoints`.
    pub priority: Vec<bool>,
    pub prospective: Vec<Point<f64>>,
}

/// Classification output for one region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionCells {
    pub region: usize,
    pub cells: Vec<GridCell>,
    /// Endpoints strictly inside the region.
    pub endpoints: Vec<usize>,
    /// Prospective endpoints strictly inside the region.
    pub prospective: Vec<usize>,
}

/// Decide a cell's classification and resilience flag from the priority flags
/// of the endpoints it contains. Endpoints always win over the exclusion zone.
pub fn decide(contained: &[bool], intersects_exclusion: bool) -> (Classification, bool) {
    let classification = if !contained.is_empty() {
        Classification::HasEndpoint
    } else if intersects_exclusion {
        Classification::DeadZone
    } else {
        Classification::Empty
    };
    let resilient = contained.len() > 1 || contained == [true];
    (classification, resilient)
}

/// Classify every region's cells. Regions run in parallel; output order matches `scene.regions`.
pub fn classify(grid: &Grid, scene: &Scene) -> Vec<RegionCells> {
    (0..scene.regions.len()).into_par_iter()
        .map(|region| classify_region(region, grid, scene))
        .collect()
}

/// Indices of `points` strictly inside `boundary`.
fn points_within(boundary: &MultiPolygon<f64>, points: &[Point<f64>]) -> Vec<usize> {
    points.iter().enumerate()
        .filter(|(_, point)| geom::contains(boundary, point))
        .map(|(i, _)| i)
        .collect()
}

/// Find which selected tile owns `point`, returned as a position in the selection.
/// The tile index under the point is tried first; the R-tree scan only
/// matters when rounding puts the point just outside that tile.
fn owner(grid: &Grid, selected: &AHashMap<usize, usize>, point: &Point<f64>) -> Option<usize> {
    let covers = |tile: usize| grid.get(tile).is_some_and(|t| geom::covers(&t.planar, point));

    if let Some(tile) = grid.tile_of(point).and_then(|index| grid.tile_at(index)) {
        if covers(tile) { return selected.get(&tile).copied() }
    }

    grid.candidates(&Rect::new(point.0, point.0)).into_iter()
        .filter(|tile| selected.contains_key(tile))
        .find(|&tile| covers(tile))
        .and_then(|tile| selected.get(&tile).copied())
}

/// Classify the cells of a single region.
pub fn classify_region(region: usize, grid: &Grid, scene: &Scene) -> RegionCells {
    let boundary = &scene.regions[region];
    let mut out = RegionCells {
        region,
        endpoints: points_within(boundary, &scene.endpoints),
        prospective: points_within(boundary, &scene.prospective),
        ..Default::default()
    };
    let Some(rect) = boundary.bounding_rect() else { return out };

    let selected = grid.candidates(&rect).into_iter()
        .filter(|&tile| geom::intersects(&grid.tiles()[tile].planar, boundary))
        .collect::<Vec<_>>();
    let position = selected.iter().enumerate()
        .map(|(pos, &tile)| (tile, pos))
        .collect::<AHashMap<_, _>>();

    let mut contained = vec![SmallVec::<[usize; 4]>::new(); selected.len()];
    for &endpoint in &out.endpoints {
        if let Some(pos) = owner(grid, &position, &scene.endpoints[endpoint]) {
            contained[pos].push(endpoint);
        }
    }

    out.cells = selected.iter().zip(contained).enumerate()
        .map(|(n, (&tile, endpoints))| {
            let priorities = endpoints.iter().map(|&e| scene.priority[e]).collect::<SmallVec<[bool; 4]>>();
            let in_exclusion = endpoints.is_empty() && scene.exclusion.as_ref()
                .is_some_and(|zone| geom::intersects(&grid.tiles()[tile].planar, zone));
            let (classification, resilient) = decide(&priorities, in_exclusion);
            GridCell { id: n as u32 + 1, region, tile, classification, resilient, endpoints }
        })
        .collect();

    tracing::debug!(region, cells = out.cells.len(), endpoints = out.endpoints.len(), "classified region");
    out
}
