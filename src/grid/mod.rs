//! Fixed-step square grid clipped to the region union.

use ahash::AHashMap;
use geo::{BoundingRect, Coord, MultiPolygon, Point, Rect};
use rstar::RTree;

use crate::{error::EngineError, geom::{self, BoundingBox, Projector}};

/// Column/row of a tile, counted from the lower-left corner of the grid extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    pub col: u32,
    pub row: u32,
}

/// One clipped grid cell geometry, in both coordinate systems.
#[derive(Debug, Clone)]
pub struct GridTile {
    pub index: TileIndex,
    pub planar: MultiPolygon<f64>,
    pub geographic: MultiPolygon<f64>,
}

/// The tiled region union. Tiles are ordered column-major (x outer, y inner).
#[derive(Debug, Clone)]
pub struct Grid {
    origin: Coord<f64>,
    step: f64,
    tiles: Vec<GridTile>,
    lookup: AHashMap<TileIndex, usize>,
    rtree: RTree<BoundingBox>,
}

/// Number of tiles of size `step` starting at `min` whose left edge is below `max`.
fn tile_count(min: f64, max: f64, step: f64) -> u32 {
    let mut n = 0;
    while min + n as f64 * step < max { n += 1 }
    n
}

impl Grid {
    /// Tile `union` (planar) with squares of side `step` anchored at its
    /// lower-left bounding corner, clip each square to the union and keep the
    /// non-empty pieces. The last row and column may be partial squares.
    pub fn generate(union: &MultiPolygon<f64>, step: f64, projector: &Projector) -> Result<Self, EngineError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!("grid step must be positive, got {step}")))
        }
        geom::validate_polygon(union, "region union")?;

        let bbox = union.bounding_rect()
            .ok_or_else(|| EngineError::InvalidGeometry("region union has no extent".into()))?;
        let origin = bbox.min();
        let columns = tile_count(origin.x, bbox.max().x, step);
        let rows = tile_count(origin.y, bbox.max().y, step);

        let mut tiles = Vec::new();
        for col in 0..columns {
            let x = origin.x + col as f64 * step;
            for row in 0..rows {
                let y = origin.y + row as f64 * step;
                let square = MultiPolygon(vec![
                    Rect::new(Coord { x, y }, Coord { x: x + step, y: y + step }).to_polygon()
                ]);
                if !geom::intersects(&square, union) { continue }
                let Some(planar) = geom::intersection(&square, union) else { continue };

                tiles.push(GridTile {
                    index: TileIndex { col, row },
                    geographic: projector.to_geographic(&planar)?,
                    planar,
                });
            }
        }

        tracing::debug!(columns, rows, kept = tiles.len(), step, "generated grid");
        Ok(Self::from_tiles(origin, step, tiles))
    }

    /// A grid with no tiles, used when there are no regions.
    pub fn empty(step: f64) -> Self {
        Self::from_tiles(Coord { x: 0.0, y: 0.0 }, step, Vec::new())
    }

    fn from_tiles(origin: Coord<f64>, step: f64, tiles: Vec<GridTile>) -> Self {
        let lookup = tiles.iter().enumerate()
            .map(|(i, tile)| (tile.index, i))
            .collect();
        let rtree = RTree::bulk_load(
            tiles.iter().enumerate()
                .filter_map(|(i, tile)| tile.planar.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                .collect()
        );
        Self { origin, step, tiles, lookup, rtree }
    }

    #[inline] pub fn len(&self) -> usize { self.tiles.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.tiles.is_empty() }

    #[inline] pub fn tiles(&self) -> &[GridTile] { &self.tiles }

    #[inline] pub fn get(&self, idx: usize) -> Option<&GridTile> { self.tiles.get(idx) }

    #[inline] pub fn step(&self) -> f64 { self.step }

    /// Lower-left corner of the grid extent, in planar coordinates.
    #[inline] pub fn origin(&self) -> Coord<f64> { self.origin }

    /// Tile a planar point falls in. Tiles own their left and bottom edges,
    /// so a point on a shared edge maps to exactly one tile.
    pub fn tile_of(&self, point: &Point<f64>) -> Option<TileIndex> {
        let col = ((point.x() - self.origin.x) / self.step).floor();
        let row = ((point.y() - self.origin.y) / self.step).floor();
        if !(col >= 0.0 && row >= 0.0 && col <= u32::MAX as f64 && row <= u32::MAX as f64) { return None }
        Some(TileIndex { col: col as u32, row: row as u32 })
    }

    /// Position of a kept tile in [`Grid::tiles`].
    #[inline] pub fn tile_at(&self, index: TileIndex) -> Option<usize> { self.lookup.get(&index).copied() }

    /// Indices of tiles whose bounding boxes intersect `rect`, in ascending order.
    pub fn candidates(&self, rect: &Rect<f64>) -> Vec<usize> {
        let mut found = self.rtree
            .locate_in_envelope_intersecting(&BoundingBox::envelope_of(rect))
            .map(|bbox| bbox.idx())
            .collect::<Vec<_>>();
        found.sort_unstable();
        found
    }
}
