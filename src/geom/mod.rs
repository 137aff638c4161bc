//! Planar geometry helpers: projection, boolean operations and predicates.
mod bbox;
mod ops;
mod proj;

pub(crate) use bbox::BoundingBox;
pub use ops::{bounds, contains, covers, intersection, intersects, union, validate_polygon};
pub use proj::{Crs, Projector};
