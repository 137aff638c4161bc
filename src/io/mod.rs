//! Loaders for boundary files and endpoint tables.
//!
//! - `boundary` - GeoJSON and Shapefile boundaries, split into regions and exclusion zones
//! - `shp` - Shapefile polygon conversion
//! - `points` - CSV endpoint tables

mod boundary;
mod points;
mod shp;

pub use boundary::{parse_geojson_features, read_boundaries};
pub use points::{parse_points, read_points, PointDataset};
