use std::path::Path;

use anyhow::{Context, Result};
use geo::MultiPolygon;
use shapefile::{self as shp, dbase::{FieldValue, Record}, Reader, Shape};

use crate::error::EngineError;

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>
pub(super) fn shp_to_geo(p: &shp::Polygon) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<geo::Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0])
        }
    }

    /// Get the signed area of a geo::Coord list (negative for clockwise)
    fn signed_area(pts: &[geo::Coord<f64>]) -> f64 {
        pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
    }

    // Shapefile stores each exterior (clockwise) followed by its holes.
    let mut polys = Vec::new();
    let mut exterior: Option<geo::LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in p.rings() {
        let mut coords = ring.points().iter().map(|pt| geo::Coord { x: pt.x, y: pt.y }).collect::<Vec<_>>();
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let ls = geo::LineString(coords);

        if is_exterior {
            if let Some(ext) = exterior.take() {
                polys.push(geo::Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ls);
        } else {
            holes.push(ls);
        }
    }
    if let Some(ext) = exterior {
        polys.push(geo::Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

/// Get the trimmed text of a character field, if present and non-null.
fn character_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Some(s.trim().to_string()),
        Some(FieldValue::Memo(s)) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Read every `(label, polygon)` pair from a `.shp` file (with its `.dbf`).
/// Unlabelled shapes of any type are returned with an empty geometry so the
/// caller can count them; labelled non-polygon shapes are an error.
pub(super) fn read_labelled_polygons(path: &Path, label_field: &str) -> Result<Vec<(Option<String>, MultiPolygon<f64>)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record from {}", path.display()))?;
        let label = character_field(&record, label_field).filter(|l| !l.is_empty());

        let polygon = match (shape, &label) {
            (Shape::Polygon(polygon), _) => shp_to_geo(&polygon),
            (_, None) => MultiPolygon(vec![]),
            (other, Some(label)) => return Err(EngineError::InvalidGeometry(
                format!("feature {label:?} has unsupported shape type {:?}", other.shapetype())
            ).into()),
        };
        items.push((label, polygon));
    }
    Ok(items)
}
