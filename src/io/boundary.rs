use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::{config::BoundaryConfig, error::EngineError, types::BoundarySet};

use super::shp;

/// Load a boundary file and split its features into regions and exclusion zones.
/// The format is chosen by extension: `.shp`, or `.geojson`/`.json`.
pub fn read_boundaries(path: &Path, config: &BoundaryConfig) -> Result<BoundarySet> {
    let extension = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let features = match extension.as_str() {
        "shp" => shp::read_labelled_polygons(path, &config.label_field)?,
        "geojson" | "json" => {
            let bytes = fs::read(path)
                .with_context(|| format!("[io::boundary] Failed to read {}", path.display()))?;
            parse_geojson_features(&bytes, &config.label_field)
                .with_context(|| format!("[io::boundary] Failed to parse {}", path.display()))?
        }
        other => return Err(EngineError::InvalidConfiguration(
            format!("unsupported boundary format {other:?} for {}", path.display())
        ).into()),
    };

    let set = BoundarySet::from_features(&path.display().to_string(), features, &config.exclusion_prefix);
    for warning in &set.warnings {
        tracing::warn!(%warning, "boundary features dropped");
    }
    tracing::info!(
        regions = set.regions.len(),
        exclusion_zones = set.exclusion_zones.len(),
        path = %path.display(),
        "loaded boundaries"
    );
    Ok(set)
}

/// Parse a GeoJSON FeatureCollection (or a single Feature) into `(label, polygon)` pairs.
/// Unlabelled features come back with an empty geometry whatever their type.
pub fn parse_geojson_features(bytes: &[u8], label_field: &str) -> Result<Vec<(Option<String>, MultiPolygon<f64>)>> {
    let value: Value = serde_json::from_slice(bytes).context("[io::boundary] Invalid JSON")?;

    let features = match value["type"].as_str() {
        Some("FeatureCollection") => value["features"].as_array()
            .ok_or_else(|| anyhow!("[io::boundary] FeatureCollection has no features array"))?
            .iter().collect::<Vec<_>>(),
        Some("Feature") => vec![&value],
        other => return Err(anyhow!("[io::boundary] Expected a FeatureCollection, found {other:?}")),
    };

    features.into_iter()
        .map(|feature| -> Result<(Option<String>, MultiPolygon<f64>)> {
            let label = feature_label(&feature["properties"][label_field]);
            let Some(label) = label else { return Ok((None, MultiPolygon(vec![]))) };
            let polygon = parse_geometry(&feature["geometry"])
                .with_context(|| format!("[io::boundary] Feature {label:?}"))?;
            Ok((Some(label), polygon))
        })
        .collect()
}

/// Labels are strings; numeric labels are accepted and printed as-is.
fn feature_label(value: &Value) -> Option<String> {
    let label = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!label.is_empty()).then_some(label)
}

/// Parse a Polygon or MultiPolygon geometry object.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let kind = geometry["type"].as_str().unwrap_or("null");
    let coords = geometry["coordinates"].as_array();

    match (kind, coords) {
        ("Polygon", Some(rings)) => Ok(MultiPolygon(vec![parse_polygon(rings)?])),
        ("MultiPolygon", Some(polygons)) => Ok(MultiPolygon(
            polygons.iter()
                .map(|p| p.as_array()
                    .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))
                    .and_then(|rings| parse_polygon(rings)))
                .collect::<Result<Vec<_>>>()?
        )),
        ("Polygon" | "MultiPolygon", None) => Err(anyhow!("Invalid {kind}: missing coordinates")),
        _ => Err(EngineError::InvalidGeometry(format!("unsupported geometry type {kind}")).into()),
    }
}

/// Parse `[exterior, hole, hole, ...]`.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter()
        .map(|ring| ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring is not an array"))
            .and_then(|coords| parse_ring(coords)));

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of `[x, y]` positions, closing it if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|position| -> Result<Coord<f64>> {
            let x = position[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = position[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    Ok(LineString(points))
}
