use std::{fs, path::Path};

use anyhow::{Context, Result};
use geo::{LineString, MultiPolygon};
use serde_json::{json, Value};

use crate::{engine::CoverageReport, types::Endpoint};

fn ring_coordinates(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

/// Standard GeoJSON MultiPolygon geometry: `[[exterior, hole, ...], ...]`.
pub(super) fn multipolygon_geometry(mp: &MultiPolygon<f64>) -> Value {
    let polygons = mp.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_coordinates)
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();

    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

fn endpoint_feature(layer: &str, index: usize, endpoint: &Endpoint) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [endpoint.lng, endpoint.lat] },
        "properties": {
            "layer": layer,
            "index": index,
            "priority": endpoint.is_priority_class,
            "label": endpoint.label,
        }
    })
}

/// Build a FeatureCollection holding every layer of the report, in drawing order:
/// regions, dead zones, cells, endpoints, prospective endpoints.
/// Each feature carries a `layer` property. Only endpoints inside some region are included.
pub fn to_geojson(report: &CoverageReport) -> Value {
    let regions = report.regions.iter().enumerate().map(|(i, region)| json!({
        "type": "Feature",
        "geometry": multipolygon_geometry(&region.boundary),
        "properties": { "layer": "region", "index": i, "name": region.name }
    }));

    let zones = report.exclusion_zones.iter().map(|zone| json!({
        "type": "Feature",
        "geometry": multipolygon_geometry(&zone.boundary),
        "properties": { "layer": "dead_zone", "name": zone.name }
    }));

    let cells = report.cells().map(|cell| json!({
        "type": "Feature",
        "geometry": multipolygon_geometry(&report.tile(cell).geographic),
        "properties": {
            "layer": "cell",
            "region": report.regions[cell.region].name,
            "id": cell.id,
            "classification": cell.classification,
            "resilient": cell.resilient,
            "endpoints": cell.endpoints.len(),
        }
    }));

    let endpoints = report.endpoints_in_any_region().into_iter()
        .map(|i| endpoint_feature("endpoint", i, &report.endpoints[i]));

    let prospective = report.prospective_in_any_region().into_iter()
        .map(|i| endpoint_feature("prospective", i, &report.prospective[i]));

    let features = regions.chain(zones).chain(cells).chain(endpoints).chain(prospective)
        .collect::<Vec<_>>();

    json!({ "type": "FeatureCollection", "features": features })
}

/// Write [`to_geojson`] to `path`.
pub fn write_geojson(path: &Path, report: &CoverageReport) -> Result<()> {
    let bytes = serde_json::to_vec(&to_geojson(report))
        .context("[report::geojson] Failed to serialize GeoJSON")?;
    fs::write(path, bytes)
        .with_context(|| format!("[report::geojson] Failed to write {}", path.display()))
}
