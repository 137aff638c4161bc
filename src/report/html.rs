//! Interactive Leaflet map with a per-region legend.

use std::{fmt::{self, Write as _}, fs, path::Path};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::{classify::Classification, config::MapView, engine::CoverageReport, stats::RegionStatistics};

use super::{color, display_name, escape, to_geojson};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// One legend card: `<Name> - ILT <coverage>%` followed by the counts.
fn legend_card(out: &mut String, stats: &RegionStatistics) -> fmt::Result {
    write!(out, r#"
    <div class="card">
        <div class="card-title">{name} - <span class="ilt">ILT {coverage}%</span></div>
        <div class="card-body">
            <b>Valid cells:</b> {valid}<br>
            <b>With endpoint:</b> {with_endpoint}<br>
            <b>Dead zone:</b> {dead}<br>
            <b>Resilience:</b> {resilience}%<br>
            <b>Endpoints:</b> {endpoints} (prospective {prospective})
        </div>
    </div>"#,
        name = escape(&display_name(&stats.name)),
        coverage = stats.coverage_ratio(),
        valid = stats.valid_cells,
        with_endpoint = stats.cells_with_endpoint,
        dead = stats.dead_zone_cells,
        resilience = stats.resilience_ratio(),
        endpoints = stats.total_endpoints,
        prospective = stats.total_prospective,
    )
}

fn legend(report: &CoverageReport) -> Result<String, fmt::Error> {
    let mut out = String::from(r##"<div id="legend">
    <div class="close"><a href="#" onclick="document.getElementById('legend').style.display='none'; return false;">&#x2716;</a></div>
    <h4>Coverage by region</h4>"##);
    for stats in &report.statistics {
        legend_card(&mut out, stats)?;
    }
    out.push_str("\n</div>");
    Ok(out)
}

/// Cell fill per classification name, `null` for unfilled cells.
fn fill_table() -> Result<Value> {
    let mut table = Map::new();
    for classification in [Classification::Empty, Classification::HasEndpoint, Classification::DeadZone] {
        let Value::String(name) = serde_json::to_value(classification)? else { continue };
        let fill = color::cell_fill(classification).map(|c| Value::String(c.to_string()));
        table.insert(name, fill.unwrap_or(Value::Null));
    }
    Ok(Value::Object(table))
}

/// Render the full HTML page.
pub fn to_html(report: &CoverageReport, view: &MapView) -> Result<String> {
    // Keep the embedded JSON from closing the script element.
    let data = serde_json::to_string(&to_geojson(report))
        .context("[report::html] Failed to serialize map data")?
        .replace("</", "<\\/");

    Ok(format!(r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Coverage grid</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<script src="{LEAFLET_JS}"></script>
<style>
    html, body, #map {{ width: 100%; height: 100%; margin: 0; padding: 0; }}
    #legend {{
        position: fixed; top: 15px; left: 15px; z-index: 9999; width: 300px;
        max-height: 700px; overflow-y: auto; padding: 15px; border-radius: 10px;
        background-color: rgba(255, 255, 255, 0.96); box-shadow: 0 4px 8px rgba(0,0,0,0.3);
        font-family: 'Segoe UI', sans-serif;
    }}
    #legend .close {{ text-align: right; margin-top: -10px; }}
    #legend .close a {{ text-decoration: none; font-weight: bold; color: #666; }}
    #legend h4 {{ margin: 5px 0 15px 0; color: #333; font-size: 16px; }}
    #legend .card {{ background: #f9f9f9; border-radius: 8px; padding: 10px 12px; margin-bottom: 10px; border-left: 5px solid #4caf50; }}
    #legend .card-title {{ font-size: 15px; font-weight: 600; margin-bottom: 6px; }}
    #legend .ilt {{ color: #000000; font-weight: 500; }}
    #legend .card-body {{ font-size: 13px; color: #333; }}
    .cell-id {{ color: {label}; font-size: 9px; font-weight: bold; white-space: nowrap; }}
</style>
</head>
<body>
<div id="map"></div>
{legend}
<script>
const data = {data};
const of = (layer) => ({{ type: "FeatureCollection", features: data.features.filter(f => f.properties.layer === layer) }});
const fills = {fills};

const map = L.map("map").setView([{lat}, {lng}], {zoom});
L.tileLayer("{tiles}", {{ attribution: "{attribution}", maxZoom: 19 }}).addTo(map);

const regions = L.geoJSON(of("region"), {{
    style: {{ color: "{region}", weight: 2, fillOpacity: 0 }},
    onEachFeature: (f, l) => l.bindTooltip(f.properties.name),
}});
const deadZones = L.geoJSON(of("dead_zone"), {{
    style: {{ color: "{zone}", weight: 2, fillColor: "{dead}", fillOpacity: 0.4 }},
    onEachFeature: (f, l) => l.bindTooltip(f.properties.name),
}});
const cells = L.geoJSON(of("cell"), {{
    style: (f) => {{
        const fill = fills[f.properties.classification];
        return {{ color: "{cell}", weight: 1, fillColor: fill || "#ffffff", fillOpacity: fill ? 0.5 : 0 }};
    }},
    onEachFeature: (f, l) => l.bindTooltip(f.properties.region + " #" + f.properties.id),
}});
const cellIds = L.layerGroup(cells.getLayers().map(l => L.marker(l.getBounds().getCenter(), {{
    interactive: false,
    icon: L.divIcon({{ className: "", html: "<div class='cell-id'>" + l.feature.properties.id + "</div>" }}),
}})));
const marker = (color) => (f, latlng) => L.circleMarker(latlng, {{ radius: 5, color: color, fillColor: color, fillOpacity: 0.6 }});
const labelled = (f, l) => {{ if (f.properties.label) l.bindTooltip(f.properties.label); }};
const endpoints = of("endpoint");
const priority = L.geoJSON({{ type: "FeatureCollection", features: endpoints.features.filter(f => f.properties.priority) }},
    {{ pointToLayer: marker("{priority}"), onEachFeature: labelled }});
const others = L.geoJSON({{ type: "FeatureCollection", features: endpoints.features.filter(f => !f.properties.priority) }},
    {{ pointToLayer: marker("{other}"), onEachFeature: labelled }});
const prospective = L.geoJSON(of("prospective"), {{ pointToLayer: marker("{prospective}"), onEachFeature: labelled }});

[regions, cells, cellIds, priority, others].forEach(l => l.addTo(map));
L.control.layers(null, {{
    "Regions": regions,
    "Dead zones": deadZones,
    "Grid cells": cells,
    "Cell numbers": cellIds,
    "Priority endpoints": priority,
    "Other endpoints": others,
    "Prospective endpoints": prospective,
}}, {{ collapsed: false }}).addTo(map);
</script>
</body>
</html>
"##,
        legend = legend(report).context("[report::html] Failed to format legend")?,
        fills = fill_table()?,
        lat = view.center[0],
        lng = view.center[1],
        zoom = view.zoom,
        tiles = view.tiles.replace('"', "\\\""),
        attribution = view.attribution.replace('"', "\\\""),
        label = color::CELL_LABEL,
        dead = color::DEAD_ZONE,
        region = color::REGION_OUTLINE,
        zone = color::ZONE_OUTLINE,
        cell = color::CELL_OUTLINE,
        priority = color::PRIORITY_ENDPOINT,
        other = color::ENDPOINT,
        prospective = color::PROSPECTIVE_ENDPOINT,
    ))
}

/// Render the page to `path`.
pub fn write_html(path: &Path, report: &CoverageReport, view: &MapView) -> Result<()> {
    fs::write(path, to_html(report, view)?)
        .with_context(|| format!("[report::html] Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use geo::{Coord, MultiPolygon, Rect};

    use super::*;
    use crate::{config::GridConfig, engine::analyze, geom::Crs, types::{BoundarySet, Endpoint}};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 }).to_polygon()])
    }

    fn report() -> CoverageReport {
        let boundaries = BoundarySet::from_features("test", vec![
            (Some("VILA_MARIANA".into()), square(0.0, 0.0, 400.0, 400.0)),
            (Some("Moema".into()), square(600.0, 0.0, 1000.0, 400.0)),
        ], "ZM");
        let endpoints = vec![Endpoint::new(100.0, 100.0, true).with_label("</script>")];
        analyze(&GridConfig { step: 200.0, projection: Crs::Planar }, boundaries, endpoints, vec![]).unwrap()
    }

    #[test]
    fn legend_has_one_card_per_region_in_order() {
        let html = to_html(&report(), &MapView::default()).unwrap();
        assert_eq!(html.matches(r#"<div class="card">"#).count(), 2);
        let first = html.find("Vila Mariana - <span class=\"ilt\">ILT 25%</span>").unwrap();
        let second = html.find("Moema - <span class=\"ilt\">ILT 0%</span>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn page_embeds_view_and_escapes_script_data() {
        let view = MapView { center: [1.5, -2.5], zoom: 12, ..MapView::default() };
        let html = to_html(&report(), &view).unwrap();
        assert!(html.contains("setView([1.5, -2.5], 12)"));
        assert!(html.contains("basemaps.cartocdn.com"));
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("<\\/script>"));
    }

    #[test]
    fn cell_fills_follow_the_palette() {
        let table = fill_table().unwrap();
        assert_eq!(table["has_endpoint"], "#66cc66");
        assert_eq!(table["dead_zone"], "#666666");
        assert!(table["empty"].is_null());

        let html = to_html(&report(), &MapView::default()).unwrap();
        assert!(html.contains(r##"const fills = {"dead_zone":"#666666","empty":null,"has_endpoint":"#66cc66"};"##));
    }

    #[test]
    fn empty_report_still_renders() {
        let report = analyze(&GridConfig::default(), BoundarySet::default(), vec![], vec![]).unwrap();
        let file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        write_html(file.path(), &report, &MapView::default()).unwrap();
        let html = fs::read_to_string(file.path()).unwrap();
        assert!(html.contains(r#"<div id="legend">"#));
        assert!(!html.contains(r#"<div class="card">"#));
    }
}
