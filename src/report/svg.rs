//! Static SVG rendering of the classified grid.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use geo::{Centroid, Coord, CoordsIter, LineString, MultiPolygon, Rect};

use crate::{engine::CoverageReport, geom};

use super::{color, escape};

const WIDTH: f64 = 1200.0;
const MARGIN: f64 = 10.0;

/// lon/lat -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Write SVG header to any writer.
fn write_svg_header<W: Write>(writer: &mut W, width: f64, height: f64, margin: f64, scale: f64, bounds: Option<&Rect<f64>>) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    match bounds {
        Some(bounds) => writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width}" height="{height}"
        viewBox="0 0 {width} {height}"
        data-lon-min="{lon_min}" data-lon-max="{lon_max}"
        data-lat-min="{lat_min}" data-lat-max="{lat_max}"
        data-margin="{margin}" data-scale="{scale}">"##,
            lon_min = bounds.min().x,
            lon_max = bounds.max().x,
            lat_min = bounds.min().y,
            lat_max = bounds.max().y,
        )?,
        None => writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##)?,
    }
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Write SVG styles for map features.
fn write_svg_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, r##"<defs>
<style>
    .region {{ fill: none; stroke: {region}; stroke-width: 2; vector-effect: non-scaling-stroke; }}
    .zone {{ fill: {dead}; fill-opacity: 0.4; stroke: {zone}; stroke-width: 1.5; }}
    .cell {{ fill: none; stroke: {cell}; stroke-width: 0.5; }}
    .cell.has_endpoint {{ fill: {has}; fill-opacity: 0.5; }}
    .cell.dead_zone {{ fill: {dead}; fill-opacity: 0.5; }}
    .cell-id {{ fill: {label}; font: bold 9px sans-serif; text-anchor: middle; dominant-baseline: central; }}
    .ep {{ fill-opacity: 0.6; }}
</style>
</defs>"##,
        region = color::REGION_OUTLINE,
        zone = color::ZONE_OUTLINE,
        cell = color::CELL_OUTLINE,
        has = color::HAS_ENDPOINT,
        dead = color::DEAD_ZONE,
        label = color::CELL_LABEL,
    )?;
    Ok(())
}

fn write_svg_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();
    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), project, &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, project, &mut out);
        }
    }
    out
}

fn ring_to_path(ring: &LineString<f64>, project: &Projection, out: &mut String) {
    let mut coords = ring.coords_iter().map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }
}

/// Draw the report: zones, cells with their numbers, region outlines, then endpoints inside the regions.
pub fn write_svg<W: Write>(writer: &mut W, report: &CoverageReport, width: f64, margin: f64) -> Result<()> {
    let Some(bounds) = geom::bounds(report.regions.iter().map(|r| &r.boundary)) else {
        write_svg_header(writer, width, 2.0 * margin, margin, 1.0, None)?;
        return write_svg_footer(writer)
    };

    let scale = (width - 2.0 * margin) / bounds.width().max(bounds.height()).max(f64::EPSILON);
    let height = bounds.height() * scale + 2.0 * margin;

    // Y down
    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale;
        (x, y)
    };

    write_svg_header(writer, width, height, margin, scale, Some(&bounds))?;
    write_svg_styles(writer)?;

    writeln!(writer, r#"<g id="dead-zones">"#)?;
    for zone in &report.exclusion_zones {
        writeln!(writer, r#"<path class="zone" fill-rule="evenodd" d="{}"><title>{}</title></path>"#,
            multipolygon_to_path(&zone.boundary, &project), escape(&zone.name))?;
    }
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g id="cells">"#)?;
    for cell in report.cells() {
        let tile = report.tile(cell);
        let class = serde_json::to_value(cell.classification)?;
        writeln!(writer, r#"<path class="cell {}" fill-rule="evenodd" data-region="{}" data-id="{}" d="{}"/>"#,
            class.as_str().unwrap_or_default(),
            cell.region,
            cell.id,
            multipolygon_to_path(&tile.geographic, &project))?;
        if let Some(center) = tile.geographic.centroid() {
            let (x, y) = project(&center.0);
            writeln!(writer, r#"<text class="cell-id" x="{x:.3}" y="{y:.3}">{}</text>"#, cell.id)?;
        }
    }
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g id="regions">"#)?;
    for region in &report.regions {
        writeln!(writer, r#"<path class="region" fill-rule="evenodd" d="{}"><title>{}</title></path>"#,
            multipolygon_to_path(&region.boundary, &project), escape(&region.name))?;
    }
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g id="endpoints">"#)?;
    for i in report.endpoints_in_any_region() {
        let endpoint = &report.endpoints[i];
        let (x, y) = project(&Coord { x: endpoint.lng, y: endpoint.lat });
        let fill = color::endpoint_color(endpoint.is_priority_class);
        write!(writer, r#"<circle class="ep" cx="{x:.3}" cy="{y:.3}" r="5" fill="{fill}" stroke="{fill}">"#)?;
        if let Some(label) = &endpoint.label {
            write!(writer, "<title>{}</title>", escape(label))?;
        }
        writeln!(writer, "</circle>")?;
    }
    for i in report.prospective_in_any_region() {
        let endpoint = &report.prospective[i];
        let (x, y) = project(&Coord { x: endpoint.lng, y: endpoint.lat });
        writeln!(writer, r#"<circle class="ep" cx="{x:.3}" cy="{y:.3}" r="5" fill="none" stroke="{}"/>"#,
            color::PROSPECTIVE_ENDPOINT)?;
    }
    writeln!(writer, "</g>")?;

    write_svg_footer(writer)
}

/// Render to an SVG file with default size.
pub fn write_svg_file(path: &Path, report: &CoverageReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[report::svg] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_svg(&mut writer, report, WIDTH, MARGIN)?;
    writer.flush()?;
    Ok(())
}

/// Render to an in-memory SVG string with default size.
pub fn to_svg_string(report: &CoverageReport) -> Result<String> {
    let mut buffer = Vec::new();
    write_svg(&mut buffer, report, WIDTH, MARGIN)?;
    String::from_utf8(buffer).context("[report::svg] SVG output is not valid UTF-8")
}
