//! Endpoint tables (CSV).

use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader, StringChunked}};

use crate::{
    config::PointColumns,
    error::{DataIntegrityWarning, DropReason, EngineError},
    types::{is_affirmative, Endpoint},
};

/// Endpoints read from one table, plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct PointDataset {
    pub endpoints: Vec<Endpoint>,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Read an endpoint CSV from `path`.
pub fn read_points(path: &Path, columns: &PointColumns) -> Result<PointDataset> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::points] Failed to open CSV file: {}", path.display()))?;
    let dataset = parse_points(&bytes, columns, &path.display().to_string())?;
    tracing::info!(endpoints = dataset.endpoints.len(), path = %path.display(), "loaded endpoints");
    Ok(dataset)
}

/// Parse endpoint CSV bytes. `source` names the data in warnings.
pub fn parse_points(bytes: &[u8], columns: &PointColumns, source: &str) -> Result<PointDataset> {
    let separator = u8::try_from(columns.separator)
        .map_err(|_| EngineError::InvalidConfiguration(format!("CSV separator {:?} is not ASCII", columns.separator)))?;

    // Every cell is read as text so unparseable coordinates can be dropped row by row.
    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po.with_separator(separator));

    let df = CsvReader::new(Cursor::new(bytes))
        .with_options(options)
        .finish()
        .with_context(|| format!("[io::points] Failed to read CSV from {source}"))?;

    endpoints_from_frame(&df, columns, source)
}

/// Find a column by name, ignoring surrounding whitespace in the header.
fn find_column(df: &DataFrame, wanted: &str) -> Option<String> {
    df.get_column_names().into_iter()
        .find(|name| name.trim() == wanted.trim())
        .map(|name| name.to_string())
}

fn required_column(df: &DataFrame, wanted: &str) -> Result<String> {
    find_column(df, wanted).ok_or_else(|| EngineError::InvalidConfiguration(
        format!("missing required column {wanted:?}")
    ).into())
}

fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(df.column(name)?.str()?)
}

/// Parse a coordinate cell; anything that is not a finite number is rejected.
fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn endpoints_from_frame(df: &DataFrame, columns: &PointColumns, source: &str) -> Result<PointDataset> {
    let lat_name = required_column(df, &columns.latitude)?;
    let lng_name = required_column(df, &columns.longitude)?;
    let priority_name = columns.priority.as_deref().and_then(|c| find_column(df, c));
    let label_name = columns.label.as_deref().and_then(|c| find_column(df, c));

    let lat_values = text_column(df, &lat_name)?;
    let lng_values = text_column(df, &lng_name)?;
    let priority = priority_name.as_deref().map(|name| text_column(df, name)).transpose()?;
    let label = label_name.as_deref().map(|name| text_column(df, name)).transpose()?;

    let attributes = df.get_column_names().into_iter()
        .map(|name| name.to_string())
        .filter(|name| *name != lat_name && *name != lng_name)
        .map(|name| text_column(df, &name).map(|values| (name.trim().to_string(), values)))
        .collect::<Result<Vec<_>>>()?;

    let mut dataset = PointDataset::default();
    let mut dropped = 0;

    for row in 0..df.height() {
        let (Some(lat), Some(lng)) = (parse_coordinate(lat_values.get(row)), parse_coordinate(lng_values.get(row))) else {
            dropped += 1;
            continue
        };

        let mut endpoint = Endpoint::new(lat, lng, priority.and_then(|c| c.get(row)).is_some_and(is_affirmative));
        endpoint.label = label.and_then(|c| c.get(row))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        endpoint.attributes = attributes.iter()
            .filter_map(|(name, values)| values.get(row)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| (name.clone(), v.to_string())))
            .collect();

        dataset.endpoints.push(endpoint);
    }

    if dropped > 0 {
        let warning = DataIntegrityWarning::new(source, DropReason::MissingCoordinate, dropped);
        tracing::warn!(%warning, "endpoint rows dropped");
        dataset.warnings.push(warning);
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
NOME,LAT,LNG,EP_NETPARK,BAIRRO
Hub A,-23.56,-46.65,Netpark,Pinheiros
Hub B,-23.57,-46.66,nao,Pinheiros
Hub C,,-46.66,sim,Moema
Hub D,abc,-46.66,1,Moema
Hub E,-23.58,-46.67,,
";

    #[test]
    fn parses_rows_and_drops_bad_coordinates() {
        let dataset = parse_points(CSV.as_bytes(), &PointColumns::default(), "eps.csv").unwrap();
        assert_eq!(dataset.endpoints.len(), 3);
        assert_eq!(dataset.warnings, vec![DataIntegrityWarning::new("eps.csv", DropReason::MissingCoordinate, 2)]);

        let a = &dataset.endpoints[0];
        assert_eq!((a.lat, a.lng), (-23.56, -46.65));
        assert!(a.is_priority_class);
        assert_eq!(a.label.as_deref(), Some("Hub A"));
        assert_eq!(a.attributes.get("BAIRRO").map(String::as_str), Some("Pinheiros"));
        assert!(!a.attributes.contains_key("LAT"));

        assert!(!dataset.endpoints[1].is_priority_class);
        assert!(!dataset.endpoints[2].is_priority_class);
        assert!(dataset.endpoints[2].attributes.get("BAIRRO").is_none());
    }

    #[test]
    fn missing_coordinate_column_is_a_configuration_error() {
        let columns = PointColumns { latitude: "LATITUDE".into(), ..Default::default() };
        let err = parse_points(CSV.as_bytes(), &columns, "eps.csv").unwrap_err();
        assert!(matches!(err.downcast_ref::<EngineError>(), Some(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "LAT;LNG\n1.5;2.5\n";
        let columns = PointColumns { separator: ';', ..Default::default() };
        let dataset = parse_points(csv.as_bytes(), &columns, "x").unwrap();
        assert_eq!(dataset.endpoints, vec![Endpoint::new(1.5, 2.5, false)]);
        assert!(dataset.warnings.is_empty());
    }

    #[test]
    fn read_points_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), CSV).unwrap();
        let dataset = read_points(file.path(), &PointColumns::default()).unwrap();
        assert_eq!(dataset.endpoints.len(), 3);
    }
}
