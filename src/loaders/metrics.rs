use crate::es::EsClient;
use anyhow::{Context, Result};
use log::info;
use serde_json::{json, Map, Value};
use std::path::Path;

/// The typed fields kept from a metrics file; every other column is
/// dropped.
const FIELD_TYPES: &[(&str, FieldType)] = &[
    ("cell_id", FieldType::Str),
    ("state_mode", FieldType::Int),
];

#[derive(Clone, Copy)]
enum FieldType {
    Str,
    Int,
}

pub fn mappings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "cell_id": { "type": "keyword" },
                "state_mode": { "type": "long" }
            }
        }
    })
}

/// Loads one per-cell QC metrics CSV, keeping only the typed fields.
pub fn load_file(es: &EsClient, index: &str, metrics_file: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(metrics_file)
        .with_context(|| format!("reading metrics file {}", metrics_file.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading metrics header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut docs = Vec::new();
    for row in reader.records() {
        let row = row.context("parsing metrics row")?;
        let mut record = Map::new();
        for (field, field_type) in FIELD_TYPES {
            let raw = headers
                .iter()
                .position(|header| header == field)
                .and_then(|ix| row.get(ix))
                .unwrap_or("");
            record.insert(field.to_string(), apply_type(raw, *field_type)?);
        }
        docs.push(Value::Object(record));
    }

    info!(
        "loading {} metric records from {}",
        docs.len(),
        metrics_file.display()
    );

    if !es.exists_index(index)? {
        es.create_index(index, &mappings())?;
    }
    es.disable_refresh(index)?;
    let result = es.submit_bulk(index, &docs);
    es.enable_refresh(index)?;
    result
}

/// Coerces one metrics cell to its declared type. Empty markers become
/// null; quoted values and integer columns stored as "2.0" are tolerated.
fn apply_type(raw: &str, field_type: FieldType) -> Result<Value> {
    let value = raw.trim().trim_matches('"');
    if is_empty_value(value, field_type) {
        return Ok(Value::Null);
    }

    match field_type {
        FieldType::Str => Ok(Value::from(value)),
        FieldType::Int => {
            let normalized = value.strip_suffix(".0").unwrap_or(value);
            normalized
                .parse::<i64>()
                .map(Value::from)
                .with_context(|| format!("metrics value '{raw}' is not an integer"))
        }
    }
}

fn is_empty_value(value: &str, field_type: FieldType) -> bool {
    if value.is_empty() {
        return true;
    }
    let lowered = value.to_lowercase();
    matches!(lowered.as_str(), "na" | "nan" | "inf" | "?") && !matches!(field_type, FieldType::Str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_coercion() {
        assert_eq!(apply_type("7", FieldType::Int).unwrap(), Value::from(7));
        assert_eq!(apply_type("7.0", FieldType::Int).unwrap(), Value::from(7));
        assert_eq!(apply_type("\"7\"", FieldType::Int).unwrap(), Value::from(7));
        assert_eq!(apply_type("SA1", FieldType::Str).unwrap(), Value::from("SA1"));
    }

    #[test]
    fn empty_markers_become_null() {
        for marker in ["", "na", "NaN", "inf", "?"] {
            assert_eq!(apply_type(marker, FieldType::Int).unwrap(), Value::Null);
        }
        // A literal "NA" is a legitimate string value.
        assert_eq!(apply_type("na", FieldType::Str).unwrap(), Value::from("na"));
    }

    #[test]
    fn non_numeric_integer_field_is_an_error() {
        assert!(apply_type("seven", FieldType::Int).is_err());
    }
}
