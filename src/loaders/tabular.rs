use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Reads a CSV file into flat JSON objects, renaming header columns per
/// `field_mapping` (source name -> index name) and coercing each value to
/// the narrowest of integer, float, or string. Empty values become null.
pub fn read_csv_records(
    path: &Path,
    field_mapping: &[(&str, &str)],
) -> Result<Vec<Map<String, Value>>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading file {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading csv header")?
        .iter()
        .map(|header| rename_field(header.trim(), field_mapping))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("parsing row of {}", path.display()))?;
        let mut record = Map::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            record.insert(header.clone(), coerce_value(value));
        }
        records.push(record);
    }

    Ok(records)
}

fn rename_field(name: &str, field_mapping: &[(&str, &str)]) -> String {
    field_mapping
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Narrowest-type coercion for a CSV cell.
pub fn coerce_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        return Value::from(float);
    }
    Value::from(trimmed)
}

/// Rewrites a record's `chrom_number` field (string or numeric) to the
/// normalized two-digit string convention.
pub fn normalize_chrom_field(record: &mut Map<String, Value>) {
    let raw = match record.get("chrom_number") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return,
    };
    record.insert(
        "chrom_number".to_string(),
        Value::from(crate::utils::chrom::format_chrom_number(&raw)),
    );
}

/// Restricts a record to `fields`, dropping everything else. Fields the
/// record lacks entirely are left out rather than nulled.
pub fn select_fields(record: Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    let mut selected = Map::new();
    for (key, value) in record {
        if fields.contains(&key.as_str()) {
            selected.insert(key, value);
        }
    }
    selected
}
