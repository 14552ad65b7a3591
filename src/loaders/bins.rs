use crate::es::EsClient;
use crate::loaders::tabular;
use anyhow::Result;
use log::info;
use serde_json::{json, Value};
use std::path::Path;

/// Source column -> index field renames applied to bin files.
const FIELD_MAPPING: &[(&str, &str)] = &[
    ("integer_copy_number", "copy_number"),
    ("chr", "chrom_number"),
];

/// Fields retained in the bin index.
const FIELDS: &[&str] = &[
    "chrom_number",
    "start",
    "end",
    "width",
    "reads",
    "copy",
    "state",
    "cell_id",
];

pub fn mappings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "chrom_number": { "type": "keyword" },
                "start": { "type": "long" },
                "end": { "type": "long" },
                "width": { "type": "long" },
                "reads": { "type": "long" },
                "copy": { "type": "double" },
                "state": { "type": "long" },
                "cell_id": { "type": "keyword" }
            }
        }
    })
}

/// Loads one per-cell bin CSV into the bin index, creating the index on
/// first use.
pub fn load_file(es: &EsClient, index: &str, bin_file: &Path) -> Result<()> {
    let mut records = tabular::read_csv_records(bin_file, FIELD_MAPPING)?;
    for record in records.iter_mut() {
        tabular::normalize_chrom_field(record);
    }
    let docs: Vec<Value> = records
        .into_iter()
        .map(|record| Value::Object(tabular::select_fields(record, FIELDS)))
        .collect();

    info!("loading {} bin records from {}", docs.len(), bin_file.display());

    if !es.exists_index(index)? {
        es.create_index(index, &mappings())?;
    }
    es.disable_refresh(index)?;
    let result = es.submit_bulk(index, &docs);
    es.enable_refresh(index)?;
    result
}
