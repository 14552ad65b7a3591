use crate::es::EsClient;
use crate::loaders::tabular;
use crate::segs::Segment;
use crate::utils::chrom::format_chrom_number;
use anyhow::Result;
use log::info;
use serde_json::{json, Value};
use std::path::Path;

/// Source column -> index field renames applied to segment files.
const FIELD_MAPPING: &[(&str, &str)] = &[("median", "integer_median"), ("chr", "chrom_number")];

pub fn mappings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "chrom_number": { "type": "keyword" },
                "start": { "type": "long" },
                "end": { "type": "long" },
                "state": { "type": "long" },
                "integer_median": { "type": "double" },
                "cell_id": { "type": "keyword" }
            }
        }
    })
}

/// Loads one segment CSV into the segs index, creating the index on
/// first use.
pub fn load_file(es: &EsClient, index: &str, segs_file: &Path) -> Result<()> {
    let mut records = tabular::read_csv_records(segs_file, FIELD_MAPPING)?;
    for record in records.iter_mut() {
        tabular::normalize_chrom_field(record);
    }
    let docs: Vec<Value> = records.into_iter().map(Value::Object).collect();

    info!(
        "loading {} segment records from {}",
        docs.len(),
        segs_file.display()
    );
    submit(es, index, &docs)
}

/// Loads an in-memory segment table produced by the normalizer.
pub fn load_table(es: &EsClient, index: &str, segments: &[Segment]) -> Result<()> {
    let docs: Vec<Value> = segments
        .iter()
        .map(|seg| {
            json!({
                "cell_id": seg.cell_id,
                "chrom_number": format_chrom_number(&seg.chrom_number),
                "start": seg.start,
                "end": seg.end,
                "state": seg.state
            })
        })
        .collect();

    info!("loading {} normalized segment records", docs.len());
    submit(es, index, &docs)
}

fn submit(es: &EsClient, index: &str, docs: &[Value]) -> Result<()> {
    if !es.exists_index(index)? {
        es.create_index(index, &mappings())?;
    }
    es.disable_refresh(index)?;
    let result = es.submit_bulk(index, docs);
    es.enable_refresh(index)?;
    result
}
