use crate::es::EsClient;
use crate::tree;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde_json::{json, Value};
use std::path::Path;

pub fn mappings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "cell_id": { "type": "keyword" },
                "unmerged_id": { "type": "keyword" },
                "parent": { "type": "keyword" },
                "children": { "type": "keyword" },
                "max_height": { "type": "integer" },
                "min_index": { "type": "integer" },
                "max_index": { "type": "integer" },
                "heatmap_order": { "type": "integer" }
            }
        }
    })
}

/// Full tree reload: the analysis' previous tree index is deleted, the
/// canonicalization pipeline runs, and the record set is bulk-submitted
/// with refresh disabled for the duration.
pub fn load_file(
    es: &EsClient,
    index: &str,
    analysis_file: Option<&Path>,
    ordering_file: Option<&Path>,
    root_id: Option<&str>,
    tree_edges: Option<&Path>,
) -> Result<()> {
    if es.exists_index(index)? {
        info!("tree data for analysis already exists - will delete old index");
        es.delete_index(index)?;
    }
    es.create_index(index, &mappings())?;
    es.disable_refresh(index)?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    progress.set_message("Building tree layout...");

    let result = submit_records(es, index, analysis_file, ordering_file, root_id, tree_edges);

    es.enable_refresh(index)?;
    match &result {
        Ok(count) => progress.finish_with_message(format!("Loaded {count} tree records")),
        Err(_) => progress.finish_and_clear(),
    }
    result.map(|_| ())
}

fn submit_records(
    es: &EsClient,
    index: &str,
    analysis_file: Option<&Path>,
    ordering_file: Option<&Path>,
    root_id: Option<&str>,
    tree_edges: Option<&Path>,
) -> Result<usize> {
    let records = tree::build_tree_records(analysis_file, ordering_file, root_id, tree_edges)?;
    let docs: Vec<Value> = records
        .iter()
        .map(|record| serde_json::to_value(record).context("serializing tree record"))
        .collect::<Result<_>>()?;
    es.submit_bulk(index, &docs)?;
    Ok(docs.len())
}
