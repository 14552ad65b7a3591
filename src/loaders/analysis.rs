use crate::es::EsClient;
use anyhow::{Context, Result};
use log::info;
use serde_json::{json, Value};

/// All dashboard loads share one analysis index.
pub const ANALYSIS_INDEX: &str = "analysis";

pub fn mappings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "analysis_id": { "type": "keyword" },
                "title": { "type": "keyword" },
                "jira_id": { "type": "keyword" },
                "library_ids": { "type": "keyword" },
                "sample_ids": { "type": "keyword" },
                "project": { "type": "keyword" },
                "description": { "type": "keyword" },
                "dashboard": { "type": "keyword" }
            }
        }
    })
}

/// Query matching the analysis record for one (dashboard, analysis_id)
/// pair.
fn analysis_record_query(analysis_id: &str, dashboard: &str) -> Value {
    json!({
        "query": {
            "bool": {
                "must": [
                    { "term": { "dashboard": { "value": dashboard } } },
                    { "term": { "analysis_id": { "value": analysis_id } } }
                ]
            }
        }
    })
}

/// Upserts one analysis entry: a pre-existing record for the same
/// (dashboard, analysis_id) is deleted before the new one is submitted.
pub fn import_entry(es: &EsClient, entry: &Value, dashboard: &str) -> Result<()> {
    if !es.exists_index(ANALYSIS_INDEX)? {
        info!("creating analysis index with name {ANALYSIS_INDEX}");
        es.create_index(ANALYSIS_INDEX, &mappings())?;
    }
    es.refresh_index(ANALYSIS_INDEX)?;

    let analysis_id = entry["analysis_id"]
        .as_str()
        .context("analysis entry without an analysis_id")?;
    let existing = es.search(
        ANALYSIS_INDEX,
        &analysis_record_query(analysis_id, dashboard),
    )?;
    if let Some(hit) = existing["hits"]["hits"].get(0) {
        if let Some(id) = hit["_id"].as_str() {
            info!("duplicate analysis found - deleting old record");
            es.delete_doc(ANALYSIS_INDEX, id)?;
            es.refresh_index(ANALYSIS_INDEX)?;
        }
    }

    es.submit_doc(ANALYSIS_INDEX, entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_query_matches_both_terms() {
        let query = analysis_record_query("SC-123", "TREE_CELLSCAPE");
        let must = query["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 2);
        assert_eq!(must[0]["term"]["dashboard"]["value"], "TREE_CELLSCAPE");
        assert_eq!(must[1]["term"]["analysis_id"]["value"], "SC-123");
    }
}
