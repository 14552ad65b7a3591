use crate::error::LoaderError;
use crate::segs::{Bin, Segment};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Lookup from (chromosome, bin start) to the population mode state.
pub type ModeMap = HashMap<(String, i64), i64>;

/// Subtracts the mode state from each bin, leaving the signed deviation
/// from the population baseline. Every bin position must be covered by
/// the mode profile.
pub fn subtract_mode(bins: Vec<Bin>, mode: &ModeMap) -> Result<Vec<Bin>, LoaderError> {
    bins.into_iter()
        .map(|mut bin| {
            let key = (bin.chrom_number.clone(), bin.start);
            match mode.get(&key) {
                Some(state) => {
                    bin.state -= state;
                    Ok(bin)
                }
                None => Err(LoaderError::ModeConsistency {
                    chrom: bin.chrom_number,
                    start: bin.start,
                }),
            }
        })
        .collect()
}

/// Run-length-encodes bins into segments: the open segment's end is
/// extended while chromosome and state match the previous bin, otherwise
/// it is closed and a new one opened.
///
/// The input must already be sorted ascending by start within each
/// chromosome group — out-of-order input would silently produce a wrong
/// segment set, so it is rejected up front instead.
pub fn collapse_bins(bins: &[Bin]) -> Result<Vec<Segment>, LoaderError> {
    check_sorted(bins)?;

    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Option<Segment> = None;

    for bin in bins {
        match current.as_mut() {
            None => current = Some(Segment::open(bin)),
            Some(seg) if seg.state == bin.state && seg.chrom_number == bin.chrom_number => {
                seg.end = bin.end;
            }
            Some(seg) => {
                segments.push(seg.clone());
                current = Some(Segment::open(bin));
            }
        }
    }

    if let Some(seg) = current {
        segments.push(seg);
    }
    Ok(segments)
}

fn check_sorted(bins: &[Bin]) -> Result<(), LoaderError> {
    for pair in bins.windows(2) {
        if pair[0].chrom_number == pair[1].chrom_number && pair[1].start < pair[0].start {
            return Err(LoaderError::UnsortedBins(pair[1].cell_id.clone()));
        }
    }
    Ok(())
}

/// Full per-cell normalization: mode subtraction followed by run-length
/// encoding.
pub fn normalize_cell_bins(bins: Vec<Bin>, mode: &ModeMap) -> Result<Vec<Segment>, LoaderError> {
    let adjusted = subtract_mode(bins, mode)?;
    collapse_bins(&adjusted)
}

/// Aggregation returning every distinct cell id in the bin index.
pub fn cell_ids_query() -> Value {
    json!({
        "size": 0,
        "aggs": {
            "cell_ids": {
                "terms": {
                    "field": "cell_id",
                    "size": 100_000
                }
            }
        }
    })
}

pub fn parse_cell_ids(response: &Value) -> anyhow::Result<Vec<String>> {
    let buckets = response["aggregations"]["cell_ids"]["buckets"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("cell id aggregation missing from response"))?;

    buckets
        .iter()
        .map(|bucket| {
            bucket["key"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("cell id bucket without a string key"))
        })
        .collect()
}

/// Query fetching one cell's bins sorted ascending by chromosome then
/// start, the order the run-length encoder requires.
pub fn cell_bins_query(cell_id: &str) -> Value {
    json!({
        "size": 50_000,
        "query": {
            "bool": {
                "must": [{
                    "term": {
                        "cell_id": {
                            "value": cell_id
                        }
                    }
                }]
            }
        },
        "sort": [
            { "chrom_number": { "order": "asc" } },
            { "start": { "order": "asc" } }
        ]
    })
}

pub fn parse_cell_bins(response: &Value) -> anyhow::Result<Vec<Bin>> {
    let hits = response["hits"]["hits"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("bin search response missing hits"))?;

    hits.iter()
        .map(|hit| {
            serde_json::from_value(hit["_source"].clone())
                .map_err(|e| anyhow::anyhow!("bin record does not match expected shape: {e}"))
        })
        .collect()
}
