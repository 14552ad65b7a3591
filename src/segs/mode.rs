use crate::segs::normalize::ModeMap;
use crate::segs::Bin;
use anyhow::{anyhow, Result};
use itertools::Itertools;
use serde_json::{json, Value};

/// Fixed bucket width of the genomic bins.
pub const BIN_WIDTH: i64 = 500_000;

/// Bins are 1-based, so the histogram buckets are shifted by one unit to
/// line bucket keys up with bin starts.
pub const HISTOGRAM_OFFSET: i64 = 1;

/// Sentinel cell id carried by the synthetic mode profile rows.
pub const ALL_CELLS: &str = "all";

/// Three-level aggregation computing the majority state per (chromosome,
/// bucket) across every cell: chromosome terms, start histogram, then a
/// size-1 state terms aggregation whose top bucket is the mode.
pub fn modes_query() -> Value {
    json!({
        "size": 0,
        "aggs": {
            "chromosomes": {
                "terms": {
                    "field": "chrom_number",
                    "size": 50
                },
                "aggs": {
                    "bins": {
                        "histogram": {
                            "field": "start",
                            "interval": BIN_WIDTH,
                            "offset": HISTOGRAM_OFFSET
                        },
                        "aggs": {
                            "state": {
                                "terms": {
                                    "field": "state",
                                    "size": 1
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Flattens the aggregation response into the synthetic "all cells" bin
/// list, sorted by (chromosome, start) so it can be run-length-encoded
/// directly. Buckets holding no documents carry no state and are skipped.
pub fn parse_mode_bins(response: &Value) -> Result<Vec<Bin>> {
    let chromosomes = response["aggregations"]["chromosomes"]["buckets"]
        .as_array()
        .ok_or_else(|| anyhow!("mode aggregation missing from response"))?;

    let mut bins = Vec::new();
    for chrom_bucket in chromosomes {
        let chromosome = chrom_bucket["key"]
            .as_str()
            .ok_or_else(|| anyhow!("chromosome bucket without a string key"))?;
        let histogram = chrom_bucket["bins"]["buckets"]
            .as_array()
            .ok_or_else(|| anyhow!("chromosome bucket without a histogram"))?;

        for bin_bucket in histogram {
            let start = bin_bucket["key"]
                .as_f64()
                .ok_or_else(|| anyhow!("histogram bucket without a numeric key"))?
                as i64;
            let Some(state_bucket) = bin_bucket["state"]["buckets"].get(0) else {
                continue;
            };
            let state = state_bucket["key"]
                .as_i64()
                .ok_or_else(|| anyhow!("state bucket without an integer key"))?;

            bins.push(Bin {
                cell_id: ALL_CELLS.to_string(),
                chrom_number: chromosome.to_string(),
                start,
                end: start + BIN_WIDTH,
                state,
            });
        }
    }

    Ok(bins
        .into_iter()
        .sorted_by(|a, b| {
            a.chrom_number
                .cmp(&b.chrom_number)
                .then(a.start.cmp(&b.start))
        })
        .collect())
}

/// Builds the (chromosome, start) -> mode state lookup used to diff each
/// cell's bins.
pub fn mode_map(bins: &[Bin]) -> ModeMap {
    bins.iter()
        .map(|bin| ((bin.chrom_number.clone(), bin.start), bin.state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> Value {
        json!({
            "aggregations": {
                "chromosomes": {
                    "buckets": [
                        {
                            "key": "02",
                            "doc_count": 9000,
                            "bins": {
                                "buckets": [
                                    { "key": 1.0, "doc_count": 40,
                                      "state": { "buckets": [ { "key": 2, "doc_count": 31 } ] } }
                                ]
                            }
                        },
                        {
                            "key": "01",
                            "doc_count": 12000,
                            "bins": {
                                "buckets": [
                                    { "key": 500001.0, "doc_count": 38,
                                      "state": { "buckets": [ { "key": 4, "doc_count": 20 } ] } },
                                    { "key": 1.0, "doc_count": 40,
                                      "state": { "buckets": [ { "key": 2, "doc_count": 33 } ] } },
                                    { "key": 1000001.0, "doc_count": 0,
                                      "state": { "buckets": [] } }
                                ]
                            }
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn buckets_flattened_and_sorted() {
        let bins = parse_mode_bins(&sample_response()).unwrap();
        assert_eq!(bins.len(), 3);
        assert_eq!(
            bins.iter()
                .map(|b| (b.chrom_number.as_str(), b.start, b.state))
                .collect::<Vec<_>>(),
            vec![("01", 1, 2), ("01", 500_001, 4), ("02", 1, 2)]
        );
        assert!(bins.iter().all(|b| b.cell_id == ALL_CELLS));
        assert!(bins.iter().all(|b| b.end == b.start + BIN_WIDTH));
    }

    #[test]
    fn empty_buckets_skipped() {
        let bins = parse_mode_bins(&sample_response()).unwrap();
        assert!(!bins.iter().any(|b| b.start == 1_000_001));
    }

    #[test]
    fn mode_map_keys_by_chromosome_and_start() {
        let bins = parse_mode_bins(&sample_response()).unwrap();
        let map = mode_map(&bins);
        assert_eq!(map[&("01".to_string(), 1)], 2);
        assert_eq!(map[&("01".to_string(), 500_001)], 4);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn malformed_response_reported() {
        let response = json!({ "aggregations": {} });
        assert!(parse_mode_bins(&response).is_err());
    }
}
