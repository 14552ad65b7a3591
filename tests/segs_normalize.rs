use cellscape_tools::segs::mode::{self, ALL_CELLS, BIN_WIDTH};
use cellscape_tools::segs::normalize;
use cellscape_tools::segs::Bin;
use cellscape_tools::utils::chrom::format_chrom_number;
use serde_json::json;

// End-to-end check of the mode-normalization path: aggregation response
// -> mode profile -> reference track -> per-cell diff -> segments.

fn aggregation_response() -> serde_json::Value {
    // Two chromosomes; chromosome 01 has three buckets where the first
    // two share the mode state.
    json!({
        "aggregations": {
            "chromosomes": {
                "buckets": [
                    {
                        "key": "01",
                        "bins": {
                            "buckets": [
                                { "key": 1.0,
                                  "state": { "buckets": [ { "key": 2 } ] } },
                                { "key": 500_001.0,
                                  "state": { "buckets": [ { "key": 2 } ] } },
                                { "key": 1_000_001.0,
                                  "state": { "buckets": [ { "key": 3 } ] } }
                            ]
                        }
                    },
                    {
                        "key": "02",
                        "bins": {
                            "buckets": [
                                { "key": 1.0,
                                  "state": { "buckets": [ { "key": 2 } ] } }
                            ]
                        }
                    }
                ]
            }
        }
    })
}

fn cell_bins() -> Vec<Bin> {
    let mk = |chrom: &str, start: i64, state: i64| Bin {
        cell_id: "SA1-A90554-R03-C44".to_string(),
        chrom_number: chrom.to_string(),
        start,
        end: start + BIN_WIDTH,
        state,
    };
    vec![
        mk("01", 1, 4),
        mk("01", 500_001, 4),
        mk("01", 1_000_001, 3),
        mk("02", 1, 2),
    ]
}

#[test]
fn mode_track_is_run_length_encoded() {
    let mode_bins = mode::parse_mode_bins(&aggregation_response()).unwrap();
    assert_eq!(mode_bins.len(), 4);
    assert!(mode_bins.iter().all(|b| b.cell_id == ALL_CELLS));

    let track = normalize::collapse_bins(&mode_bins).unwrap();
    assert_eq!(track.len(), 3);
    assert_eq!(
        (track[0].chrom_number.as_str(), track[0].start, track[0].end, track[0].state),
        ("01", 1, 1_000_001, 2)
    );
    assert_eq!(
        (track[1].chrom_number.as_str(), track[1].start, track[1].state),
        ("01", 1_000_001, 3)
    );
    assert_eq!(track[2].chrom_number, "02");
}

#[test]
fn cell_segments_are_mode_relative() {
    let mode_bins = mode::parse_mode_bins(&aggregation_response()).unwrap();
    let mode_map = mode::mode_map(&mode_bins);

    let segs = normalize::normalize_cell_bins(cell_bins(), &mode_map).unwrap();

    // 01: states 4,4 over mode 2,2 -> one +2 segment; 3 over mode 3 ->
    // one 0 segment. 02: 2 over mode 2 -> one 0 segment (chromosome
    // change keeps it separate).
    assert_eq!(segs.len(), 3);
    assert_eq!((segs[0].start, segs[0].end, segs[0].state), (1, 1_000_001, 2));
    assert_eq!((segs[1].start, segs[1].end, segs[1].state), (1_000_001, 1_500_001, 0));
    assert_eq!((segs[2].chrom_number.as_str(), segs[2].state), ("02", 0));
    assert!(segs.iter().all(|s| s.cell_id == "SA1-A90554-R03-C44"));
}

#[test]
fn bin_outside_mode_profile_fails_loudly() {
    let mode_bins = mode::parse_mode_bins(&aggregation_response()).unwrap();
    let mode_map = mode::mode_map(&mode_bins);

    let mut bins = cell_bins();
    bins.push(Bin {
        cell_id: "SA1-A90554-R03-C44".to_string(),
        chrom_number: "03".to_string(),
        start: 1,
        end: 500_001,
        state: 2,
    });

    let err = normalize::normalize_cell_bins(bins, &mode_map).unwrap_err();
    assert!(format!("{err}").contains("no mode profile entry"));
}

#[test]
fn chromosome_labels_normalized() {
    assert_eq!(format_chrom_number("23"), "X");
    assert_eq!(format_chrom_number("7"), "07");
    assert_eq!(format_chrom_number("x"), "X");
}
