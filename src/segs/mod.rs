//! Mode-normalization and segmentation of per-cell copy-number bins.

pub mod mode;
pub mod normalize;

use serde::{Deserialize, Serialize};

/// One fixed-width genomic interval with an integer copy-number state.
/// After mode subtraction the state is a signed offset from the
/// population baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub cell_id: String,
    pub chrom_number: String,
    pub start: i64,
    pub end: i64,
    pub state: i64,
}

/// A maximal run of adjacent same-state bins collapsed into one interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub cell_id: String,
    pub chrom_number: String,
    pub start: i64,
    pub end: i64,
    pub state: i64,
}

impl Segment {
    fn open(bin: &Bin) -> Self {
        Segment {
            cell_id: bin.cell_id.clone(),
            chrom_number: bin.chrom_number.clone(),
            start: bin.start,
            end: bin.end,
            state: bin.state,
        }
    }
}
