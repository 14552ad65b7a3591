use thiserror::Error;

/// Errors raised by the tree and segment engines.
///
/// These are deterministic pure-function failures: the same input always
/// produces the same error, so callers abort the load rather than retry.
#[derive(Debug, Error, PartialEq)]
pub enum LoaderError {
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("node '{0}' has children but no ordering entry")]
    MissingOrdering(String),

    #[error("bin at {chrom}:{start} has no mode profile entry")]
    ModeConsistency { chrom: String, start: i64 },

    #[error("bins for cell '{0}' are not sorted by ascending start")]
    UnsortedBins(String),
}

impl LoaderError {
    pub fn malformed_tree(msg: impl Into<String>) -> Self {
        LoaderError::MalformedTree(msg.into())
    }
}
