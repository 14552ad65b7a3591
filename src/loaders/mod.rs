//! Loaders translating input files and derived record sets into
//! search-index documents.

pub mod analysis;
pub mod bins;
pub mod metrics;
pub mod segs;
pub mod tabular;
pub mod tree;
