//! Tree canonicalization and heatmap layout.
//!
//! Pipeline: parse one of the supported encodings into a directed rooted
//! tree, resolve the root, resolve per-node child ordering, collapse
//! singleton chains, and assign each node its heatmap index range.

pub mod gml;
pub mod graph;
pub mod layout;
pub mod merge;
pub mod newick;
pub mod ordering;
pub mod parse;

pub use graph::Tree;
pub use layout::{InternalRecord, LeafRecord, NodeRecord};
pub use ordering::OrderingMap;

use anyhow::Result;
use log::info;
use std::path::Path;

/// Runs the full canonicalization pipeline over one tree input and
/// returns the ordered heatmap record set.
pub fn build_tree_records(
    analysis_file: Option<&Path>,
    ordering_file: Option<&Path>,
    root_id: Option<&str>,
    tree_edges: Option<&Path>,
) -> Result<Vec<NodeRecord>> {
    let tree = parse::rooted_tree(analysis_file, root_id, tree_edges)?;
    let root = tree.validate()?.to_string();
    info!("tree has {} nodes, root '{}'", tree.node_count(), root);

    let ordering = match ordering_file {
        Some(path) => ordering::from_file(path)?,
        None => ordering::compute(&tree, &root),
    };

    let records = layout::assign(&tree, &root, ordering)?;
    info!(
        "layout assigned {} records ({} leaves)",
        records.len(),
        records.iter().filter(|r| r.is_leaf()).count()
    );
    Ok(records)
}
