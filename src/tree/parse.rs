use crate::error::LoaderError;
use crate::tree::graph::Tree;
use crate::tree::newick::ROOT_SENTINEL;
use crate::tree::{gml, newick};
use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source: String,
    target: String,
}

/// Loads a directed rooted tree from whichever representation the caller
/// supplied: a `.newick` file, a GML file (oriented from `root_id` when
/// given, trusted as already rooted otherwise), or an edge-list CSV as the
/// fallback when no tree file is present.
pub fn rooted_tree(
    analysis_file: Option<&Path>,
    root_id: Option<&str>,
    tree_edges: Option<&Path>,
) -> Result<Tree> {
    match (analysis_file, tree_edges) {
        (Some(path), _) if path.extension().is_some_and(|ext| ext == "newick") => {
            debug!("parsing newick tree from {}", path.display());
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading newick file {}", path.display()))?;
            let edges = newick::parse_edges(&text)?;
            Ok(Tree::orient(&edges, ROOT_SENTINEL)?)
        }
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading gml file {}", path.display()))?;
            let edges = gml::parse_edges(&text)?;
            match root_id {
                Some(root) => {
                    debug!("orienting gml tree from root '{root}'");
                    Ok(Tree::orient(&edges, root)?)
                }
                None => {
                    // Already-rooted GML: trust the file's edge orientation.
                    debug!("reading gml tree as already rooted");
                    let mut tree = Tree::new();
                    for (source, target) in &edges {
                        tree.add_edge(source.trim(), target.trim());
                    }
                    Ok(tree)
                }
            }
        }
        (None, Some(path)) => {
            debug!("reading edge list from {}", path.display());
            let mut reader = csv::Reader::from_path(path)
                .with_context(|| format!("reading edge file {}", path.display()))?;
            let mut tree = Tree::new();
            for row in reader.deserialize() {
                let row: EdgeRow = row.context("parsing edge file row")?;
                tree.add_edge(row.source.trim(), row.target.trim());
            }
            if tree.node_count() == 0 {
                return Err(LoaderError::malformed_tree("edge file contains no edges").into());
            }
            Ok(tree)
        }
        (None, None) => Err(anyhow!("no tree file or edge file supplied")),
    }
}
