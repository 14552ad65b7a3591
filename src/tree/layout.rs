use crate::error::LoaderError;
use crate::tree::graph::Tree;
use crate::tree::merge::merge_singleton_chain;
use crate::tree::ordering::OrderingMap;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// A leaf occupies exactly one heatmap column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafRecord {
    pub heatmap_order: usize,
    pub cell_id: String,
    pub unmerged_id: String,
    pub parent: String,
    pub children: Vec<String>,
    pub max_height: usize,
    pub min_index: usize,
    pub max_index: usize,
}

/// An internal node brackets the contiguous column range of its leaf
/// descendants. `cell_id` is the possibly-merged composite id;
/// `unmerged_id` is the id the node had in the parsed tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalRecord {
    pub cell_id: String,
    pub unmerged_id: String,
    pub parent: String,
    pub children: Vec<String>,
    pub max_height: usize,
    pub min_index: usize,
    pub max_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeRecord {
    Leaf(LeafRecord),
    Internal(InternalRecord),
}

impl NodeRecord {
    pub fn cell_id(&self) -> &str {
        match self {
            NodeRecord::Leaf(leaf) => &leaf.cell_id,
            NodeRecord::Internal(internal) => &internal.cell_id,
        }
    }

    pub fn min_index(&self) -> usize {
        match self {
            NodeRecord::Leaf(leaf) => leaf.min_index,
            NodeRecord::Internal(internal) => internal.min_index,
        }
    }

    pub fn max_index(&self) -> usize {
        match self {
            NodeRecord::Leaf(leaf) => leaf.max_index,
            NodeRecord::Internal(internal) => internal.max_index,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRecord::Leaf(_))
    }
}

/// Longest downward path length and leaf-descendant count per node,
/// computed in one pass: children are resolved before their parent by
/// walking the pre-order list backwards.
fn subtree_metrics(tree: &Tree, root: &str) -> HashMap<String, (usize, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut stack = vec![root.to_string()];
    while let Some(node) = stack.pop() {
        for child in tree.children_of(&node) {
            stack.push(child.to_string());
        }
        order.push(node);
    }

    let mut metrics: HashMap<String, (usize, usize)> = HashMap::new();
    for node in order.iter().rev() {
        let children = tree.children_of(node);
        if children.is_empty() {
            metrics.insert(node.clone(), (0, 1));
        } else {
            let mut max_height = 0;
            let mut leaves = 0;
            for child in children {
                let (height, count) = metrics[child];
                max_height = max_height.max(height + 1);
                leaves += count;
            }
            metrics.insert(node.clone(), (max_height, leaves));
        }
    }
    metrics
}

/// Walks the rooted, ordered tree and assigns heatmap layout coordinates.
///
/// Explicit stack-based pre-order: each internal node is merged, emitted,
/// and its children pushed right-to-left so the whole subtree is processed
/// before any sibling. A monotonic counter assigns every leaf a unique
/// sequential index; an internal node's range is [counter, counter +
/// leaf_count - 1] at the moment it is emitted. Together this gives every
/// sibling subtree a disjoint, contiguous index range in left-to-right
/// order, with leaf indices forming the exact permutation 0..leaf_count.
///
/// Leaves are judged by reachability (max_height == 0), not by the absence
/// of an ordering entry, so a node the ordering file omits is still placed.
pub fn assign(
    tree: &Tree,
    root: &str,
    ordering: OrderingMap,
) -> Result<Vec<NodeRecord>, LoaderError> {
    let metrics = subtree_metrics(tree, root);
    let total_leaves = metrics.get(root).map(|&(_, count)| count).unwrap_or(0);

    let mut ordering = ordering;
    let mut records: Vec<NodeRecord> = Vec::new();
    let mut heatmap_index: usize = 0;
    let mut stack: Vec<(String, String)> = vec![(root.to_string(), "root".to_string())];

    while let Some((node, parent)) = stack.pop() {
        let (max_height, leaf_count) = metrics.get(&node).copied().unwrap_or((0, 1));

        if max_height == 0 {
            debug!("leaf '{node}' assigned heatmap index {heatmap_index}");
            records.push(NodeRecord::Leaf(LeafRecord {
                heatmap_order: heatmap_index,
                cell_id: node.clone(),
                unmerged_id: node,
                parent,
                children: Vec::new(),
                max_height: 0,
                min_index: heatmap_index,
                max_index: heatmap_index,
            }));
            heatmap_index += 1;
            continue;
        }

        let unmerged_id = node.clone();
        let (merged_id, next_ordering) = merge_singleton_chain(&node, ordering)?;
        ordering = next_ordering;

        let children = ordering
            .get(&merged_id)
            .cloned()
            .ok_or_else(|| LoaderError::MissingOrdering(merged_id.clone()))?;

        records.push(NodeRecord::Internal(InternalRecord {
            cell_id: merged_id.clone(),
            unmerged_id,
            parent,
            children: children.clone(),
            max_height,
            min_index: heatmap_index,
            max_index: heatmap_index + leaf_count - 1,
        }));

        for child in children.into_iter().rev() {
            stack.push((child, merged_id.clone()));
        }
    }

    if heatmap_index != total_leaves {
        return Err(LoaderError::MalformedTree(format!(
            "ordering map disagrees with tree: placed {heatmap_index} of {total_leaves} leaves"
        )));
    }

    Ok(records)
}
