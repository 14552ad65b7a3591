use crate::tree::graph::Tree;
use anyhow::{Context, Result};
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// Node id -> ordered child ids. Total over every internal node reachable
/// from the root; ids absent from the map are leaves.
pub type OrderingMap = HashMap<String, Vec<String>>;

/// Reads an ordering file verbatim: tab-separated rows of
/// `<node_id>\t<comma-separated child ids>`, whitespace-trimmed.
pub fn from_file(path: &Path) -> Result<OrderingMap> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading ordering file {}", path.display()))?;

    let mut ordering = OrderingMap::new();
    for record in reader.records() {
        let record = record.context("parsing ordering file row")?;
        let node = match record.get(0) {
            Some(node) if !node.trim().is_empty() => node.trim().to_string(),
            _ => continue,
        };
        let children = record
            .get(1)
            .unwrap_or("")
            .split(',')
            .map(|child| child.trim().to_string())
            .filter(|child| !child.is_empty())
            .collect();
        ordering.insert(node, children);
    }

    Ok(ordering)
}

/// Computes child ordering breadth-first from the root: each internal
/// node's children are stable-sorted ascending by subtree size (descendant
/// count plus the node itself, 0 for an unknown id), so equal-sized
/// children keep their discovery order.
pub fn compute(tree: &Tree, root: &str) -> OrderingMap {
    let mut ordering = OrderingMap::new();
    let mut todo: VecDeque<String> = VecDeque::new();
    todo.push_back(root.to_string());

    while let Some(node) = todo.pop_front() {
        let mut children: Vec<String> = tree
            .children_of(&node)
            .into_iter()
            .map(str::to_string)
            .collect();
        if children.is_empty() {
            continue;
        }

        children.sort_by_key(|child| tree.subtree_size(child));
        ordering.insert(node.trim().to_string(), children.clone());

        for child in children.into_iter().rev() {
            todo.push_front(child);
        }
    }

    ordering
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn worked_example() -> Tree {
        let mut tree = Tree::new();
        tree.add_edge("root", "CELL1");
        tree.add_edge("root", "LOCI1");
        tree.add_edge("LOCI1", "CELL2");
        tree.add_edge("LOCI1", "CELL3");
        tree.add_edge("root", "CELL4");
        tree
    }

    #[test]
    fn children_sorted_ascending_by_subtree_size() {
        let tree = worked_example();
        let ordering = compute(&tree, "root");
        assert_eq!(ordering["root"], vec!["CELL1", "CELL4", "LOCI1"]);
        assert_eq!(ordering["LOCI1"], vec!["CELL2", "CELL3"]);
        assert_eq!(ordering.len(), 2, "leaves must not get entries");
    }

    #[test]
    fn equal_sizes_keep_discovery_order() {
        let mut tree = Tree::new();
        tree.add_edge("root", "B");
        tree.add_edge("root", "A");
        tree.add_edge("root", "C");
        let ordering = compute(&tree, "root");
        assert_eq!(ordering["root"], vec!["B", "A", "C"]);
    }

    #[test]
    fn ordering_file_read_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root\tLOCI1 , CELL1,CELL4").unwrap();
        writeln!(file, "LOCI1\tCELL3, CELL2").unwrap();
        let ordering = from_file(file.path()).unwrap();
        assert_eq!(ordering["root"], vec!["LOCI1", "CELL1", "CELL4"]);
        assert_eq!(ordering["LOCI1"], vec!["CELL3", "CELL2"]);
    }
}
