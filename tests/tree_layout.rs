use cellscape_tools::tree::{self, NodeRecord};
use std::io::Write;
use tempfile::NamedTempFile;

// End-to-end checks of the tree canonicalization pipeline over the three
// on-disk representations, against the layout worked out by hand:
//
//   root -> CELL1, root -> LOCI1, LOCI1 -> CELL2, LOCI1 -> CELL3,
//   root -> CELL4
//
// Computed ordering sorts children ascending by descendant count, so the
// root's children are [CELL1, CELL4, LOCI1] and the leaf columns are
// CELL1=0, CELL4=1, CELL2=2, CELL3=3.

fn write_temp(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn record<'a>(records: &'a [NodeRecord], cell_id: &str) -> &'a NodeRecord {
    records
        .iter()
        .find(|r| r.cell_id() == cell_id)
        .unwrap_or_else(|| panic!("no record for {cell_id}"))
}

fn assert_worked_example_layout(records: &[NodeRecord]) {
    let root = record(records, "root");
    assert_eq!((root.min_index(), root.max_index()), (0, 3));

    let loci = record(records, "LOCI1");
    assert_eq!((loci.min_index(), loci.max_index()), (2, 3));

    for (cell, index) in [("CELL1", 0), ("CELL4", 1), ("CELL2", 2), ("CELL3", 3)] {
        let leaf = record(records, cell);
        assert!(leaf.is_leaf(), "{cell} must be a leaf");
        assert_eq!(leaf.min_index(), index, "{cell} heatmap column");
        assert_eq!(leaf.max_index(), index);
    }
}

#[test]
fn edge_csv_worked_example() {
    let edges = write_temp(
        "source,target\nroot,CELL1\nroot,LOCI1\nLOCI1,CELL2\nLOCI1,CELL3\nroot,CELL4\n",
        ".csv",
    );
    let records = tree::build_tree_records(None, None, None, Some(edges.path())).unwrap();
    assert_eq!(records.len(), 6);
    assert_worked_example_layout(&records);
}

#[test]
fn newick_worked_example() {
    // Same topology as the edge list; LOCI1 is larger than the leaf
    // siblings so the computed ordering pushes it last.
    let newick = write_temp("(cell_CELL1,(cell_CELL2,cell_CELL3)LOCI1,cell_CELL4)root;", ".newick");
    let records = tree::build_tree_records(Some(newick.path()), None, None, None).unwrap();
    assert_worked_example_layout(&records);
}

#[test]
fn gml_with_explicit_root_worked_example() {
    let gml = write_temp(
        r#"
        graph [
          node [ id 0 label "root" ]
          node [ id 1 label "CELL1" ]
          node [ id 2 label "LOCI1" ]
          node [ id 3 label "CELL2" ]
          node [ id 4 label "CELL3" ]
          node [ id 5 label "CELL4" ]
          edge [ source 0 target 1 ]
          edge [ source 0 target 2 ]
          edge [ source 2 target 3 ]
          edge [ source 2 target 4 ]
          edge [ source 0 target 5 ]
        ]
        "#,
        ".gml",
    );
    let records =
        tree::build_tree_records(Some(gml.path()), None, Some("root"), None).unwrap();
    assert_worked_example_layout(&records);
}

#[test]
fn ordering_file_overrides_computed_order() {
    let edges = write_temp(
        "source,target\nroot,CELL1\nroot,LOCI1\nLOCI1,CELL2\nLOCI1,CELL3\nroot,CELL4\n",
        ".csv",
    );
    let ordering = write_temp("root\tLOCI1,CELL1,CELL4\nLOCI1\tCELL3,CELL2\n", ".tsv");
    let records =
        tree::build_tree_records(None, Some(ordering.path()), None, Some(edges.path())).unwrap();

    // File order puts the LOCI1 subtree first.
    for (cell, index) in [("CELL3", 0), ("CELL2", 1), ("CELL1", 2), ("CELL4", 3)] {
        assert_eq!(record(&records, cell).min_index(), index, "{cell}");
    }
    let loci = record(&records, "LOCI1");
    assert_eq!((loci.min_index(), loci.max_index()), (0, 1));
}

#[test]
fn leaf_indices_are_a_contiguous_permutation() {
    // A deeper tree with a singleton chain (root -> TOP -> MID -> ...)
    // that the merger collapses.
    let edges = write_temp(
        concat!(
            "source,target\n",
            "root,TOP\n",
            "TOP,MID\n",
            "MID,L1\n",
            "MID,INNER\n",
            "INNER,L2\n",
            "INNER,L3\n",
            "MID,DEEP\n",
            "DEEP,L4\n",
            "DEEP,L5\n",
            "DEEP,L6\n"
        ),
        ".csv",
    );
    let records = tree::build_tree_records(None, None, None, Some(edges.path())).unwrap();

    let mut leaf_indices: Vec<usize> = records
        .iter()
        .filter(|r| r.is_leaf())
        .map(|r| r.min_index())
        .collect();
    leaf_indices.sort_unstable();
    assert_eq!(leaf_indices, (0..6).collect::<Vec<_>>());

    // The singleton chain shows up as one merged record.
    let merged = record(&records, "root, TOP, MID");
    assert_eq!((merged.min_index(), merged.max_index()), (0, 5));

    // Every internal range width equals its leaf count.
    let inner = record(&records, "INNER");
    assert_eq!(inner.max_index() - inner.min_index() + 1, 2);
    let deep = record(&records, "DEEP");
    assert_eq!(deep.max_index() - deep.min_index() + 1, 3);
}

#[test]
fn multi_root_edge_file_rejected() {
    let edges = write_temp("source,target\nroot,A\nother,B\n", ".csv");
    let err = tree::build_tree_records(None, None, None, Some(edges.path())).unwrap_err();
    let message = format!("{err}");
    assert!(
        message.contains("malformed tree"),
        "unexpected error: {message}"
    );
}
