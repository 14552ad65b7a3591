use crate::error::LoaderError;
use crate::tree::ordering::OrderingMap;
use std::collections::HashSet;

/// Collapses a chain of single-child internal nodes into one composite id.
///
/// While `node` has exactly one child and that child is itself internal
/// (has an ordering entry), the two are merged under the id
/// `"<node>, <child>"`, which inherits the child's children; the walk then
/// continues from the composite id. A single leaf child, or zero or
/// multiple children, stops the merge.
///
/// The map is threaded through by value and returned alongside the final
/// id; the caller's copy is never mutated behind its back. A chain that
/// revisits a node is a cycle in the ordering map and is reported rather
/// than looped on.
pub fn merge_singleton_chain(
    node: &str,
    mut ordering: OrderingMap,
) -> Result<(String, OrderingMap), LoaderError> {
    let mut current = node.to_string();
    let mut chain: HashSet<String> = HashSet::new();
    chain.insert(current.clone());

    loop {
        let Some(children) = ordering.get(&current) else {
            break;
        };
        if children.len() != 1 {
            break;
        }
        let child = children[0].clone();

        // A child without an ordering entry is a leaf; the chain ends.
        let Some(grandchildren) = ordering.get(&child).cloned() else {
            break;
        };

        if !chain.insert(child.clone()) {
            return Err(LoaderError::MalformedTree(format!(
                "cycle in ordering map: '{child}' revisited while merging '{node}'"
            )));
        }

        current = format!("{current}, {child}");
        ordering.insert(current.clone(), grandchildren);
    }

    Ok((current, ordering))
}
