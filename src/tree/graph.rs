use crate::error::LoaderError;
use std::collections::HashMap;

/// Directed tree over string node ids, edges pointing parent -> child.
///
/// Nodes and adjacency lists keep insertion order so every traversal is
/// deterministic for identical input.
#[derive(Debug, Default)]
pub struct Tree {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    in_degree: Vec<u32>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    fn intern(&mut self, id: &str) -> usize {
        if let Some(&ix) = self.index.get(id) {
            return ix;
        }
        let ix = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), ix);
        self.children.push(Vec::new());
        self.in_degree.push(0);
        ix
    }

    pub fn add_edge(&mut self, parent: &str, child: &str) {
        let p = self.intern(parent);
        let c = self.intern(child);
        if !self.children[p].contains(&c) {
            self.children[p].push(c);
            self.in_degree[c] += 1;
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Immediate children of `id`, in edge insertion order. Empty for
    /// leaves and for ids not present in the tree.
    pub fn children_of(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(&ix) => self.children[ix]
                .iter()
                .map(|&c| self.ids[c].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// The unique node with no incoming edge. Anything other than exactly
    /// one candidate means the input was not a rooted tree.
    pub fn root(&self) -> Result<&str, LoaderError> {
        let roots: Vec<&str> = self
            .ids
            .iter()
            .enumerate()
            .filter(|(ix, _)| self.in_degree[*ix] == 0)
            .map(|(_, id)| id.as_str())
            .collect();

        match roots.as_slice() {
            [root] => Ok(*root),
            [] => Err(LoaderError::malformed_tree("no root candidate found")),
            many => Err(LoaderError::MalformedTree(format!(
                "expected a single root, found {}: {}",
                many.len(),
                many.join(", ")
            ))),
        }
    }

    /// Checks that the directed graph is a rooted tree and returns its
    /// root: one in-degree-0 node, exactly one parent everywhere else,
    /// and every node reachable from the root. Inputs that encode cycles
    /// or forests fail here instead of sending a traversal into a loop.
    pub fn validate(&self) -> Result<&str, LoaderError> {
        let root = self.root()?;
        let root_ix = self.index[root];

        for (ix, id) in self.ids.iter().enumerate() {
            if ix != root_ix && self.in_degree[ix] != 1 {
                return Err(LoaderError::MalformedTree(format!(
                    "node '{id}' has {} parents",
                    self.in_degree[ix]
                )));
            }
        }

        let mut visited = vec![false; self.ids.len()];
        visited[root_ix] = true;
        let mut seen = 1;
        let mut stack = vec![root_ix];
        while let Some(ix) = stack.pop() {
            for &child in &self.children[ix] {
                if !visited[child] {
                    visited[child] = true;
                    seen += 1;
                    stack.push(child);
                }
            }
        }
        if seen != self.ids.len() {
            return Err(LoaderError::MalformedTree(format!(
                "{} of {} nodes unreachable from root '{root}'",
                self.ids.len() - seen,
                self.ids.len()
            )));
        }

        Ok(root)
    }

    /// Number of nodes in the subtree rooted at `id`, the node itself
    /// included. Returns 0 for an id the tree does not contain.
    pub fn subtree_size(&self, id: &str) -> usize {
        let Some(&start) = self.index.get(id) else {
            return 0;
        };

        let mut count = 0;
        let mut stack = vec![start];
        while let Some(ix) = stack.pop() {
            count += 1;
            stack.extend(self.children[ix].iter().copied());
        }
        count
    }

    /// Orients an undirected edge list into a directed tree by depth-first
    /// traversal from `root`. Neighbor order follows edge insertion order,
    /// so the orientation is deterministic.
    pub fn orient(edges: &[(String, String)], root: &str) -> Result<Tree, LoaderError> {
        let mut neighbors: HashMap<&str, Vec<&str>> = HashMap::new();
        for (a, b) in edges {
            let forward = neighbors.entry(a.as_str()).or_default();
            if !forward.contains(&b.as_str()) {
                forward.push(b);
            }
            let backward = neighbors.entry(b.as_str()).or_default();
            if !backward.contains(&a.as_str()) {
                backward.push(a);
            }
        }

        if !neighbors.contains_key(root) {
            return Err(LoaderError::MalformedTree(format!(
                "root node '{root}' not present in tree"
            )));
        }

        let mut tree = Tree::new();
        tree.intern(root);
        let mut visited: HashMap<&str, bool> = HashMap::new();
        visited.insert(root, true);
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if let Some(adjacent) = neighbors.get(node) {
                // Each non-root node is claimed by the first traversal that
                // reaches it, so child order follows edge insertion order.
                for &next in adjacent.iter() {
                    if !visited.get(next).copied().unwrap_or(false) {
                        visited.insert(next, true);
                        tree.add_edge(node, next);
                        stack.push(next);
                    }
                }
            }
        }

        Ok(tree)
    }
}
