//! Newick parsing for clonal tree files.
//!
//! Grammar handled here:
//! ```text
//! tree     = subtree ';'
//! subtree  = '(' children ')' label | label
//! children = subtree (',' subtree)*
//! label    = name? (':' length)?
//! ```
//!
//! Branch lengths are parsed and discarded; only the topology matters for
//! the layout engine. Node labels carrying the `cell_` prefix convention
//! are stripped, and an unnamed outermost clade is given the `root`
//! sentinel label so downstream orientation always starts from `root`.

use crate::error::LoaderError;

const NAME_PREFIX: &str = "cell_";
pub const ROOT_SENTINEL: &str = "root";

/// Parses Newick text into an undirected edge list of `(parent, child)`
/// label pairs, ready for depth-first orientation from the root sentinel.
pub fn parse_edges(text: &str) -> Result<Vec<(String, String)>, LoaderError> {
    let mut parser = Parser::new(text.as_bytes());
    let root = parser.parse_tree()?;

    let mut edges = Vec::new();
    collect_edges(&root, &mut edges)?;
    Ok(edges)
}

/// Strips the `cell_` naming convention from a node label.
pub fn format_name(label: &str) -> &str {
    label.strip_prefix(NAME_PREFIX).unwrap_or(label)
}

struct Clade {
    name: Option<String>,
    children: Vec<Clade>,
}

fn collect_edges(root: &Clade, edges: &mut Vec<(String, String)>) -> Result<(), LoaderError> {
    // The outermost clade gets the root sentinel when the file leaves it
    // unnamed, matching the `root;` convention of the source trees.
    let root_name = match &root.name {
        Some(name) => format_name(name).to_string(),
        None => ROOT_SENTINEL.to_string(),
    };
    walk(root, &root_name, edges)
}

fn walk(clade: &Clade, name: &str, edges: &mut Vec<(String, String)>) -> Result<(), LoaderError> {
    for child in &clade.children {
        let child_name = match &child.name {
            Some(label) => format_name(label).to_string(),
            None => {
                return Err(LoaderError::malformed_tree(
                    "newick tree contains an unlabeled internal node",
                ))
            }
        };
        edges.push((name.to_string(), child_name.clone()));
        walk(child, &child_name, edges)?;
    }
    Ok(())
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn parse_tree(&mut self) -> Result<Clade, LoaderError> {
        self.skip_whitespace();
        let root = self.parse_subtree()?;
        self.skip_whitespace();
        if self.peek() != Some(b';') {
            return Err(LoaderError::malformed_tree(
                "expected ';' at end of newick string",
            ));
        }
        self.pos += 1;
        Ok(root)
    }

    fn parse_subtree(&mut self) -> Result<Clade, LoaderError> {
        self.skip_whitespace();
        let mut children = Vec::new();

        if self.peek() == Some(b'(') {
            self.pos += 1;
            children.push(self.parse_subtree()?);
            loop {
                self.skip_whitespace();
                if self.peek() == Some(b',') {
                    self.pos += 1;
                    children.push(self.parse_subtree()?);
                } else {
                    break;
                }
            }
            if self.peek() != Some(b')') {
                return Err(LoaderError::malformed_tree(
                    "unbalanced parentheses in newick string",
                ));
            }
            self.pos += 1;
        }

        self.skip_whitespace();
        let name = self.parse_name();
        self.skip_whitespace();
        if self.peek() == Some(b':') {
            self.pos += 1;
            self.skip_whitespace();
            let length = self.parse_float_str();
            if length.is_empty() || length.parse::<f64>().is_err() {
                return Err(LoaderError::MalformedTree(format!(
                    "invalid branch length '{length}' in newick string"
                )));
            }
        }

        Ok(Clade {
            name: if name.is_empty() { None } else { Some(name) },
            children,
        })
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b':' | b',' | b')' | b'(' | b';' => break,
                b' ' | b'\t' | b'\n' | b'\r' => break,
                _ => self.pos += 1,
            }
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn parse_float_str(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E' => self.pos += 1,
                _ => break,
            }
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_outer_clade_becomes_root() {
        let edges = parse_edges("(A,B);").unwrap();
        assert_eq!(
            edges,
            vec![
                ("root".to_string(), "A".to_string()),
                ("root".to_string(), "B".to_string())
            ]
        );
    }

    #[test]
    fn named_root_kept() {
        let edges = parse_edges("((A,B)AB,C)root;").unwrap();
        assert_eq!(
            edges,
            vec![
                ("root".to_string(), "AB".to_string()),
                ("AB".to_string(), "A".to_string()),
                ("AB".to_string(), "B".to_string()),
                ("root".to_string(), "C".to_string())
            ]
        );
    }

    #[test]
    fn cell_prefix_stripped() {
        let edges = parse_edges("(cell_SA1,cell_SA2)root;").unwrap();
        assert_eq!(
            edges,
            vec![
                ("root".to_string(), "SA1".to_string()),
                ("root".to_string(), "SA2".to_string())
            ]
        );
    }

    #[test]
    fn branch_lengths_discarded() {
        let edges = parse_edges("(A:0.1,B:2.5e-3)root:0.0;").unwrap();
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn unlabeled_internal_node_rejected() {
        let err = parse_edges("((A,B),C)root;").unwrap_err();
        assert!(matches!(err, LoaderError::MalformedTree(_)));
    }

    #[test]
    fn missing_semicolon_rejected() {
        assert!(parse_edges("(A,B)root").is_err());
    }

    #[test]
    fn unbalanced_parens_rejected() {
        assert!(parse_edges("((A,B)root;").is_err());
    }

    #[test]
    fn bad_branch_length_rejected() {
        assert!(parse_edges("(A:abc,B)root;").is_err());
    }
}
