//! Minimal GML reader for tree files.
//!
//! Handles the subset of GML the tree inputs use: a `graph` block holding
//! `node` blocks (`id`, optional `label`) and `edge` blocks (`source`,
//! `target`). Edges are resolved to node labels, falling back to the
//! numeric id when a node carries no label. All other keys are skipped.

use crate::error::LoaderError;
use std::collections::HashMap;

/// Parses GML text into `(source, target)` label pairs in file order.
pub fn parse_edges(text: &str) -> Result<Vec<(String, String)>, LoaderError> {
    let tokens = tokenize(text)?;
    let mut labels: HashMap<i64, String> = HashMap::new();
    let mut edges: Vec<(i64, i64)> = Vec::new();

    let mut pos = 0;
    while pos < tokens.len() {
        match &tokens[pos] {
            Token::Key(key) if key == "node" => {
                let (attrs, next) = parse_block(&tokens, pos + 1)?;
                let id = require_int(&attrs, "id", "node")?;
                if let Some(Value::Str(label)) = attrs.get("label") {
                    labels.insert(id, label.trim().to_string());
                }
                pos = next;
            }
            Token::Key(key) if key == "edge" => {
                let (attrs, next) = parse_block(&tokens, pos + 1)?;
                let source = require_int(&attrs, "source", "edge")?;
                let target = require_int(&attrs, "target", "edge")?;
                edges.push((source, target));
                pos = next;
            }
            _ => pos += 1,
        }
    }

    let resolve = |id: i64| -> String {
        labels
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    };

    Ok(edges
        .into_iter()
        .map(|(s, t)| (resolve(s), resolve(t)))
        .collect())
}

#[derive(Debug, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Str(String),
    Open,
    Close,
}

#[derive(Debug)]
enum Value {
    Int(i64),
    Str(String),
}

fn tokenize(text: &str) -> Result<Vec<Token>, LoaderError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '[' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ']' => {
                tokens.push(Token::Close);
                chars.next();
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(ch) => s.push(ch),
                        None => {
                            return Err(LoaderError::malformed_tree(
                                "unterminated string in gml file",
                            ))
                        }
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                let mut s = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.' || ch == 'e' || ch == 'E' {
                        s.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Non-integer numerics (e.g. edge weights) are kept as
                // strings and ignored by the block reader.
                match s.parse::<i64>() {
                    Ok(n) => tokens.push(Token::Int(n)),
                    Err(_) => tokens.push(Token::Str(s)),
                }
            }
            _ => {
                let mut s = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        s.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if s.is_empty() {
                    return Err(LoaderError::MalformedTree(format!(
                        "unexpected character '{c}' in gml file"
                    )));
                }
                tokens.push(Token::Key(s));
            }
        }
    }

    Ok(tokens)
}

/// Reads one `[ key value ... ]` block starting at `pos`, returning its
/// attributes and the index just past the closing bracket. Nested blocks
/// are skipped.
fn parse_block(
    tokens: &[Token],
    pos: usize,
) -> Result<(HashMap<String, Value>, usize), LoaderError> {
    if tokens.get(pos) != Some(&Token::Open) {
        return Err(LoaderError::malformed_tree(
            "expected '[' after node/edge keyword in gml file",
        ));
    }

    let mut attrs = HashMap::new();
    let mut ix = pos + 1;
    while ix < tokens.len() {
        match &tokens[ix] {
            Token::Close => return Ok((attrs, ix + 1)),
            Token::Key(key) => {
                match tokens.get(ix + 1) {
                    Some(Token::Int(n)) => {
                        attrs.insert(key.clone(), Value::Int(*n));
                        ix += 2;
                    }
                    Some(Token::Str(s)) => {
                        attrs.insert(key.clone(), Value::Str(s.clone()));
                        ix += 2;
                    }
                    Some(Token::Open) => {
                        let (_, next) = parse_block(tokens, ix + 1)?;
                        ix = next;
                    }
                    _ => ix += 1,
                }
            }
            _ => ix += 1,
        }
    }

    Err(LoaderError::malformed_tree("unterminated block in gml file"))
}

fn require_int(
    attrs: &HashMap<String, Value>,
    key: &str,
    block: &str,
) -> Result<i64, LoaderError> {
    match attrs.get(key) {
        Some(Value::Int(n)) => Ok(*n),
        _ => Err(LoaderError::MalformedTree(format!(
            "gml {block} block missing integer '{key}'"
        ))),
    }
}
