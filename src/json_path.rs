//! Minimal JSONPath evaluator: root `$`, dotted field access, and
//! bracketed integer indices, chained in any order (`$.a.b[0].c`).
//!
//! This deliberately does not implement wildcards, filters, or recursive
//! descent — the spec's test corpus only needs the subset above, and
//! generalizing further would make the determinism and type-conflict rules
//! harder to reason about for no benefit.

use serde_json::Map;
use serde_json::Value;

use crate::error::Result;
use crate::error::SpecadoError;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// A parsed JSONPath, ready to be read or written against a [`Value`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
    raw: String,
}

impl Path {
    /// The original path string this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Parse a path string such as `$.messages[0].content`.
///
/// Fatal on malformed syntax, per spec §4.1 (`E_PATH_SYNTAX`).
pub fn parse(path: &str) -> Result<Path> {
    let err = |reason: &str| SpecadoError::PathSyntax {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = path.char_indices().peekable();
    match chars.next() {
        Some((_, '$')) => {}
        _ => return Err(err("path must start with '$'")),
    }

    let mut segments = Vec::new();
    let bytes = path.as_bytes();
    let mut i = 1usize;

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != b'.' && bytes[i] != b'[' {
                    i += 1;
                }
                if start == i {
                    return Err(err("expected a field name after '.'"));
                }
                let field = &path[start..i];
                if !is_valid_field(field) {
                    return Err(err("field names must be alphanumeric or '_'"));
                }
                segments.push(Segment::Field(field.to_string()));
            }
            b'[' => {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != b']' {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(err("unterminated '['"));
                }
                let index_str = &path[start..i];
                let index: usize = index_str
                    .parse()
                    .map_err(|_| err("only non-negative integer indices are supported"))?;
                segments.push(Segment::Index(index));
                i += 1; // consume ']'
            }
            _ => return Err(err("expected '.' or '[' after a path segment")),
        }
    }

    if segments.is_empty() && path != "$" {
        return Err(err("empty path"));
    }

    Ok(Path {
        segments,
        raw: path.to_string(),
    })
}

fn is_valid_field(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Read the value at `path` within `root`. Returns `None` if any segment
/// along the way is absent (an "absent" read, not an error).
pub fn read<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = root;
    for segment in &path.segments {
        current = match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => map.get(name)?,
            (Segment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path` within `root`, creating intermediate objects and
/// arrays as needed.
///
/// Refuses to overwrite a non-matching container type (e.g. writing a field
/// into what is currently an array) with a structural [`SpecadoError::TypeConflict`].
pub fn write(root: &mut Value, path: &Path, value: Value) -> Result<()> {
    write_segments(root, &path.segments, value, path.as_str())
}

/// Delete whatever is at `path`, if present. A no-op if any segment along
/// the way is absent.
pub fn delete(root: &mut Value, path: &Path) {
    let Some((last, init)) = path.segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in init {
        current = match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => {
                let Some(next) = map.get_mut(name) else {
                    return;
                };
                next
            }
            (Segment::Index(idx), Value::Array(arr)) => {
                let Some(next) = arr.get_mut(*idx) else {
                    return;
                };
                next
            }
            _ => return,
        };
    }
    match (last, current) {
        (Segment::Field(name), Value::Object(map)) => {
            map.remove(name);
        }
        (Segment::Index(idx), Value::Array(arr)) if *idx < arr.len() => {
            arr.remove(*idx);
        }
        _ => {}
    }
}

fn write_segments(current: &mut Value, segments: &[Segment], value: Value, raw: &str) -> Result<()> {
    let Some((segment, rest)) = segments.split_first() else {
        *current = value;
        return Ok(());
    };

    match segment {
        Segment::Field(name) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let Value::Object(map) = current else {
                return Err(SpecadoError::TypeConflict {
                    path: raw.to_string(),
                    reason: format!(
                        "cannot write field '{name}' into a non-object value"
                    ),
                });
            };
            let entry = map.entry(name.clone()).or_insert(Value::Null);
            write_segments(entry, rest, value, raw)
        }
        Segment::Index(idx) => {
            if current.is_null() {
                *current = Value::Array(Vec::new());
            }
            let Value::Array(arr) = current else {
                return Err(SpecadoError::TypeConflict {
                    path: raw.to_string(),
                    reason: format!("cannot write index [{idx}] into a non-array value"),
                });
            };
            if arr.len() <= *idx {
                arr.resize(idx + 1, Value::Null);
            }
            write_segments(&mut arr[*idx], rest, value, raw)
        }
    }
}
