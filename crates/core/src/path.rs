//! Dot-separated field paths into loosely-typed JSON documents.
//!
//! `companyInfo.contact.phone.text` walks object keys; a numeric segment
//! indexes an array when the value at that point is an array. Writes never
//! touch the input: [`set`] and [`unset`] hand back a new value.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("field path is empty")]
    Empty,
    #[error("field path {0:?} has an empty segment")]
    EmptySegment(String),
    #[error("cannot step into {kind} at {at:?}")]
    NotAContainer { at: String, kind: &'static str },
    #[error("{segment:?} is not an array index at {at:?}")]
    NotAnIndex { at: String, segment: String },
    #[error("index {index} out of bounds (len {len}) at {at:?}")]
    OutOfBounds { at: String, index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path of the parent container and the final segment.
    pub fn split_last(&self) -> (Option<FieldPath>, &str) {
        let (last, parent) = self
            .segments
            .split_last()
            .map(|(last, rest)| (last.as_str(), rest))
            .unwrap_or(("", &[]));
        let parent = (!parent.is_empty()).then(|| FieldPath {
            segments: parent.to_vec(),
        });
        (parent, last)
    }

    fn prefix(&self, len: usize) -> String {
        self.segments[..len].join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read the value at `path`, or `None` when any step is missing.
pub fn get<'a>(value: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Mutable variant of [`get`].
pub fn get_mut<'a>(value: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
    path.segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    })
}

/// Return a copy of `value` with `new` written at `path`.
pub fn set(value: &Value, path: &FieldPath, new: Value) -> Result<Value, PathError> {
    let mut out = value.clone();
    set_in_place(&mut out, path, new)?;
    Ok(out)
}

/// Write `new` at `path`, creating missing intermediate objects.
///
/// Null intermediates are replaced by objects. Array segments must be an
/// index no greater than the length; writing at the length appends.
pub fn set_in_place(value: &mut Value, path: &FieldPath, new: Value) -> Result<(), PathError> {
    let mut current = value;
    let last = path.segments.len() - 1;
    for (depth, segment) in path.segments.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let is_last = depth == last;
        current = match current {
            Value::Object(map) => {
                if is_last {
                    map.insert(segment.clone(), new);
                    return Ok(());
                }
                map.entry(segment.clone()).or_insert(Value::Null)
            }
            Value::Array(items) => {
                let index = segment.parse::<usize>().map_err(|_| PathError::NotAnIndex {
                    at: path.prefix(depth),
                    segment: segment.clone(),
                })?;
                if index > items.len() {
                    return Err(PathError::OutOfBounds {
                        at: path.prefix(depth),
                        index,
                        len: items.len(),
                    });
                }
                if index == items.len() {
                    items.push(Value::Null);
                }
                if is_last {
                    items[index] = new;
                    return Ok(());
                }
                &mut items[index]
            }
            other => {
                return Err(PathError::NotAContainer {
                    at: path.prefix(depth),
                    kind: kind_name(other),
                })
            }
        };
    }
    Ok(())
}

/// Return a copy of `value` without the field at `path`.
/// Removing something that is not there is not an error.
pub fn unset(value: &Value, path: &FieldPath) -> Value {
    let mut out = value.clone();
    unset_in_place(&mut out, path);
    out
}

pub fn unset_in_place(value: &mut Value, path: &FieldPath) -> Option<Value> {
    let (parent, last) = path.split_last();
    let container = match parent {
        Some(parent) => get_mut(value, &parent)?,
        None => value,
    };
    match container {
        Value::Object(map) => map.remove(last),
        Value::Array(items) => {
            let index = last.parse::<usize>().ok()?;
            (index < items.len()).then(|| items.remove(index))
        }
        _ => None,
    }
}
