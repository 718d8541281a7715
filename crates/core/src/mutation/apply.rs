use serde_json::{Number, Value};
use thiserror::Error;

use super::types::{InsertOperation, PatchOperations};
use crate::path::{self, FieldPath, PathError};

#[derive(Debug, Error, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("{0} is not a number")]
    NotANumber(String),
    #[error("insert needs exactly one of before, after or replace")]
    InsertAnchor,
    #[error("insert anchor {0} does not point at an array element")]
    InsertTarget(String),
}

/// Apply patch operations to a document body and return the new body.
///
/// Order: setIfMissing, set, unset, inc, dec, insert. The input is untouched.
pub fn apply_patch(content: &Value, ops: &PatchOperations) -> Result<Value, MutationError> {
    let mut out = content.clone();

    if let Some(entries) = &ops.set_if_missing {
        for (raw, value) in entries {
            let path = FieldPath::parse(raw)?;
            if path::get(&out, &path).map_or(true, Value::is_null) {
                path::set_in_place(&mut out, &path, value.clone())?;
            }
        }
    }
    if let Some(entries) = &ops.set {
        for (raw, value) in entries {
            path::set_in_place(&mut out, &FieldPath::parse(raw)?, value.clone())?;
        }
    }
    if let Some(paths) = &ops.unset {
        for raw in paths {
            path::unset_in_place(&mut out, &FieldPath::parse(raw)?);
        }
    }
    if let Some(entries) = &ops.inc {
        for (raw, by) in entries {
            add(&mut out, raw, by, 1.0)?;
        }
    }
    if let Some(entries) = &ops.dec {
        for (raw, by) in entries {
            add(&mut out, raw, by, -1.0)?;
        }
    }
    if let Some(insert) = &ops.insert {
        apply_insert(&mut out, insert)?;
    }
    Ok(out)
}

fn add(doc: &mut Value, raw: &str, by: &Value, sign: f64) -> Result<(), MutationError> {
    let path = FieldPath::parse(raw)?;
    let delta = by
        .as_f64()
        .ok_or_else(|| MutationError::NotANumber(format!("{raw} operand")))?;
    let current = match path::get(doc, &path) {
        None | Some(Value::Null) => Value::from(0),
        Some(v) => v.clone(),
    };
    let exact = match (current.as_i64(), by.as_i64()) {
        (Some(a), Some(b)) => b.checked_mul(sign as i64).and_then(|b| a.checked_add(b)),
        _ => None,
    };
    // Integers stay integers until they leave the i64 range.
    let next = match exact {
        Some(n) => Value::from(n),
        None => {
            let a = current
                .as_f64()
                .ok_or_else(|| MutationError::NotANumber(raw.to_string()))?;
            Number::from_f64(a + sign * delta)
                .map(Value::Number)
                .ok_or_else(|| MutationError::NotANumber(raw.to_string()))?
        }
    };
    path::set_in_place(doc, &path, next)?;
    Ok(())
}

fn apply_insert(doc: &mut Value, insert: &InsertOperation) -> Result<(), MutationError> {
    let (anchor, offset, replace) = match (&insert.before, &insert.after, &insert.replace) {
        (Some(a), None, None) => (a, 0, false),
        (None, Some(a), None) => (a, 1, false),
        (None, None, Some(a)) => (a, 0, true),
        _ => return Err(MutationError::InsertAnchor),
    };
    let anchor_path = FieldPath::parse(anchor)?;
    let (parent, last) = anchor_path.split_last();
    let parent = parent.ok_or_else(|| MutationError::InsertTarget(anchor.clone()))?;
    let items = path::get_mut(doc, &parent)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| MutationError::InsertTarget(anchor.clone()))?;
    let len = items.len() as i64;
    // Negative indexes count from the end: `-1` is the last element.
    let index = last
        .parse::<i64>()
        .map(|i| if i < 0 { len + i } else { i })
        .map_err(|_| MutationError::InsertTarget(anchor.clone()))?;
    if index < 0 || index > len || (replace && index == len) {
        return Err(MutationError::InsertTarget(anchor.clone()));
    }
    let at = (index as usize + offset).min(items.len());
    if replace {
        items.remove(at);
    }
    for (i, item) in insert.items.iter().enumerate() {
        items.insert(at + i, item.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_unset_paths() {
        let doc = json!({"companyInfo": {"name": "Old", "fax": "123"}});
        let ops = PatchOperations::default()
            .set_path("companyInfo.name", json!("New"))
            .set_path("copyright", json!("© 2024"))
            .unset_path("companyInfo.fax");
        let out = apply_patch(&doc, &ops).unwrap();
        assert_eq!(out, json!({"companyInfo": {"name": "New"}, "copyright": "© 2024"}));
        assert_eq!(doc["companyInfo"]["name"], "Old");
    }

    #[test]
    fn set_if_missing_keeps_existing() {
        let doc = json!({"title": "Keep", "subtitle": null});
        let ops: PatchOperations = serde_json::from_value(json!({
            "setIfMissing": {"title": "Replace", "subtitle": "Filled", "tags": []}
        }))
        .unwrap();
        let out = apply_patch(&doc, &ops).unwrap();
        assert_eq!(out, json!({"title": "Keep", "subtitle": "Filled", "tags": []}));
    }

    #[test]
    fn inc_and_dec() {
        let doc = json!({"stats": {"views": 10, "ratio": 1.5}});
        let ops: PatchOperations = serde_json::from_value(json!({
            "inc": {"stats.views": 5, "stats.clicks": 2, "stats.ratio": 0.25},
            "dec": {"stats.views": 1}
        }))
        .unwrap();
        let out = apply_patch(&doc, &ops).unwrap();
        assert_eq!(out["stats"]["views"], 14);
        assert_eq!(out["stats"]["clicks"], 2);
        assert_eq!(out["stats"]["ratio"], 1.75);

        let bad: PatchOperations =
            serde_json::from_value(json!({"inc": {"stats": 1}})).unwrap();
        assert!(matches!(apply_patch(&doc, &bad), Err(MutationError::NotANumber(_))));
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        let doc = json!({"hi": i64::MAX, "lo": i64::MIN});
        let ops: PatchOperations = serde_json::from_value(json!({
            "inc": {"hi": 1},
            "dec": {"lo": 1}
        }))
        .unwrap();
        let out = apply_patch(&doc, &ops).unwrap();
        assert!(out["hi"].is_f64());
        assert!(out["hi"].as_f64().unwrap() >= i64::MAX as f64);
        assert!(out["lo"].as_f64().unwrap() <= i64::MIN as f64);

        let dec_min: PatchOperations =
            serde_json::from_value(json!({"dec": {"hi": i64::MIN}})).unwrap();
        assert!(apply_patch(&json!({"hi": 0}), &dec_min).unwrap()["hi"].is_f64());
    }

    #[test]
    fn insert_relative_to_anchor() {
        let doc = json!({"items": ["a", "b", "c"]});
        let after: PatchOperations = serde_json::from_value(json!({
            "insert": {"after": "items.-1", "items": ["d"]}
        }))
        .unwrap();
        assert_eq!(apply_patch(&doc, &after).unwrap()["items"], json!(["a", "b", "c", "d"]));

        let before: PatchOperations = serde_json::from_value(json!({
            "insert": {"before": "items.0", "items": ["z", "y"]}
        }))
        .unwrap();
        assert_eq!(
            apply_patch(&doc, &before).unwrap()["items"],
            json!(["z", "y", "a", "b", "c"])
        );

        let replace: PatchOperations = serde_json::from_value(json!({
            "insert": {"replace": "items.1", "items": ["B"]}
        }))
        .unwrap();
        assert_eq!(apply_patch(&doc, &replace).unwrap()["items"], json!(["a", "B", "c"]));
    }

    #[test]
    fn insert_errors() {
        let doc = json!({"items": ["a"], "name": "x"});
        let two_anchors: PatchOperations = serde_json::from_value(json!({
            "insert": {"before": "items.0", "after": "items.0", "items": []}
        }))
        .unwrap();
        assert_eq!(apply_patch(&doc, &two_anchors), Err(MutationError::InsertAnchor));
        let not_array: PatchOperations = serde_json::from_value(json!({
            "insert": {"after": "name.0", "items": ["b"]}
        }))
        .unwrap();
        assert!(matches!(
            apply_patch(&doc, &not_array),
            Err(MutationError::InsertTarget(_))
        ));
    }

    #[test]
    fn empty_patch() {
        assert!(PatchOperations::default().is_empty());
        assert!(!PatchOperations::default().unset_path("a").is_empty());
    }
}
