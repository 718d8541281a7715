use std::collections::BTreeSet;

use serde_json::Value;

use crate::mutation::PatchOperations;
use crate::path::{self, FieldPath, PathError};

/// Draft of one loosely-typed document, edited field by field.
///
/// Every write goes through a [`FieldPath`] and replaces the draft with a
/// new value; the saved copy is never touched until [`mark_saved`].
///
/// [`mark_saved`]: DocumentEditor::mark_saved
#[derive(Debug, Clone, Default)]
pub struct DocumentEditor {
    saved: Value,
    draft: Value,
    touched: BTreeSet<String>,
}

impl DocumentEditor {
    pub fn new(saved: Value) -> Self {
        Self {
            draft: saved.clone(),
            saved,
            touched: BTreeSet::new(),
        }
    }

    pub fn draft(&self) -> &Value {
        &self.draft
    }

    pub fn saved(&self) -> &Value {
        &self.saved
    }

    pub fn get_field(&self, path: &str) -> Result<Option<&Value>, PathError> {
        let path = FieldPath::parse(path)?;
        Ok(path::get(&self.draft, &path))
    }

    pub fn set_field(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        let parsed = FieldPath::parse(path)?;
        let tracked = self.tracked_path(&parsed);
        self.draft = path::set(&self.draft, &parsed, value)?;
        self.touched.insert(tracked);
        Ok(())
    }

    pub fn unset_field(&mut self, path: &str) -> Result<(), PathError> {
        let parsed = FieldPath::parse(path)?;
        let tracked = self.tracked_path(&parsed);
        self.draft = path::unset(&self.draft, &parsed);
        self.touched.insert(tracked);
        Ok(())
    }

    /// Path recorded for an edit. Below an array the whole array is
    /// recorded, because removing an element shifts every later index.
    fn tracked_path(&self, path: &FieldPath) -> String {
        let segments = path.segments();
        (1..segments.len())
            .map(|len| segments[..len].join("."))
            .find(|prefix| {
                FieldPath::parse(prefix)
                    .map(|p| matches!(path::get(&self.draft, &p), Some(Value::Array(_))))
                    .unwrap_or(false)
            })
            .unwrap_or_else(|| path.to_string())
    }

    pub fn has_changes(&self) -> bool {
        self.draft != self.saved
    }

    /// Patch that turns the saved document into the draft, touching only
    /// the paths edited since the last save. Parents sort before their
    /// children, so overlapping paths apply in a consistent order.
    pub fn to_patch(&self) -> PatchOperations {
        self.touched.iter().fold(PatchOperations::default(), |patch, raw| {
            let Ok(parsed) = FieldPath::parse(raw) else {
                return patch;
            };
            let before = path::get(&self.saved, &parsed);
            match path::get(&self.draft, &parsed) {
                Some(after) if Some(after) != before => patch.set_path(raw.clone(), after.clone()),
                None if before.is_some() => patch.unset_path(raw.clone()),
                _ => patch,
            }
        })
    }

    pub fn mark_saved(&mut self, saved: Value) {
        self.draft = saved.clone();
        self.saved = saved;
        self.touched.clear();
    }

    pub fn discard(&mut self) {
        self.draft = self.saved.clone();
        self.touched.clear();
    }
}
