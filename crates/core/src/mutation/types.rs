//! Patch operations accepted by `PATCH /api/content`.
//! Keys of `set`, `setIfMissing`, `inc` and `dec` are field paths.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOperations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_if_missing: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unset: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inc: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dec: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert: Option<InsertOperation>,
}

impl PatchOperations {
    pub fn is_empty(&self) -> bool {
        self.set.as_ref().map_or(true, Map::is_empty)
            && self.set_if_missing.as_ref().map_or(true, Map::is_empty)
            && self.unset.as_ref().map_or(true, Vec::is_empty)
            && self.inc.as_ref().map_or(true, Map::is_empty)
            && self.dec.as_ref().map_or(true, Map::is_empty)
            && self.insert.is_none()
    }

    pub fn set_path(mut self, path: impl Into<String>, value: Value) -> Self {
        self.set.get_or_insert_with(Map::new).insert(path.into(), value);
        self
    }

    pub fn unset_path(mut self, path: impl Into<String>) -> Self {
        self.unset.get_or_insert_with(Vec::new).push(path.into());
        self
    }
}

/// Insert `items` into an array relative to an element path such as
/// `clientCases.2`. Exactly one anchor is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
    pub items: Vec<Value>,
}

/// Result of applying a patch to a stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub id: String,
    pub operation: String,
    pub revision: String,
}
