use chrono::{DateTime, Utc};
use serde_json::Value;

/// A single field value as seen by predicates and sort orders.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Bool(bool),
    Number(f64),
    Time(DateTime<Utc>),
    List(Vec<&'a str>),
}

impl<'a> FieldValue<'a> {
    /// Text content of the field, for search and equality.
    /// Lists yield their entries; scalars other than text yield nothing.
    pub fn texts(&self) -> Vec<&'a str> {
        match self {
            FieldValue::Text(s) => vec![*s],
            FieldValue::List(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Missing => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Time(_) => true,
            FieldValue::List(items) => !items.is_empty(),
        }
    }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Missing)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Time(value)
    }
}

impl<'a> From<&'a [String]> for FieldValue<'a> {
    fn from(value: &'a [String]) -> Self {
        FieldValue::List(value.iter().map(String::as_str).collect())
    }
}

/// Anything the filter engine can look into by field name.
pub trait Record {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> FieldValue<'_> {
        (**self).field(name)
    }
}

/// Loosely-typed JSON records resolve dot-separated names (`author.name`).
impl Record for Value {
    fn field(&self, name: &str) -> FieldValue<'_> {
        let mut current = self;
        for segment in name.split('.') {
            current = match current {
                Value::Object(map) => match map.get(segment) {
                    Some(v) => v,
                    None => return FieldValue::Missing,
                },
                Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                    Some(v) => v,
                    None => return FieldValue::Missing,
                },
                _ => return FieldValue::Missing,
            };
        }
        match current {
            Value::Null => FieldValue::Missing,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Missing),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(items.iter().filter_map(Value::as_str).collect()),
            Value::Object(_) => FieldValue::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_field_lookup() {
        let doc = json!({
            "name": "Acme",
            "featured": true,
            "stats": {"employees": 120},
            "tags": ["erp", "cloud", 3],
            "logo": null,
        });
        assert_eq!(doc.field("name"), FieldValue::Text("Acme"));
        assert_eq!(doc.field("featured"), FieldValue::Bool(true));
        assert_eq!(doc.field("stats.employees"), FieldValue::Number(120.0));
        assert_eq!(doc.field("tags"), FieldValue::List(vec!["erp", "cloud"]));
        assert_eq!(doc.field("logo"), FieldValue::Missing);
        assert_eq!(doc.field("stats.revenue"), FieldValue::Missing);
        assert_eq!(doc.field("name.first"), FieldValue::Missing);
    }

    #[test]
    fn json_array_index() {
        let doc = json!({"sections": [{"title": "Intro"}]});
        assert_eq!(doc.field("sections.0.title"), FieldValue::Text("Intro"));
        assert_eq!(doc.field("sections.4.title"), FieldValue::Missing);
    }

    #[test]
    fn truthiness() {
        assert!(!FieldValue::Missing.is_truthy());
        assert!(!FieldValue::Text("").is_truthy());
        assert!(FieldValue::List(vec!["a"]).is_truthy());
        assert!(!FieldValue::Number(0.0).is_truthy());
    }
}
