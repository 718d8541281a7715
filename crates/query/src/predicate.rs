use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// Scalar operand for equality and membership tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    fn matches(&self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (Scalar::Text(want), FieldValue::Text(have)) => want.eq_ignore_ascii_case(have),
            (Scalar::Bool(want), FieldValue::Bool(have)) => want == have,
            (Scalar::Number(want), FieldValue::Number(have)) => want == have,
            (Scalar::Bool(want), FieldValue::Missing) => !want,
            _ => false,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Filter predicate tree evaluated against any [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    All,
    /// Case-insensitive substring match over any of the named fields.
    Search { fields: Vec<String>, needle: String },
    Eq { field: String, value: Scalar },
    In { field: String, values: Vec<Scalar> },
    /// List field holds the given entry.
    Contains { field: String, value: String },
    Flag { field: String, expected: bool },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn search<I, S>(fields: I, needle: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::Search {
            fields: fields.into_iter().map(Into::into).collect(),
            needle: needle.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Predicate::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn one_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Predicate::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn flag(field: impl Into<String>, expected: bool) -> Self {
        Predicate::Flag {
            field: field.into(),
            expected,
        }
    }

    /// Conjunction that collapses trivial cases.
    pub fn and(predicates: Vec<Predicate>) -> Self {
        let mut active: Vec<Predicate> = predicates
            .into_iter()
            .filter(|p| !matches!(p, Predicate::All))
            .collect();
        match active.len() {
            0 => Predicate::All,
            1 => active.remove(0),
            _ => Predicate::And(active),
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Search { fields, needle } => {
                let needle = needle.trim().to_lowercase();
                if needle.is_empty() {
                    return true;
                }
                fields.iter().any(|f| {
                    record
                        .field(f)
                        .texts()
                        .iter()
                        .any(|text| text.to_lowercase().contains(&needle))
                })
            }
            Predicate::Eq { field, value } => value.matches(&record.field(field)),
            Predicate::In { field, values } => {
                let have = record.field(field);
                values.iter().any(|v| v.matches(&have))
            }
            Predicate::Contains { field, value } => record
                .field(field)
                .texts()
                .iter()
                .any(|entry| entry.eq_ignore_ascii_case(value)),
            Predicate::Flag { field, expected } => record.field(field).is_truthy() == *expected,
            Predicate::And(all) => all.iter().all(|p| p.matches(record)),
            Predicate::Or(any) => any.iter().any(|p| p.matches(record)),
            Predicate::Not(inner) => !inner.matches(record),
        }
    }

    /// Keep the records satisfying this predicate, preserving order.
    pub fn filter<'a, R: Record>(&self, items: &'a [R]) -> Vec<&'a R> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn leads() -> Vec<Value> {
        vec![
            json!({"status": "pending", "name": "Ada Lovelace", "sentToHubSpot": false, "tags": ["erp"]}),
            json!({"status": "completed", "name": "Grace Hopper", "sentToHubSpot": true, "tags": ["cloud", "erp"]}),
        ]
    }

    #[test]
    fn eq_keeps_only_matching() {
        let items = vec![json!({"status": "pending"}), json!({"status": "completed"})];
        let pred = Predicate::eq("status", "completed");
        let result = pred.filter(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["status"], "completed");
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = leads();
        let pred = Predicate::eq("status", "completed");
        let once: Vec<Value> = pred.filter(&items).into_iter().cloned().collect();
        let twice: Vec<Value> = pred.filter(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn search_is_case_insensitive() {
        let items = leads();
        let pred = Predicate::search(["name", "email"], "HOPPER");
        assert_eq!(pred.filter(&items).len(), 1);
        let blank = Predicate::search(["name"], "   ");
        assert_eq!(blank.filter(&items).len(), 2);
    }

    #[test]
    fn membership_and_flags() {
        let items = leads();
        assert_eq!(Predicate::contains("tags", "cloud").filter(&items).len(), 1);
        assert_eq!(Predicate::contains("tags", "ERP").filter(&items).len(), 2);
        assert_eq!(Predicate::flag("sentToHubSpot", true).filter(&items).len(), 1);
        assert_eq!(Predicate::flag("missingField", false).filter(&items).len(), 2);
    }

    #[test]
    fn one_of_and_combinators() {
        let items = leads();
        let pred = Predicate::one_of("status", ["pending", "failed"]);
        assert_eq!(pred.filter(&items).len(), 1);

        let both = Predicate::and(vec![
            Predicate::contains("tags", "erp"),
            Predicate::eq("status", "pending").negate(),
        ]);
        let result = both.filter(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["name"], "Grace Hopper");

        let either = Predicate::Or(vec![
            Predicate::eq("status", "pending"),
            Predicate::eq("status", "completed"),
        ]);
        assert_eq!(either.filter(&items).len(), 2);
    }

    #[test]
    fn and_collapses_trivial_cases() {
        assert_eq!(Predicate::and(vec![]), Predicate::All);
        assert_eq!(
            Predicate::and(vec![Predicate::All, Predicate::flag("a", true)]),
            Predicate::flag("a", true)
        );
    }
}
