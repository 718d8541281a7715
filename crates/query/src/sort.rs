use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::record::{FieldValue, Record};

/// Named orderings offered by the listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Newest,
    Oldest,
    Name,
    Featured,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Name => "name",
            SortOrder::Featured => "featured",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "latest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "name" | "alphabetical" => Ok(SortOrder::Name),
            "featured" => Ok(SortOrder::Featured),
            other => Err(QueryError::InvalidSort(other.to_string())),
        }
    }
}

/// Which record fields back each sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortFields {
    pub created: &'static str,
    pub name: &'static str,
    pub featured: &'static str,
}

impl SortFields {
    pub const fn new(created: &'static str, name: &'static str, featured: &'static str) -> Self {
        Self {
            created,
            name,
            featured,
        }
    }

    /// Sort in place. All orders are stable, so `Featured` only moves
    /// featured records ahead and keeps everything else where it was.
    pub fn sort<R: Record>(&self, items: &mut [R], order: SortOrder) {
        match order {
            SortOrder::Newest => {
                items.sort_by(|a, b| compare_desc(&a.field(self.created), &b.field(self.created)))
            }
            SortOrder::Oldest => {
                items.sort_by(|a, b| compare(&a.field(self.created), &b.field(self.created)))
            }
            SortOrder::Name => items.sort_by(|a, b| compare(&a.field(self.name), &b.field(self.name))),
            SortOrder::Featured => items.sort_by_key(|item| !item.field(self.featured).is_truthy()),
        }
    }
}

/// Total order over field values. Missing values sort last;
/// text compares case-insensitively.
fn compare(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
        (FieldValue::Missing, _) => Ordering::Greater,
        (_, FieldValue::Missing) => Ordering::Less,
        (FieldValue::Text(x), FieldValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (FieldValue::Number(x), FieldValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (FieldValue::Time(x), FieldValue::Time(y)) => x.cmp(y),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Descending [`compare`], still with missing values last.
fn compare_desc(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Missing, _) | (_, FieldValue::Missing) => compare(a, b),
        _ => compare(b, a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const FIELDS: SortFields = SortFields::new("createdAt", "name", "featured");

    fn names(items: &[Value]) -> Vec<&str> {
        items.iter().map(|v| v["name"].as_str().unwrap()).collect()
    }

    fn sample() -> Vec<Value> {
        vec![
            json!({"name": "bravo", "createdAt": "2024-03-01T00:00:00Z", "featured": false}),
            json!({"name": "Alpha", "createdAt": "2024-05-01T00:00:00Z", "featured": true}),
            json!({"name": "charlie", "createdAt": "2024-01-01T00:00:00Z"}),
            json!({"name": "delta", "createdAt": "2024-04-01T00:00:00Z", "featured": true}),
        ]
    }

    #[test]
    fn newest_and_oldest() {
        let mut items = sample();
        FIELDS.sort(&mut items, SortOrder::Newest);
        assert_eq!(names(&items), ["Alpha", "delta", "bravo", "charlie"]);
        FIELDS.sort(&mut items, SortOrder::Oldest);
        assert_eq!(names(&items), ["charlie", "bravo", "delta", "Alpha"]);
    }

    #[test]
    fn undated_records_go_last_both_ways() {
        let mut items = vec![
            json!({"name": "undated"}),
            json!({"name": "old", "createdAt": "2024-01-01T00:00:00Z"}),
            json!({"name": "new", "createdAt": "2024-06-01T00:00:00Z"}),
        ];
        FIELDS.sort(&mut items, SortOrder::Newest);
        assert_eq!(names(&items), ["new", "old", "undated"]);
        FIELDS.sort(&mut items, SortOrder::Oldest);
        assert_eq!(names(&items), ["old", "new", "undated"]);
    }

    #[test]
    fn name_ignores_case() {
        let mut items = sample();
        FIELDS.sort(&mut items, SortOrder::Name);
        assert_eq!(names(&items), ["Alpha", "bravo", "charlie", "delta"]);
    }

    #[test]
    fn featured_is_stable_partition() {
        let mut items = sample();
        FIELDS.sort(&mut items, SortOrder::Featured);
        assert_eq!(names(&items), ["Alpha", "delta", "bravo", "charlie"]);
    }

    #[test]
    fn parse_sort_order() {
        assert_eq!("Newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!("featured".parse::<SortOrder>().unwrap(), SortOrder::Featured);
        assert!("random".parse::<SortOrder>().is_err());
    }
}
