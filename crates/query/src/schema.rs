use std::collections::HashMap;

use crate::error::QueryError;
use crate::listing::ListQuery;
use crate::page::PageRequest;
use crate::predicate::{Predicate, Scalar};
use crate::sort::{SortFields, SortOrder};

/// How a request parameter turns into a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Substring search across several record fields.
    Search(&'static [&'static str]),
    /// Exact (case-insensitive) match; comma-separated values mean "any of".
    Exact(&'static str),
    /// The record's list field must hold the value.
    Membership(&'static str),
    /// Boolean field compared with a `true`/`false` parameter.
    Flag(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub param: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn new(param: &'static str, kind: FilterKind) -> Self {
        Self { param, kind }
    }
}

/// Declared filters, sort fields and paging defaults for one record type.
///
/// Listing endpoints build their query through a schema instead of
/// hand-writing predicate chains, so every page shares one set of rules:
/// blank and `"all"` values are ignored, `sort` names a [`SortOrder`],
/// `page`/`limit` select a page.
#[derive(Debug, Clone)]
pub struct FilterSchema {
    pub fields: &'static [FilterField],
    pub sort_fields: SortFields,
    pub default_sort: Option<SortOrder>,
    pub default_per_page: usize,
}

impl FilterSchema {
    pub fn query_from_params(&self, params: &HashMap<String, String>) -> Result<ListQuery, QueryError> {
        let mut predicates = Vec::new();
        for field in self.fields {
            let Some(raw) = params.get(field.param).map(|v| v.trim()) else {
                continue;
            };
            if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
                continue;
            }
            predicates.push(build_predicate(field, raw)?);
        }

        let sort = match params.get("sort").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<SortOrder>()?),
            None => self.default_sort,
        };

        let page = parse_number(params, "page")?.unwrap_or(1);
        let per_page = parse_number(params, "limit")?.unwrap_or(self.default_per_page);

        Ok(ListQuery {
            filter: Predicate::and(predicates),
            sort,
            page: Some(PageRequest::new(page, per_page)),
        })
    }

    /// Query-parameter names this schema understands, besides paging and sort.
    pub fn params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.param)
    }
}

fn build_predicate(field: &FilterField, raw: &str) -> Result<Predicate, QueryError> {
    let predicate = match field.kind {
        FilterKind::Search(fields) => Predicate::search(fields.iter().copied(), raw),
        FilterKind::Exact(name) => {
            let values: Vec<Scalar> = raw
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(Scalar::from)
                .collect();
            if values.len() == 1 {
                Predicate::Eq {
                    field: name.to_string(),
                    value: values.into_iter().next().unwrap_or(Scalar::Text(String::new())),
                }
            } else {
                Predicate::In {
                    field: name.to_string(),
                    values,
                }
            }
        }
        FilterKind::Membership(name) => Predicate::contains(name, raw),
        FilterKind::Flag(name) => Predicate::flag(name, parse_flag(field.param, raw)?),
    };
    Ok(predicate)
}

fn parse_flag(param: &str, raw: &str) -> Result<bool, QueryError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "sent" => Ok(true),
        "false" | "no" | "0" | "not-sent" => Ok(false),
        _ => Err(QueryError::InvalidFlag {
            param: param.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_number(params: &HashMap<String, String>, param: &str) -> Result<Option<usize>, QueryError> {
    match params.get(param).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| QueryError::InvalidNumber {
            param: param.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[FilterField] = &[
        FilterField::new("search", FilterKind::Search(&["name", "email"])),
        FilterField::new("status", FilterKind::Exact("status")),
        FilterField::new("tag", FilterKind::Membership("tags")),
        FilterField::new("hubspot", FilterKind::Flag("sentToHubSpot")),
    ];

    fn schema() -> FilterSchema {
        FilterSchema {
            fields: FIELDS,
            sort_fields: SortFields::new("createdAt", "name", "featured"),
            default_sort: Some(SortOrder::Newest),
            default_per_page: 10,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn ignores_blank_and_all() {
        let query = schema()
            .query_from_params(&params(&[("status", "all"), ("search", " ")]))
            .unwrap();
        assert_eq!(query.filter, Predicate::All);
        assert_eq!(query.sort, Some(SortOrder::Newest));
        assert_eq!(query.page, Some(PageRequest::new(1, 10)));
    }

    #[test]
    fn builds_each_kind() {
        let query = schema()
            .query_from_params(&params(&[
                ("status", "new,contacted"),
                ("tag", "erp"),
                ("hubspot", "false"),
                ("sort", "name"),
                ("page", "2"),
                ("limit", "5"),
            ]))
            .unwrap();
        assert_eq!(
            query.filter,
            Predicate::And(vec![
                Predicate::one_of("status", ["new", "contacted"]),
                Predicate::contains("tags", "erp"),
                Predicate::flag("sentToHubSpot", false),
            ])
        );
        assert_eq!(query.sort, Some(SortOrder::Name));
        assert_eq!(query.page, Some(PageRequest::new(2, 5)));

        let lead = json!({"status": "Contacted", "tags": ["ERP"], "sentToHubSpot": false});
        assert!(query.filter.matches(&lead));
    }

    #[test]
    fn rejects_bad_values() {
        let err = schema()
            .query_from_params(&params(&[("hubspot", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidFlag { .. }));
        assert!(schema().query_from_params(&params(&[("page", "x")])).is_err());
        assert!(schema().query_from_params(&params(&[("sort", "random")])).is_err());
    }

    #[test]
    fn largest_page_number_yields_an_empty_page() {
        let max = usize::MAX.to_string();
        let query = schema()
            .query_from_params(&params(&[("page", max.as_str()), ("limit", max.as_str())]))
            .unwrap();
        let leads = vec![json!({"name": "Ada", "status": "new"})];
        let listing = query.run(&leads, &schema().sort_fields);
        assert_eq!(listing.total, 1);
        assert!(listing.items.is_empty());
        assert_eq!(listing.page, usize::MAX);
        assert_eq!(listing.total_pages, 1);
    }
}
