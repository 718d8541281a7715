use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sitedesk_query::{FieldValue, FilterField, FilterKind, FilterSchema, Record, SortFields, SortOrder};

use super::ContentBody;
use crate::document::{ContentKind, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSection {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
}

/// A client case study shown on the clients page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientCase {
    pub name: String,
    pub slug: String,
    pub headline: String,
    pub summary: String,
    pub sector: String,
    pub size: String,
    pub logo: String,
    pub featured: bool,
    pub tags: Vec<String>,
    pub content_sections: Vec<ContentSection>,
    pub project_stats: Vec<ProjectStat>,
    pub challenges: Vec<String>,
    pub solutions: Vec<String>,
    pub testimonial: Option<Testimonial>,
}

impl Record for ClientCase {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => self.name.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "headline" => self.headline.as_str().into(),
            "summary" => self.summary.as_str().into(),
            "sector" => self.sector.as_str().into(),
            "size" => self.size.as_str().into(),
            "featured" => self.featured.into(),
            "tags" => self.tags.as_slice().into(),
            "solutions" => self.solutions.as_slice().into(),
            "challenges" => self.challenges.as_slice().into(),
            _ => FieldValue::Missing,
        }
    }
}

const CLIENT_FILTERS: &[FilterField] = &[
    FilterField::new("search", FilterKind::Search(&["name", "headline", "summary", "tags"])),
    FilterField::new("solution", FilterKind::Membership("solutions")),
    FilterField::new("sector", FilterKind::Exact("sector")),
    FilterField::new("size", FilterKind::Exact("size")),
    FilterField::new("tag", FilterKind::Membership("tags")),
];

/// Filters of the public clients listing. Cases carry no timestamps, so
/// `newest`/`oldest` keep the editor's order.
pub fn client_filter_schema() -> FilterSchema {
    FilterSchema {
        fields: CLIENT_FILTERS,
        sort_fields: SortFields::new("", "name", "featured"),
        default_sort: Some(SortOrder::Featured),
        default_per_page: 12,
    }
}

/// Body of the `clients-page` document. The whole list is replaced on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientsPage {
    pub heading: String,
    pub intro: String,
    pub client_cases: Vec<ClientCase>,
}

impl ClientsPage {
    pub fn find(&self, slug: &str) -> Option<&ClientCase> {
        self.client_cases.iter().find(|c| c.slug == slug)
    }

    /// Distinct sectors, in first-seen order, for the sector filter dropdown.
    pub fn sectors(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.client_cases
            .iter()
            .map(|c| c.sector.as_str())
            .filter(|s| !s.is_empty() && seen.insert(*s))
            .collect()
    }
}

impl ContentBody for ClientsPage {
    fn kind() -> ContentKind {
        ContentKind::ClientsPage
    }

    fn title() -> &'static str {
        "Clients Page"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut slugs = HashSet::new();
        for (i, case) in self.client_cases.iter().enumerate() {
            if case.name.trim().is_empty() {
                return Err(ValidationError::missing(format!("clientCases.{i}.name")));
            }
            if case.slug.trim().is_empty() {
                return Err(ValidationError::missing(format!("clientCases.{i}.slug")));
            }
            if !is_slug(&case.slug) {
                return Err(ValidationError::invalid(
                    format!("clientCases.{i}.slug"),
                    "use lowercase letters, digits and dashes",
                ));
            }
            if !slugs.insert(case.slug.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "slug".to_string(),
                    value: case.slug.clone(),
                });
            }
        }
        Ok(())
    }
}

pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !s.starts_with('-')
        && !s.ends_with('-')
}
