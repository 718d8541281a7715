use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ContentBody;
use crate::document::{ContentKind, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetType {
    #[default]
    Script,
    Meta,
    Style,
    Html,
}

/// Where in the page a snippet is injected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnippetLocation {
    #[default]
    Head,
    BodyTop,
    BodyBottom,
}

impl SnippetLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetLocation::Head => "head",
            SnippetLocation::BodyTop => "body-top",
            SnippetLocation::BodyBottom => "body-bottom",
        }
    }
}

impl fmt::Display for SnippetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetLocation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => Ok(SnippetLocation::Head),
            "body-top" => Ok(SnippetLocation::BodyTop),
            "body-bottom" => Ok(SnippetLocation::BodyBottom),
            other => Err(ValidationError::invalid("location", format!("unknown location {other:?}"))),
        }
    }
}

/// Injectable script/meta fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snippet {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub snippet_type: SnippetType,
    pub location: SnippetLocation,
    pub content: String,
    pub is_active: bool,
    /// Paths the snippet applies to. Empty, `*` or `all` mean every page;
    /// `prefix/*` matches everything below `prefix`.
    pub pages: Vec<String>,
    pub priority: i32,
}

impl Snippet {
    pub fn applies_to(&self, page: &str) -> bool {
        if self.pages.is_empty() {
            return true;
        }
        self.pages.iter().any(|pattern| {
            let pattern = pattern.trim();
            match pattern {
                "*" | "all" => true,
                _ => match pattern.strip_suffix("/*") {
                    Some(prefix) => page == prefix || page.starts_with(&format!("{prefix}/")),
                    None => normalize(pattern) == normalize(page),
                },
            }
        })
    }
}

fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Body of the `snippets` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnippetSet {
    pub snippets: Vec<Snippet>,
}

impl SnippetSet {
    /// Active snippets for `page` at `location`, highest priority first.
    /// Equal priorities keep their stored order.
    pub fn snippets_for(&self, page: &str, location: SnippetLocation) -> Vec<&Snippet> {
        let mut selected: Vec<&Snippet> = self
            .snippets
            .iter()
            .filter(|s| s.is_active && s.location == location && s.applies_to(page))
            .collect();
        selected.sort_by(|a, b| b.priority.cmp(&a.priority));
        selected
    }

    pub fn render(&self, page: &str, location: SnippetLocation) -> String {
        self.snippets_for(page, location)
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ContentBody for SnippetSet {
    fn kind() -> ContentKind {
        ContentKind::Snippets
    }

    fn title() -> &'static str {
        "Snippets"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (i, snippet) in self.snippets.iter().enumerate() {
            if snippet.title.trim().is_empty() {
                return Err(ValidationError::missing(format!("snippets.{i}.title")));
            }
            if snippet.content.trim().is_empty() {
                return Err(ValidationError::missing(format!("snippets.{i}.content")));
            }
        }
        Ok(())
    }
}
