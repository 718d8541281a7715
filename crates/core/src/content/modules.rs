use serde::{Deserialize, Serialize};

use super::ContentBody;
use crate::document::ContentKind;

/// Title and description used for a page's `<head>` tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModulePage {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub features: Vec<String>,
    pub metadata: PageMetadata,
}

impl ModulePage {
    /// Metadata with blanks filled from the page itself.
    pub fn resolved_metadata(&self) -> PageMetadata {
        let mut meta = self.metadata.clone();
        if meta.title.trim().is_empty() {
            meta.title = self.title.clone();
        }
        if meta.description.trim().is_empty() {
            meta.description = self.summary.clone();
        }
        meta
    }
}

/// Body of the `modules-page` document: one entry per product module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModulesPage {
    pub modules: Vec<ModulePage>,
}

impl ModulesPage {
    pub fn find(&self, slug: &str) -> Option<&ModulePage> {
        self.modules.iter().find(|m| m.slug == slug)
    }
}

impl ContentBody for ModulesPage {
    fn kind() -> ContentKind {
        ContentKind::ModulesPage
    }

    fn title() -> &'static str {
        "Modules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_falls_back_to_page_fields() {
        let module = ModulePage {
            slug: "crm".into(),
            title: "CRM Module".into(),
            summary: "Pipeline and contacts".into(),
            metadata: PageMetadata {
                description: "Custom description".into(),
                ..PageMetadata::default()
            },
            ..ModulePage::default()
        };
        let meta = module.resolved_metadata();
        assert_eq!(meta.title, "CRM Module");
        assert_eq!(meta.description, "Custom description");

        let page = ModulesPage { modules: vec![module] };
        assert!(page.find("crm").is_some());
        assert!(page.find("erp").is_none());
    }
}
