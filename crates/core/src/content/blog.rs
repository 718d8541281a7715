use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitedesk_query::{FieldValue, FilterField, FilterKind, FilterSchema, Record, SortFields, SortOrder};

use super::clients::is_slug;
use super::ContentBody;
use crate::document::{ContentKind, ValidationError};
use crate::seo::{analyze, Analysis};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub cover_image: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub focus_keyword: String,
    pub meta_description: String,
}

impl BlogPost {
    /// SEO and readability scores for this post as it stands.
    pub fn analysis(&self) -> Analysis {
        analyze(&self.title, &self.body, &self.focus_keyword, &self.meta_description)
    }
}

impl Record for BlogPost {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "title" => self.title.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "excerpt" => self.excerpt.as_str().into(),
            "body" => self.body.as_str().into(),
            "category" => self.category.as_str().into(),
            "author" => self.author.as_str().into(),
            "tags" => self.tags.as_slice().into(),
            "featured" => self.featured.into(),
            "published" => self.published.into(),
            "publishedAt" => self.published_at.map(FieldValue::Time).unwrap_or(FieldValue::Missing),
            _ => FieldValue::Missing,
        }
    }
}

const BLOG_FILTERS: &[FilterField] = &[
    FilterField::new("search", FilterKind::Search(&["title", "excerpt", "tags", "author"])),
    FilterField::new("category", FilterKind::Exact("category")),
    FilterField::new("tag", FilterKind::Membership("tags")),
];

pub fn blog_filter_schema() -> FilterSchema {
    FilterSchema {
        fields: BLOG_FILTERS,
        sort_fields: SortFields::new("publishedAt", "title", "featured"),
        default_sort: Some(SortOrder::Newest),
        default_per_page: 9,
    }
}

/// Body of the `blog-page` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPage {
    pub heading: String,
    pub intro: String,
    pub categories: Vec<String>,
    pub posts: Vec<BlogPost>,
}

impl BlogPage {
    /// Posts visible on the public site.
    pub fn published(&self) -> Vec<BlogPost> {
        self.posts.iter().filter(|p| p.published).cloned().collect()
    }

    pub fn find_published(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.published && p.slug == slug)
    }
}

impl ContentBody for BlogPage {
    fn kind() -> ContentKind {
        ContentKind::BlogPage
    }

    fn title() -> &'static str {
        "Blog Page"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut slugs = std::collections::HashSet::new();
        for (i, post) in self.posts.iter().enumerate() {
            if post.title.trim().is_empty() {
                return Err(ValidationError::missing(format!("posts.{i}.title")));
            }
            if !is_slug(&post.slug) {
                return Err(ValidationError::invalid(
                    format!("posts.{i}.slug"),
                    "use lowercase letters, digits and dashes",
                ));
            }
            if !slugs.insert(post.slug.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "slug".to_string(),
                    value: post.slug.clone(),
                });
            }
        }
        Ok(())
    }
}
