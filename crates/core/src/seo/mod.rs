//! Rule-based SEO and readability scoring for page and post drafts.
//!
//! Each rule yields an [`Assessment`] rated good/ok/bad; a category score
//! is the rounded mean of its ratings (good = 100, ok = 50, bad = 0).

mod analyzer;
pub mod text;

pub use analyzer::analyze;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Bad,
    Ok,
    Good,
}

impl Rating {
    pub fn points(self) -> u32 {
        match self {
            Rating::Good => 100,
            Rating::Ok => 50,
            Rating::Bad => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Seo,
    Readability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub identifier: String,
    pub score: Rating,
    pub text: String,
    pub category: Category,
    /// Lower is more important.
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub seo_score: u32,
    pub readability_score: u32,
    pub assessments: Vec<Assessment>,
}

impl Analysis {
    pub fn get(&self, identifier: &str) -> Option<&Assessment> {
        self.assessments.iter().find(|a| a.identifier == identifier)
    }

    pub fn category(&self, category: Category) -> impl Iterator<Item = &Assessment> {
        self.assessments.iter().filter(move |a| a.category == category)
    }
}

/// Rounded mean of the category's ratings; an empty category scores 0.
pub fn category_score(assessments: &[Assessment], category: Category) -> u32 {
    let points: Vec<u32> = assessments
        .iter()
        .filter(|a| a.category == category)
        .map(|a| a.score.points())
        .collect();
    if points.is_empty() {
        return 0;
    }
    let sum: u32 = points.iter().sum();
    (f64::from(sum) / points.len() as f64).round() as u32
}
