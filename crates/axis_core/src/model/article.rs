//! Article records: lightweight recommendations and full bodies.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recommendation returned by a subscription decision.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub summary: String,
    /// May carry stray whitespace from the backend; lookups go through the
    /// content store's slug resolution.
    pub slug: String,
}

/// Full article as stored in the content database.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub slug: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub published_date: DateTime<Utc>,
    pub read_time_minutes: u32,
    pub content: String,
    pub is_active: bool,
    #[serde(default)]
    pub view_count: u64,
}

impl Article {
    /// Project to the recommendation shape.
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id,
            title: self.title.clone(),
            summary: self.summary.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Article reference attached to an AI answer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RecommendedArticle {
    pub article_id: i64,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub author: String,
    /// Passed through as sent by the backend.
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub article_url: String,
    #[serde(default)]
    pub read_time_minutes: u32,
}
