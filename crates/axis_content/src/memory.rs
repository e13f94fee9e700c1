use std::collections::BTreeSet;

use async_trait::async_trait;
use axis_core::Article;
use tokio::sync::RwLock;

use crate::store::{ContentStore, Result, StoreError};

/// In-process article table, used for tests and static previews.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryContentStore {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: RwLock::new(articles),
        }
    }

    /// Insert or replace by id.
    pub async fn upsert(&self, article: Article) {
        let mut articles = self.articles.write().await;
        match articles.iter_mut().find(|a| a.id == article.id) {
            Some(existing) => *existing = article,
            None => articles.push(article),
        }
    }

    fn newest_first(mut articles: Vec<Article>) -> Vec<Article> {
        articles.sort_by(|a, b| b.published_date.cmp(&a.published_date));
        articles
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_active_articles(&self) -> Result<Vec<Article>> {
        let articles = self.articles.read().await;
        let active = articles.iter().filter(|a| a.is_active).cloned().collect();
        Ok(Self::newest_first(active))
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        let articles = self.articles.read().await;
        let categories: BTreeSet<String> = articles
            .iter()
            .filter(|a| a.is_active)
            .map(|a| a.category.clone())
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn find_by_exact_slug(&self, slug: &str) -> Result<Option<Article>> {
        let articles = self.articles.read().await;
        Ok(articles
            .iter()
            .find(|a| a.is_active && a.slug == slug)
            .cloned())
    }

    async fn find_by_slug_fragment(&self, fragment: &str) -> Result<Option<Article>> {
        let needle = fragment.to_lowercase();
        let articles = self.articles.read().await;
        let matches = articles
            .iter()
            .filter(|a| a.is_active && a.slug.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::newest_first(matches).into_iter().next())
    }

    // Read-modify-write under the write lock; a remote database would need an
    // atomic update instead.
    async fn increment_view_count(&self, id: i64) -> Result<u64> {
        let mut articles = self.articles.write().await;
        let article = articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("id {}", id)))?;
        article.view_count += 1;
        Ok(article.view_count)
    }
}
