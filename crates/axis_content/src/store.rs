use async_trait::async_trait;
use axis_core::Article;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("time parse error: {0}")]
    Chrono(#[from] chrono::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error("article not found: {0}")]
    NotFound(String),

    #[error("invalid article data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read interface to the article table.
///
/// Every lookup is restricted to active articles.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Active articles, newest first.
    async fn list_active_articles(&self) -> Result<Vec<Article>>;

    /// Distinct categories of active articles, sorted.
    async fn list_categories(&self) -> Result<Vec<String>>;

    /// Case-sensitive match on the slug exactly as given.
    async fn find_by_exact_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// Case-insensitive substring match; newest match wins.
    async fn find_by_slug_fragment(&self, fragment: &str) -> Result<Option<Article>>;

    /// Returns the new count.
    async fn increment_view_count(&self, id: i64) -> Result<u64>;

    /// Exact match first; if nothing matched (and nothing failed), retry with
    /// the trimmed slug as a substring. A slug that trims to nothing never
    /// falls back, since it would match every article.
    async fn find_active_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        if let Some(article) = self.find_by_exact_slug(slug).await? {
            return Ok(Some(article));
        }

        let fragment = slug.trim();
        if fragment.is_empty() {
            return Ok(None);
        }

        tracing::debug!(slug, fragment, "No exact slug match, trying fragment match");
        self.find_by_slug_fragment(fragment).await
    }
}
