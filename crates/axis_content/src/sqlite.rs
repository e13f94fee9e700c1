use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axis_core::Article;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::store::{ContentStore, Result, StoreError};

const ARTICLE_COLUMNS: &str = "id, title, summary, slug, author, category, tags, published_date, \
     read_time_minutes, content, is_active, view_count";

/// SQLite-backed article table.
///
/// Each call opens its own connection on the blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteContentStore {
    db_path: PathBuf,
}

impl SqliteContentStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub async fn init(&self) -> Result<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS articles (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    summary TEXT NOT NULL,
                    slug TEXT NOT NULL,
                    author TEXT NOT NULL,
                    category TEXT NOT NULL,
                    tags TEXT NOT NULL DEFAULT '[]',
                    published_date TEXT NOT NULL,
                    read_time_minutes INTEGER NOT NULL,
                    content TEXT NOT NULL,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    view_count INTEGER NOT NULL DEFAULT 0
                );
                CREATE INDEX IF NOT EXISTS idx_articles_slug ON articles(slug);
                CREATE INDEX IF NOT EXISTS idx_articles_published ON articles(published_date);
                "#,
            )?;
            Ok(())
        })
        .await
    }

    /// Insert or replace a row by id.
    pub async fn upsert_article(&self, article: Article) -> Result<()> {
        self.with_connection(move |connection| {
            let tags = serde_json::to_string(&article.tags)?;
            connection.execute(
                r#"
                INSERT OR REPLACE INTO articles (
                    id, title, summary, slug, author, category, tags, published_date,
                    read_time_minutes, content, is_active, view_count
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    article.id,
                    article.title,
                    article.summary,
                    article.slug,
                    article.author,
                    article.category,
                    tags,
                    article.published_date.to_rfc3339(),
                    article.read_time_minutes,
                    article.content,
                    article.is_active,
                    article.view_count as i64,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn with_connection<T, F>(&self, func: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| StoreError::Task(error.to_string()))?
    }

    async fn query_one(&self, sql: String, param: String) -> Result<Option<Article>> {
        self.with_connection(move |connection| {
            let raw = connection
                .query_row(&sql, params![param], RawArticle::from_row)
                .optional()?;
            raw.map(RawArticle::into_article).transpose()
        })
        .await
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn list_active_articles(&self) -> Result<Vec<Article>> {
        self.with_connection(|connection| {
            let sql = format!(
                "SELECT {} FROM articles WHERE is_active = 1 ORDER BY published_date DESC",
                ARTICLE_COLUMNS
            );
            let mut statement = connection.prepare(&sql)?;
            let rows = statement.query_map([], RawArticle::from_row)?;
            rows.map(|row| row.map_err(StoreError::from).and_then(RawArticle::into_article))
                .collect()
        })
        .await
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        self.with_connection(|connection| {
            let mut statement = connection.prepare(
                "SELECT DISTINCT category FROM articles WHERE is_active = 1 ORDER BY category",
            )?;
            let rows = statement.query_map([], |row| row.get::<_, String>(0))?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn find_by_exact_slug(&self, slug: &str) -> Result<Option<Article>> {
        let sql = format!(
            "SELECT {} FROM articles WHERE slug = ?1 AND is_active = 1 LIMIT 1",
            ARTICLE_COLUMNS
        );
        self.query_one(sql, slug.to_string()).await
    }

    // SQLite's LIKE folds ASCII case only.
    async fn find_by_slug_fragment(&self, fragment: &str) -> Result<Option<Article>> {
        let sql = format!(
            "SELECT {} FROM articles WHERE is_active = 1 AND slug LIKE ?1 ESCAPE '\\' \
             ORDER BY published_date DESC LIMIT 1",
            ARTICLE_COLUMNS
        );
        let pattern = format!("%{}%", escape_like(fragment));
        self.query_one(sql, pattern).await
    }

    async fn increment_view_count(&self, id: i64) -> Result<u64> {
        self.with_connection(move |connection| {
            let changed = connection.execute(
                "UPDATE articles SET view_count = view_count + 1 WHERE id = ?1",
                params![id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("id {}", id)));
            }
            let count: i64 = connection.query_row(
                "SELECT view_count FROM articles WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        })
        .await
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let connection = Connection::open(path)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Column values before parsing the text-encoded fields.
struct RawArticle {
    id: i64,
    title: String,
    summary: String,
    slug: String,
    author: String,
    category: String,
    tags: String,
    published_date: String,
    read_time_minutes: i64,
    content: String,
    is_active: bool,
    view_count: i64,
}

impl RawArticle {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            summary: row.get(2)?,
            slug: row.get(3)?,
            author: row.get(4)?,
            category: row.get(5)?,
            tags: row.get(6)?,
            published_date: row.get(7)?,
            read_time_minutes: row.get(8)?,
            content: row.get(9)?,
            is_active: row.get(10)?,
            view_count: row.get(11)?,
        })
    }

    fn into_article(self) -> Result<Article> {
        let tags: BTreeSet<String> = serde_json::from_str(&self.tags)?;
        let published_date = DateTime::parse_from_rfc3339(&self.published_date)?.with_timezone(&Utc);
        let read_time_minutes = u32::try_from(self.read_time_minutes).map_err(|_| {
            StoreError::InvalidData(format!(
                "read_time_minutes {} for article {}",
                self.read_time_minutes, self.id
            ))
        })?;
        Ok(Article {
            id: self.id,
            title: self.title,
            summary: self.summary,
            slug: self.slug,
            author: self.author,
            category: self.category,
            tags,
            published_date,
            read_time_minutes,
            content: self.content,
            is_active: self.is_active,
            view_count: self.view_count.max(0) as u64,
        })
    }
}
