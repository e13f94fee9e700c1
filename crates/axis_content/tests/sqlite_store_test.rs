//! SqliteContentStore against a scratch database file

use std::collections::BTreeSet;

use axis_content::{ContentStore, SqliteContentStore, StoreError};
use axis_core::Article;
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn article(id: i64, slug: &str, category: &str, day: u32, active: bool) -> Article {
    Article {
        id,
        title: format!("Article {id}"),
        summary: "summary".to_string(),
        slug: slug.to_string(),
        author: "Grace".to_string(),
        category: category.to_string(),
        tags: ["qubits", "hardware"].iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        published_date: Utc.with_ymd_and_hms(2024, 2, day, 12, 0, 0).unwrap(),
        read_time_minutes: 6,
        content: "long body".to_string(),
        is_active: active,
        view_count: 0,
    }
}

async fn seeded_store(dir: &std::path::Path) -> SqliteContentStore {
    let store = SqliteContentStore::new(dir.join("content").join("articles.db"));
    store.init().await.expect("init schema");
    for row in [
        article(1, "quantum computing", "Quantum Computing", 2, true),
        article(2, "ai-ethics", "Artificial Intelligence", 4, true),
        article(3, "web3-wallets", "Web3", 6, false),
        article(4, "100%_uptime", "Robotics", 8, true),
    ] {
        store.upsert_article(row).await.expect("seed article");
    }
    store
}

#[tokio::test]
async fn slug_with_trailing_space_resolves_via_fallback() {
    let dir = tempdir().expect("temp dir");
    let store = seeded_store(dir.path()).await;

    assert!(store
        .find_by_exact_slug("quantum computing ")
        .await
        .unwrap()
        .is_none());

    let found = store
        .find_active_by_slug("quantum computing ")
        .await
        .unwrap()
        .expect("fallback match");
    assert_eq!(found.id, 1);
    assert_eq!(found.tags.len(), 2);
    assert_eq!(found.published_date, Utc.with_ymd_and_hms(2024, 2, 2, 12, 0, 0).unwrap());
}

#[tokio::test]
async fn fragment_match_is_case_insensitive_and_skips_inactive() {
    let dir = tempdir().expect("temp dir");
    let store = seeded_store(dir.path()).await;

    let found = store.find_active_by_slug("AI-ETHICS").await.unwrap().unwrap();
    assert_eq!(found.id, 2);

    assert!(store.find_active_by_slug("web3-wallets").await.unwrap().is_none());
}

#[tokio::test]
async fn wildcard_characters_match_literally() {
    let dir = tempdir().expect("temp dir");
    let store = seeded_store(dir.path()).await;

    let found = store.find_by_slug_fragment("0%_up").await.unwrap().unwrap();
    assert_eq!(found.id, 4);
    assert!(store.find_by_slug_fragment("%").await.unwrap().is_some());
    assert!(store.find_by_slug_fragment("x%y").await.unwrap().is_none());
}

#[tokio::test]
async fn listing_and_categories_cover_active_rows_only() {
    let dir = tempdir().expect("temp dir");
    let store = seeded_store(dir.path()).await;

    let ids: Vec<i64> = store
        .list_active_articles()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![4, 2, 1]);

    assert_eq!(
        store.list_categories().await.unwrap(),
        vec![
            "Artificial Intelligence".to_string(),
            "Quantum Computing".to_string(),
            "Robotics".to_string()
        ]
    );
}

#[tokio::test]
async fn view_counter_persists_between_calls() {
    let dir = tempdir().expect("temp dir");
    let store = seeded_store(dir.path()).await;

    assert_eq!(store.increment_view_count(1).await.unwrap(), 1);
    assert_eq!(store.increment_view_count(1).await.unwrap(), 2);

    let reloaded = store.find_by_exact_slug("quantum computing").await.unwrap().unwrap();
    assert_eq!(reloaded.view_count, 2);

    assert!(matches!(
        store.increment_view_count(404).await,
        Err(StoreError::NotFound(_))
    ));
}
