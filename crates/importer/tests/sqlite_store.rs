//! End-to-end run of the import engine against the SQLite store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use importer::{
    create_pool, ContentStore, ImportEngine, ImportTarget, RecordStatus, SqliteStore,
};

use feed::{Category, FeedEntry};

async fn setup() -> (sqlx::SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
    let pool = create_pool(&url).await.unwrap();
    (pool, dir)
}

fn entry(id: &str, title: &str, categories: &[&str]) -> FeedEntry {
    FeedEntry {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("<p>{}</p>", title),
        link: Some(format!("https://example.org/{}", id)),
        authors: vec!["Alice".to_string(), "Bob".to_string()],
        categories: categories.iter().map(|c| Category::new(*c)).collect(),
        modified_at: Some(Utc.with_ymd_and_hms(2016, 1, 5, 10, 30, 0).unwrap()),
    }
}

#[tokio::test]
async fn test_import_and_reimport() {
    let (pool, _dir) = setup().await;
    let store = SqliteStore::new(pool.clone()).await.unwrap();
    let engine = ImportEngine::new(Arc::new(store));

    let target = ImportTarget {
        taxonomy: Some("category".to_string()),
        ..ImportTarget::default()
    };
    let entries = vec![
        entry("a", "First", &["News"]),
        entry("b", "Second", &[]),
    ];

    let summary = engine.run(&entries, &target).await.unwrap();
    assert_eq!(summary.imported, 2);

    let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM record")
        .fetch_one(&pool)
        .await
        .unwrap();
    let terms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM term")
        .fetch_one(&pool)
        .await
        .unwrap();
    let associations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM record_term")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(records, 2);
    assert_eq!(terms, 1);
    assert_eq!(associations, 1);

    // Second pass finds everything already present
    let summary = engine.run(&entries, &target).await.unwrap();
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.skipped, 2);

    let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM record")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(records, 2);
}

#[tokio::test]
async fn test_record_fields_persisted() {
    let (pool, _dir) = setup().await;
    let store = SqliteStore::new(pool.clone()).await.unwrap();
    let engine = ImportEngine::new(Arc::new(store));

    engine
        .run(&[entry("a", "Title", &[])], &ImportTarget::default())
        .await
        .unwrap();

    let record = importer::repositories::RecordRepository::get_by_id(&pool, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.content_type, "post");
    assert_eq!(record.status, RecordStatus::Draft);
    assert_eq!(record.title, "Title");
    assert_eq!(record.body, "<p>Title</p>");
    assert_eq!(record.author_id, 1);
    assert_eq!(record.source_entry_id, "a");
    assert_eq!(record.source_link.as_deref(), Some("https://example.org/a"));
    assert_eq!(
        record.source_authors,
        vec!["Alice".to_string(), "Bob".to_string()]
    );
    assert_eq!(
        record.created_at,
        Utc.with_ymd_and_hms(2016, 1, 5, 10, 30, 0).unwrap()
    );
}

#[tokio::test]
async fn test_language_partitioning() {
    let (pool, _dir) = setup().await;
    sqlx::query("INSERT INTO language (code) VALUES ('en'), ('fr')")
        .execute(&pool)
        .await
        .unwrap();

    let store = SqliteStore::new(pool.clone()).await.unwrap();
    assert!(store.supports_languages());
    let engine = ImportEngine::new(Arc::new(store));

    let entries = vec![entry("a", "Bonjour", &[])];
    let fr = ImportTarget {
        language: Some("fr".to_string()),
        ..ImportTarget::default()
    };
    let en = ImportTarget {
        language: Some("en".to_string()),
        ..ImportTarget::default()
    };

    engine.run(&entries, &fr).await.unwrap();
    let summary = engine.run(&entries, &en).await.unwrap();
    assert_eq!(summary.imported, 1);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM record WHERE source_entry_id = 'a'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 2);

    let summary = engine.run(&entries, &fr).await.unwrap();
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn test_unknown_taxonomy_rejected_up_front() {
    let (pool, _dir) = setup().await;
    let store = SqliteStore::new(pool.clone()).await.unwrap();
    let engine = ImportEngine::new(Arc::new(store));

    let target = ImportTarget {
        taxonomy: Some("nonexistent".to_string()),
        ..ImportTarget::default()
    };
    let result = engine.run(&[entry("a", "First", &[])], &target).await;
    assert!(result.is_err());

    let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM record")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(records, 0);
}
