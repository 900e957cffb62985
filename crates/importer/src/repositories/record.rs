use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{NewRecord, Record, RecordStatus};

/// Common SELECT fields for record queries
const SELECT_RECORD: &str = r#"
    SELECT
        id, created_at, updated_at,
        content_type, status, title, body, author_id,
        source_entry_id, source_link, source_authors, language
    FROM record
"#;

pub struct RecordRepository;

impl RecordRepository {
    /// Insert a new record and return its assigned id
    pub async fn create(pool: &SqlitePool, data: NewRecord) -> Result<i64, sqlx::Error> {
        let now = Utc::now();
        let created_at = data.created_at.unwrap_or(now);
        let source_authors = if data.source_authors.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&data.source_authors).unwrap_or_else(|_| "[]".to_string()))
        };

        let result = sqlx::query(
            r#"
            INSERT INTO record (
                created_at, updated_at, content_type, status, title, body,
                author_id, source_entry_id, source_link, source_authors
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(created_at)
        .bind(now)
        .bind(&data.content_type)
        .bind(data.status.as_str())
        .bind(&data.title)
        .bind(&data.body)
        .bind(data.author_id)
        .bind(&data.source_entry_id)
        .bind(&data.source_link)
        .bind(&source_authors)
        .fetch_one(pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        Ok(id)
    }

    /// Get a record by ID
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Record>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_RECORD);
        let row = sqlx::query_as::<_, RecordRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Count records for a source entry, across all statuses.
    ///
    /// When `language` is given the count is confined to that partition.
    pub async fn count_by_source(
        pool: &SqlitePool,
        content_type: &str,
        source_entry_id: &str,
        language: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let count = match language {
            Some(lang) => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM record
                    WHERE content_type = $1 AND source_entry_id = $2 AND language = $3
                    "#,
                )
                .bind(content_type)
                .bind(source_entry_id)
                .bind(lang)
                .fetch_one(pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM record WHERE content_type = $1 AND source_entry_id = $2",
                )
                .bind(content_type)
                .bind(source_entry_id)
                .fetch_one(pool)
                .await?
            }
        };

        Ok(count)
    }

    /// Tag a record with a language
    pub async fn set_language(
        pool: &SqlitePool,
        id: i64,
        language: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE record SET language = $1, updated_at = $2 WHERE id = $3")
            .bind(language)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    content_type: String,
    status: String,
    title: String,
    body: String,
    author_id: i64,
    source_entry_id: String,
    source_link: Option<String>,
    source_authors: Option<String>,
    language: Option<String>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        let status = row.status.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid record status '{}' for record id {}, defaulting to Draft",
                row.status,
                row.id
            );
            RecordStatus::Draft
        });

        let source_authors = row
            .source_authors
            .as_deref()
            .map(|json| serde_json::from_str(json).unwrap_or_default())
            .unwrap_or_default();

        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            content_type: row.content_type,
            status,
            title: row.title,
            body: row.body,
            author_id: row.author_id,
            source_entry_id: row.source_entry_id,
            source_link: row.source_link,
            source_authors,
            language: row.language,
        }
    }
}
