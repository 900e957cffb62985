use sqlx::SqlitePool;

use crate::models::Term;

/// Common SELECT fields for term queries
const SELECT_TERM: &str = r#"
    SELECT id, label, taxonomy, language
    FROM term
"#;

pub struct TermRepository;

impl TermRepository {
    /// Create a new term and return its assigned id
    pub async fn create(
        pool: &SqlitePool,
        label: &str,
        taxonomy: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO term (label, taxonomy)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(label)
        .bind(taxonomy)
        .fetch_one(pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        Ok(id)
    }

    /// Get a term by ID
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Term>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_TERM);
        let row = sqlx::query_as::<_, TermRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Find a term by label within a taxonomy.
    ///
    /// When `language` is given only that partition is searched; otherwise
    /// the language column is ignored.
    pub async fn find(
        pool: &SqlitePool,
        label: &str,
        taxonomy: &str,
        language: Option<&str>,
    ) -> Result<Option<i64>, sqlx::Error> {
        let id = match language {
            Some(lang) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT id FROM term WHERE label = $1 AND taxonomy = $2 AND language = $3",
                )
                .bind(label)
                .bind(taxonomy)
                .bind(lang)
                .fetch_optional(pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT id FROM term WHERE label = $1 AND taxonomy = $2",
                )
                .bind(label)
                .bind(taxonomy)
                .fetch_optional(pool)
                .await?
            }
        };

        Ok(id)
    }

    /// Tag a term with a language
    pub async fn set_language(
        pool: &SqlitePool,
        id: i64,
        language: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE term SET language = $1 WHERE id = $2")
            .bind(language)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Replace a record's term associations within one taxonomy
    pub async fn set_record_terms(
        pool: &SqlitePool,
        record_id: i64,
        term_ids: &[i64],
        taxonomy: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM record_term WHERE record_id = $1 AND taxonomy = $2")
            .bind(record_id)
            .bind(taxonomy)
            .execute(pool)
            .await?;

        for term_id in term_ids {
            sqlx::query(
                r#"
                INSERT INTO record_term (record_id, term_id, taxonomy)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(record_id)
            .bind(term_id)
            .bind(taxonomy)
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Term ids associated with a record in a taxonomy
    pub async fn get_record_terms(
        pool: &SqlitePool,
        record_id: i64,
        taxonomy: &str,
    ) -> Result<Vec<i64>, sqlx::Error> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT term_id FROM record_term WHERE record_id = $1 AND taxonomy = $2 ORDER BY term_id",
        )
        .bind(record_id)
        .bind(taxonomy)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct TermRow {
    id: i64,
    label: String,
    taxonomy: String,
    language: Option<String>,
}

impl From<TermRow> for Term {
    fn from(row: TermRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
            taxonomy: row.taxonomy,
            language: row.language,
        }
    }
}
