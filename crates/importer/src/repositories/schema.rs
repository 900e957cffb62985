use sqlx::SqlitePool;

/// Lookups against the destination schema registries
pub struct SchemaRepository;

impl SchemaRepository {
    pub async fn content_type_exists(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM content_type WHERE name = $1",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn taxonomy_exists(pool: &SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM taxonomy WHERE name = $1")
            .bind(name)
            .fetch_one(pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn language_exists(pool: &SqlitePool, code: &str) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM language WHERE code = $1")
            .bind(code)
            .fetch_one(pool)
            .await?;

        Ok(count > 0)
    }

    /// Number of configured languages; zero means no language partitioning
    pub async fn languages_configured(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM language")
            .fetch_one(pool)
            .await
    }
}
