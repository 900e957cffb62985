use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::models::NewRecord;
use crate::repositories::{RecordRepository, SchemaRepository, TermRepository};
use crate::store::{ContentStore, RecordFilter};

/// SQLite-backed destination store.
///
/// SQL lives in the repositories; this type only adapts them to the
/// `ContentStore` contract. Language support is a property of the store's
/// configuration: a store with an empty language registry has no partitions.
pub struct SqliteStore {
    pool: SqlitePool,
    languages_enabled: bool,
}

impl SqliteStore {
    /// Wrap a pool whose database already carries the store schema.
    ///
    /// The language capability is resolved once here, the way a CMS either
    /// has or does not have its multilingual plugin installed.
    pub async fn new(pool: SqlitePool) -> Result<Self, StoreError> {
        let languages_enabled = SchemaRepository::languages_configured(&pool).await? > 0;
        Ok(Self {
            pool,
            languages_enabled,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn content_type_exists(&self, content_type: &str) -> Result<bool, StoreError> {
        Ok(SchemaRepository::content_type_exists(&self.pool, content_type).await?)
    }

    async fn taxonomy_exists(&self, taxonomy: &str) -> Result<bool, StoreError> {
        Ok(SchemaRepository::taxonomy_exists(&self.pool, taxonomy).await?)
    }

    async fn language_exists(&self, language: &str) -> Result<bool, StoreError> {
        Ok(SchemaRepository::language_exists(&self.pool, language).await?)
    }

    fn supports_languages(&self) -> bool {
        self.languages_enabled
    }

    async fn count_records(&self, filter: &RecordFilter) -> Result<u64, StoreError> {
        let count = RecordRepository::count_by_source(
            &self.pool,
            &filter.content_type,
            &filter.source_entry_id,
            filter.language.as_deref(),
        )
        .await?;
        Ok(count as u64)
    }

    async fn insert_record(&self, record: NewRecord) -> Result<i64, StoreError> {
        Ok(RecordRepository::create(&self.pool, record).await?)
    }

    async fn find_term(
        &self,
        label: &str,
        taxonomy: &str,
        language: Option<&str>,
    ) -> Result<Option<i64>, StoreError> {
        Ok(TermRepository::find(&self.pool, label, taxonomy, language).await?)
    }

    async fn insert_term(&self, label: &str, taxonomy: &str) -> Result<i64, StoreError> {
        Ok(TermRepository::create(&self.pool, label, taxonomy).await?)
    }

    async fn set_record_terms(
        &self,
        record_id: i64,
        term_ids: &[i64],
        taxonomy: &str,
    ) -> Result<(), StoreError> {
        Ok(TermRepository::set_record_terms(&self.pool, record_id, term_ids, taxonomy).await?)
    }

    async fn set_record_language(&self, record_id: i64, language: &str) -> Result<(), StoreError> {
        Ok(RecordRepository::set_language(&self.pool, record_id, language).await?)
    }

    async fn set_term_language(&self, term_id: i64, language: &str) -> Result<(), StoreError> {
        Ok(TermRepository::set_language(&self.pool, term_id, language).await?)
    }
}
