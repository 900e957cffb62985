use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::NewRecord;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Scope of a duplicate check.
///
/// Status is deliberately absent: a record in any status, drafts and trashed
/// included, makes the entry a duplicate. Otherwise a manually unpublished
/// import would be re-created on the next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub content_type: String,
    pub source_entry_id: String,
    /// When set, only records in this language partition count
    pub language: Option<String>,
}

/// Destination-store capability surface consumed by the import engine.
///
/// Any concrete store works: the shipped SQLite implementation, the
/// in-memory double used in tests, or an adapter over an external CMS.
/// Implementations must be Send + Sync; the engine shares one store across
/// its collaborators.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Whether the content type exists in the destination schema
    async fn content_type_exists(&self, content_type: &str) -> Result<bool, StoreError>;

    /// Whether the taxonomy exists in the destination schema
    async fn taxonomy_exists(&self, taxonomy: &str) -> Result<bool, StoreError>;

    /// Whether the language belongs to the store's configured language set
    async fn language_exists(&self, language: &str) -> Result<bool, StoreError>;

    /// Whether the store partitions records and terms by language.
    ///
    /// A capability flag, not a query; stores without language support reject
    /// no data, they simply have no partitions to tag.
    fn supports_languages(&self) -> bool;

    /// Count records matching the filter, across all statuses
    async fn count_records(&self, filter: &RecordFilter) -> Result<u64, StoreError>;

    /// Insert a record and return its store-assigned id
    async fn insert_record(&self, record: NewRecord) -> Result<i64, StoreError>;

    /// Look up a term by label within a taxonomy.
    ///
    /// `language` narrows the lookup to one partition on language-aware
    /// stores; pass None to match regardless of language.
    async fn find_term(
        &self,
        label: &str,
        taxonomy: &str,
        language: Option<&str>,
    ) -> Result<Option<i64>, StoreError>;

    /// Create a term and return its store-assigned id
    async fn insert_term(&self, label: &str, taxonomy: &str) -> Result<i64, StoreError>;

    /// Replace the record's term associations within one taxonomy
    async fn set_record_terms(
        &self,
        record_id: i64,
        term_ids: &[i64],
        taxonomy: &str,
    ) -> Result<(), StoreError>;

    /// Tag a record with a language partition
    async fn set_record_language(&self, record_id: i64, language: &str) -> Result<(), StoreError>;

    /// Tag a term with a language partition
    async fn set_term_language(&self, term_id: i64, language: &str) -> Result<(), StoreError>;
}
