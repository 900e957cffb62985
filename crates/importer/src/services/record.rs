use std::sync::Arc;

use feed::FeedEntry;

use crate::error::ImportError;
use crate::models::{ImportTarget, NewRecord, RecordStatus};
use crate::services::RecordHook;
use crate::store::ContentStore;

/// Maps one feed entry into a persisted content record.
///
/// The title is flattened to plain text and the body reduced to the allowed
/// markup subset before anything reaches the store. Records are created as
/// drafts with the entry's modification time as their creation time.
pub struct RecordBuilder {
    store: Arc<dyn ContentStore>,
    on_record_inserted: Option<RecordHook>,
}

impl RecordBuilder {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            on_record_inserted: None,
        }
    }

    pub fn with_hook(mut self, hook: RecordHook) -> Self {
        self.on_record_inserted = Some(hook);
        self
    }

    /// Create the record and return its store-assigned id.
    ///
    /// After the insert the post-insert hook fires (its failure is fatal to
    /// the run, not to the record), then the record is tagged with the
    /// target language when the store supports partitioning. Language
    /// tagging is a side effect of insertion, never a precondition.
    pub async fn build(
        &self,
        entry: &FeedEntry,
        target: &ImportTarget,
    ) -> Result<i64, ImportError> {
        let record = NewRecord {
            content_type: target.content_type.clone(),
            status: RecordStatus::Draft,
            title: sanitize::strip_tags(&entry.title),
            body: sanitize::clean_html(&entry.content),
            author_id: target.author_id,
            created_at: entry.modified_at,
            source_entry_id: entry.id.clone(),
            source_link: entry.link.clone(),
            source_authors: entry.authors.clone(),
        };

        let record_id = self.store.insert_record(record).await?;
        tracing::debug!("Created record {} from entry '{}'", record_id, entry.id);

        if let Some(hook) = &self.on_record_inserted {
            hook(record_id).map_err(|source| ImportError::RecordHook { record_id, source })?;
        }

        if let Some(language) = target.language.as_deref() {
            if self.store.supports_languages() {
                self.store.set_record_language(record_id, language).await?;
            }
        }

        Ok(record_id)
    }
}
