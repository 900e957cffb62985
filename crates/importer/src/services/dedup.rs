use std::sync::Arc;

use crate::error::StoreError;
use crate::models::ImportTarget;
use crate::store::{ContentStore, RecordFilter};

/// Decides whether a feed entry has already been imported.
///
/// A pure read against the destination store; never writes.
pub struct DuplicateChecker {
    store: Arc<dyn ContentStore>,
}

impl DuplicateChecker {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// True when a record for the entry exists in the target scope.
    ///
    /// Matches records in any status, drafts and trashed included; when the
    /// target carries a language the check is confined to that partition, so
    /// the same entry can exist once per language.
    pub async fn exists(
        &self,
        source_entry_id: &str,
        target: &ImportTarget,
    ) -> Result<bool, StoreError> {
        let filter = RecordFilter {
            content_type: target.content_type.clone(),
            source_entry_id: source_entry_id.to_string(),
            language: target.language.clone(),
        };
        Ok(self.store.count_records(&filter).await? > 0)
    }
}
