use std::sync::Arc;

use feed::Category;

use crate::error::ImportError;
use crate::models::ImportTarget;
use crate::services::TermHook;
use crate::store::ContentStore;

/// Maps feed category labels into classification terms.
///
/// Terms are created lazily on first reference. One store write associates
/// the resolved set with the record, replacing whatever was assigned before,
/// so callers invoke this once per new record.
pub struct TermResolver {
    store: Arc<dyn ContentStore>,
    on_term_inserted: Option<TermHook>,
}

impl TermResolver {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            on_term_inserted: None,
        }
    }

    pub fn with_hook(mut self, hook: TermHook) -> Self {
        self.on_term_inserted = Some(hook);
        self
    }

    /// Resolve the categories within the target taxonomy and associate the
    /// resulting term ids with the record.
    ///
    /// Duplicate labels collapse to one id. A label that fails to resolve is
    /// logged and skipped without losing the rest; hook failures abort the
    /// run. Empty categories are a no-op with zero store writes.
    pub async fn resolve(
        &self,
        record_id: i64,
        categories: &[Category],
        target: &ImportTarget,
    ) -> Result<Vec<i64>, ImportError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let Some(taxonomy) = target.taxonomy.as_deref() else {
            return Ok(Vec::new());
        };
        let language = target
            .language
            .as_deref()
            .filter(|_| self.store.supports_languages());

        let mut ids: Vec<i64> = Vec::new();
        for category in categories {
            match self.resolve_one(&category.term, taxonomy, language).await {
                Ok(id) => {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                Err(ImportError::Store(e)) => {
                    tracing::warn!(
                        "Failed to resolve term '{}' in taxonomy '{}': {}",
                        category.term,
                        taxonomy,
                        e
                    );
                }
                Err(fatal) => return Err(fatal),
            }
        }

        if !ids.is_empty() {
            self.store.set_record_terms(record_id, &ids, taxonomy).await?;
        }

        Ok(ids)
    }

    /// Find the term, creating it on first reference
    async fn resolve_one(
        &self,
        label: &str,
        taxonomy: &str,
        language: Option<&str>,
    ) -> Result<i64, ImportError> {
        if let Some(id) = self.store.find_term(label, taxonomy, language).await? {
            return Ok(id);
        }

        let term_id = self.store.insert_term(label, taxonomy).await?;
        tracing::debug!("Created term {} ('{}') in '{}'", term_id, label, taxonomy);

        if let Some(hook) = &self.on_term_inserted {
            hook(term_id).map_err(|source| ImportError::TermHook { term_id, source })?;
        }

        // The language lands on the created term itself, not on the record
        // it will be associated with
        if let Some(language) = language {
            self.store.set_term_language(term_id, language).await?;
        }

        Ok(term_id)
    }
}
