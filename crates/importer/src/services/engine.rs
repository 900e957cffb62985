use std::sync::Arc;

use feed::{FeedClient, FeedEntry};

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::models::{EntryOutcome, ImportSummary, ImportTarget};
use crate::services::{DuplicateChecker, RecordBuilder, RecordHook, TermHook, TermResolver};
use crate::store::ContentStore;

/// Orchestrates one import run.
///
/// Entries are processed sequentially in feed order so that a term created
/// for entry N is found, not re-created, by entry N+1. Each entry ends in
/// exactly one of three states: Skipped (already imported), Imported, or
/// Failed; a failed entry never aborts the batch. Records and terms are only
/// ever created, never updated or deleted, so re-running an import is safe.
pub struct ImportEngine {
    store: Arc<dyn ContentStore>,
    dedup: DuplicateChecker,
    builder: RecordBuilder,
    resolver: TermResolver,
}

impl ImportEngine {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            dedup: DuplicateChecker::new(Arc::clone(&store)),
            builder: RecordBuilder::new(Arc::clone(&store)),
            resolver: TermResolver::new(Arc::clone(&store)),
            store,
        }
    }

    /// Register a callback fired after each record insert
    pub fn with_record_hook(mut self, hook: RecordHook) -> Self {
        self.builder = self.builder.with_hook(hook);
        self
    }

    /// Register a callback fired after each term insert
    pub fn with_term_hook(mut self, hook: TermHook) -> Self {
        self.resolver = self.resolver.with_hook(hook);
        self
    }

    /// Fetch the configured feed and import it.
    ///
    /// Configuration problems and feed-read failures surface before any
    /// entry is processed.
    pub async fn import(
        &self,
        client: &FeedClient,
        config: &ImportConfig,
    ) -> Result<ImportSummary, ImportError> {
        if config.feed_uri.trim().is_empty() {
            return Err(ImportError::configuration("feed uri is empty"));
        }

        let target = config.target();
        self.validate_target(&target).await?;

        let entries = client.fetch(&config.feed_uri).await?;
        self.run_validated(&entries, &target).await
    }

    /// Import an already-fetched entry sequence
    pub async fn run(
        &self,
        entries: &[FeedEntry],
        target: &ImportTarget,
    ) -> Result<ImportSummary, ImportError> {
        self.validate_target(target).await?;
        self.run_validated(entries, target).await
    }

    /// Fail fast on setup: every part of the target must exist in the store
    /// before the first entry is touched
    async fn validate_target(&self, target: &ImportTarget) -> Result<(), ImportError> {
        if !self.store.content_type_exists(&target.content_type).await? {
            return Err(ImportError::configuration(format!(
                "content type '{}' does not exist",
                target.content_type
            )));
        }

        if let Some(taxonomy) = target.taxonomy.as_deref() {
            if !self.store.taxonomy_exists(taxonomy).await? {
                return Err(ImportError::configuration(format!(
                    "taxonomy '{}' does not exist",
                    taxonomy
                )));
            }
        }

        if let Some(language) = target.language.as_deref() {
            if !self.store.supports_languages() {
                return Err(ImportError::configuration(
                    "store does not support language partitioning",
                ));
            }
            if !self.store.language_exists(language).await? {
                return Err(ImportError::configuration(format!(
                    "language '{}' is not configured",
                    language
                )));
            }
        }

        Ok(())
    }

    async fn run_validated(
        &self,
        entries: &[FeedEntry],
        target: &ImportTarget,
    ) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary::default();

        for entry in entries {
            let outcome = self.process_entry(entry, target).await?;
            summary.record(outcome);
        }

        tracing::info!("Import finished: {}", summary);
        Ok(summary)
    }

    /// Take one entry from Candidate to Skipped, Imported or Failed.
    ///
    /// Store-side failures are contained here; only hook errors (and nothing
    /// else) bubble up and terminate the run.
    async fn process_entry(
        &self,
        entry: &FeedEntry,
        target: &ImportTarget,
    ) -> Result<EntryOutcome, ImportError> {
        if entry.id.is_empty() {
            tracing::warn!("Entry without id cannot be imported: '{}'", entry.title);
            return Ok(EntryOutcome::Failed);
        }

        match self.dedup.exists(&entry.id, target).await {
            Ok(true) => {
                tracing::debug!("Skipping already-imported entry '{}'", entry.id);
                return Ok(EntryOutcome::Skipped);
            }
            Ok(false) => {}
            Err(e) => {
                // Without a trustworthy answer, inserting could duplicate
                tracing::error!("[{}] Duplicate check failed: {}", entry.id, e);
                return Ok(EntryOutcome::Failed);
            }
        }

        let record_id = match self.builder.build(entry, target).await {
            Ok(id) => id,
            Err(ImportError::Store(e)) => {
                tracing::error!("[{}] Failed to create record: {}", entry.id, e);
                return Ok(EntryOutcome::Failed);
            }
            Err(fatal) => return Err(fatal),
        };

        if target.taxonomy.is_some() && !entry.categories.is_empty() {
            match self.resolver.resolve(record_id, &entry.categories, target).await {
                Ok(term_ids) => {
                    tracing::debug!(
                        "Associated {} terms with record {}",
                        term_ids.len(),
                        record_id
                    );
                }
                Err(ImportError::Store(e)) => {
                    // The record stands even when its terms could not be
                    // attached
                    tracing::warn!(
                        "[{}] Term association failed, record {} kept: {}",
                        entry.id,
                        record_id,
                        e
                    );
                }
                Err(fatal) => return Err(fatal),
            }
        }

        Ok(EntryOutcome::Imported(record_id))
    }
}
