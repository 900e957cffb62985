use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::StoreError;
use crate::models::{NewRecord, Record, RecordStatus, Term};
use crate::store::{ContentStore, RecordFilter};

/// In-memory destination store.
///
/// Backs the engine tests and doubles as a reference for what a conforming
/// `ContentStore` must do. Beyond the trait it can simulate per-entry insert
/// failures and exposes its state for assertions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    records: Vec<Record>,
    terms: Vec<Term>,
    /// (record_id, taxonomy) -> associated term ids
    record_terms: HashMap<(i64, String), Vec<i64>>,
    content_types: HashSet<String>,
    taxonomies: HashSet<String>,
    languages: HashSet<String>,
    next_record_id: i64,
    next_term_id: i64,
    /// source_entry_ids whose record insertion should fail
    failing_sources: HashSet<String>,
    term_assignment_writes: usize,
}

impl MemoryStore {
    /// A store with the default schema: content types `post`/`page`,
    /// taxonomies `category`/`tag`, no language partitioning
    pub fn new() -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().unwrap();
            inner.content_types.insert("post".to_string());
            inner.content_types.insert("page".to_string());
            inner.taxonomies.insert("category".to_string());
            inner.taxonomies.insert("tag".to_string());
        }
        store
    }

    /// Same schema, with the given language set configured (enables
    /// language partitioning)
    pub fn with_languages(languages: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().unwrap();
            for lang in languages {
                inner.languages.insert((*lang).to_string());
            }
        }
        store
    }

    /// Make `insert_record` fail for entries with this source id
    pub fn fail_inserts_for(&self, source_entry_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.failing_sources.insert(source_entry_id.to_string());
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    pub fn term_count(&self) -> usize {
        self.inner.lock().unwrap().terms.len()
    }

    pub fn records(&self) -> Vec<Record> {
        self.inner.lock().unwrap().records.clone()
    }

    pub fn terms(&self) -> Vec<Term> {
        self.inner.lock().unwrap().terms.clone()
    }

    pub fn record(&self, record_id: i64) -> Option<Record> {
        self.inner
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
    }

    /// Term ids associated with a record in a taxonomy
    pub fn record_terms(&self, record_id: i64, taxonomy: &str) -> Vec<i64> {
        self.inner
            .lock()
            .unwrap()
            .record_terms
            .get(&(record_id, taxonomy.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `set_record_terms` writes the store has seen
    pub fn term_assignment_writes(&self) -> usize {
        self.inner.lock().unwrap().term_assignment_writes
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn content_type_exists(&self, content_type: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().content_types.contains(content_type))
    }

    async fn taxonomy_exists(&self, taxonomy: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().taxonomies.contains(taxonomy))
    }

    async fn language_exists(&self, language: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().languages.contains(language))
    }

    fn supports_languages(&self) -> bool {
        !self.inner.lock().unwrap().languages.is_empty()
    }

    async fn count_records(&self, filter: &RecordFilter) -> Result<u64, StoreError> {
        let inner = self.inner.lock().unwrap();
        let count = inner
            .records
            .iter()
            .filter(|r| {
                r.content_type == filter.content_type
                    && r.source_entry_id == filter.source_entry_id
                    && match filter.language.as_deref() {
                        Some(lang) => r.language.as_deref() == Some(lang),
                        None => true,
                    }
            })
            .count();
        Ok(count as u64)
    }

    async fn insert_record(&self, record: NewRecord) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing_sources.contains(&record.source_entry_id) {
            return Err(StoreError::Backend(format!(
                "simulated insert failure for '{}'",
                record.source_entry_id
            )));
        }

        inner.next_record_id += 1;
        let id = inner.next_record_id;
        let now = Utc::now();
        inner.records.push(Record {
            id,
            created_at: record.created_at.unwrap_or(now),
            updated_at: now,
            content_type: record.content_type,
            status: record.status,
            title: record.title,
            body: record.body,
            author_id: record.author_id,
            source_entry_id: record.source_entry_id,
            source_link: record.source_link,
            source_authors: record.source_authors,
            language: None,
        });
        Ok(id)
    }

    async fn find_term(
        &self,
        label: &str,
        taxonomy: &str,
        language: Option<&str>,
    ) -> Result<Option<i64>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let found = inner
            .terms
            .iter()
            .find(|t| {
                t.label == label
                    && t.taxonomy == taxonomy
                    && match language {
                        Some(lang) => t.language.as_deref() == Some(lang),
                        None => true,
                    }
            })
            .map(|t| t.id);
        Ok(found)
    }

    async fn insert_term(&self, label: &str, taxonomy: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_term_id += 1;
        let id = inner.next_term_id;
        inner.terms.push(Term {
            id,
            label: label.to_string(),
            taxonomy: taxonomy.to_string(),
            language: None,
        });
        Ok(id)
    }

    async fn set_record_terms(
        &self,
        record_id: i64,
        term_ids: &[i64],
        taxonomy: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.term_assignment_writes += 1;
        inner
            .record_terms
            .insert((record_id, taxonomy.to_string()), term_ids.to_vec());
        Ok(())
    }

    async fn set_record_language(&self, record_id: i64, language: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.records.iter_mut().find(|r| r.id == record_id) {
            Some(record) => {
                record.language = Some(language.to_string());
                Ok(())
            }
            None => Err(StoreError::Backend(format!(
                "no record with id {}",
                record_id
            ))),
        }
    }

    async fn set_term_language(&self, term_id: i64, language: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.terms.iter_mut().find(|t| t.id == term_id) {
            Some(term) => {
                term.language = Some(language.to_string());
                Ok(())
            }
            None => Err(StoreError::Backend(format!("no term with id {}", term_id))),
        }
    }
}
