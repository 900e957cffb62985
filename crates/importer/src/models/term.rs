use serde::{Deserialize, Serialize};

/// Classification term within a taxonomy.
///
/// Created lazily on first reference during an import. Unique per
/// (label, taxonomy), or per (label, taxonomy, language) when the store
/// partitions terms by language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub id: i64,
    pub label: String,
    pub taxonomy: String,
    pub language: Option<String>,
}
