use serde::{Deserialize, Serialize};

/// Where and how imported entries are materialized.
///
/// Set once per run; the engine validates every field against the
/// destination store before touching the first entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTarget {
    /// Content type records are created as; must exist in the store schema
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Taxonomy feed categories are mapped into; None disables term handling
    #[serde(default)]
    pub taxonomy: Option<String>,
    /// Author id assigned to created records
    #[serde(default = "default_author_id")]
    pub author_id: i64,
    /// Language partition for created records and terms; requires a
    /// language-aware store
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for ImportTarget {
    fn default() -> Self {
        Self {
            content_type: default_content_type(),
            taxonomy: None,
            author_id: default_author_id(),
            language: None,
        }
    }
}

pub(crate) fn default_content_type() -> String {
    "post".to_string()
}

pub(crate) fn default_author_id() -> i64 {
    1
}
