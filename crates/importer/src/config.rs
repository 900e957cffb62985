use serde::{Deserialize, Serialize};

use crate::models::{default_author_id, default_content_type, ImportTarget};

/// Run configuration for one feed import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// URI of the RSS/Atom feed to import
    pub feed_uri: String,
    /// Content type records are created as (default: "post")
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Taxonomy feed categories are mapped into
    #[serde(default)]
    pub taxonomy: Option<String>,
    /// Author id assigned to created records (default: 1)
    #[serde(default = "default_author_id")]
    pub author_id: i64,
    /// Language partition for created records and terms
    #[serde(default)]
    pub language: Option<String>,
}

impl ImportConfig {
    pub fn new(feed_uri: impl Into<String>) -> Self {
        Self {
            feed_uri: feed_uri.into(),
            content_type: default_content_type(),
            taxonomy: None,
            author_id: default_author_id(),
            language: None,
        }
    }

    /// The store-facing part of the configuration
    pub fn target(&self) -> ImportTarget {
        ImportTarget {
            content_type: self.content_type.clone(),
            taxonomy: self.taxonomy.clone(),
            author_id: self.author_id,
            language: self.language.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let config: ImportConfig =
            serde_json::from_str(r#"{"feed_uri": "https://example.org/feed"}"#).unwrap();

        assert_eq!(config.feed_uri, "https://example.org/feed");
        assert_eq!(config.content_type, "post");
        assert_eq!(config.taxonomy, None);
        assert_eq!(config.author_id, 1);
        assert_eq!(config.language, None);
    }

    #[test]
    fn test_target_projection() {
        let config: ImportConfig = serde_json::from_str(
            r#"{"feed_uri": "https://example.org/feed", "taxonomy": "category", "language": "fr"}"#,
        )
        .unwrap();

        let target = config.target();
        assert_eq!(target.content_type, "post");
        assert_eq!(target.taxonomy.as_deref(), Some("category"));
        assert_eq!(target.language.as_deref(), Some("fr"));
    }
}
