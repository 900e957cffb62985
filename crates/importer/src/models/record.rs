use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication status of a content record.
///
/// Imports are created as drafts; the duplicate check deliberately spans
/// every status so an unpublished or trashed import still counts as present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Draft,
    Published,
    Trashed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Draft => "draft",
            RecordStatus::Published => "published",
            RecordStatus::Trashed => "trashed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(RecordStatus::Draft),
            "published" | "publish" => Ok(RecordStatus::Published),
            "trashed" | "trash" => Ok(RecordStatus::Trashed),
            _ => Err(format!("Invalid record status: {}", s)),
        }
    }
}

/// Persisted content record created from one feed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,

    /// Content type in the destination schema ("post", "page", ...)
    pub content_type: String,
    pub status: RecordStatus,
    /// Title, markup already stripped
    pub title: String,
    /// Body, already reduced to the allowed markup subset
    pub body: String,
    pub author_id: i64,

    /// Feed-assigned identifier of the source entry; at most one record per
    /// (source_entry_id, content_type, language)
    pub source_entry_id: String,
    /// Permalink of the source entry
    pub source_link: Option<String>,
    /// Author names carried over from the feed
    pub source_authors: Vec<String>,

    /// Language partition, when the store is language-aware
    pub language: Option<String>,
}

/// Insert payload for a new content record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub content_type: String,
    #[serde(default)]
    pub status: RecordStatus,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    /// Creation timestamp; None lets the store default to the current time
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub source_entry_id: String,
    #[serde(default)]
    pub source_link: Option<String>,
    #[serde(default)]
    pub source_authors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RecordStatus::Draft,
            RecordStatus::Published,
            RecordStatus::Trashed,
        ] {
            assert_eq!(status.as_str().parse::<RecordStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_aliases() {
        assert_eq!(
            "publish".parse::<RecordStatus>().unwrap(),
            RecordStatus::Published
        );
        assert_eq!(
            "trash".parse::<RecordStatus>().unwrap(),
            RecordStatus::Trashed
        );
        assert!("bogus".parse::<RecordStatus>().is_err());
    }
}
