use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized entry from a syndication feed.
///
/// Produced once per feed read and discarded after processing; `id` is the
/// feed-assigned identifier the import engine deduplicates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Stable feed-assigned identifier (RSS `guid`, Atom `id`).
    ///
    /// May be empty when the feed provides neither an id nor a link; such
    /// entries are still yielded and left for the consumer to reject.
    pub id: String,
    /// Entry title, markup included as published
    pub title: String,
    /// Entry body (RSS `content:encoded`/`description`, Atom `content`/`summary`)
    pub content: String,
    /// Permalink to the original entry
    pub link: Option<String>,
    /// Author names, in feed order
    pub authors: Vec<String>,
    /// Category labels, in feed order
    pub categories: Vec<Category>,
    /// Last modification time (RSS `pubDate`, Atom `updated`/`published`)
    pub modified_at: Option<DateTime<Utc>>,
}

/// A category label attached to a feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub term: String,
}

impl Category {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }
}
