use reqwest::Client;

use crate::error::FeedError;
use crate::models::FeedEntry;
use crate::parsers::parse_feed;

/// Feed fetcher client.
///
/// Downloads a syndication feed over HTTP and hands the raw document to the
/// format-detecting parser. The feed format (RSS 2.0 or Atom) is determined
/// from the document itself, not from the URL.
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Create a new FeedClient with a default reqwest Client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new FeedClient with a custom reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch and parse a feed
    ///
    /// # Example
    /// ```no_run
    /// use feed::FeedClient;
    ///
    /// # async fn example() -> feed::Result<()> {
    /// let client = FeedClient::new();
    /// let entries = client.fetch("https://example.org/feed.xml").await?;
    ///
    /// for entry in entries {
    ///     println!("{}", entry.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, url: &str) -> crate::Result<Vec<FeedEntry>> {
        tracing::debug!("Fetching feed from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FeedError::Parse(format!(
                "HTTP {} when fetching {}",
                status, url
            )));
        }

        let bytes = response.bytes().await?;
        let entries = parse_feed(&bytes)?;

        tracing::debug!("Parsed {} entries from feed", entries.len());
        Ok(entries)
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}
