use thiserror::Error;

/// Error payload carried out of caller-supplied hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Destination-store failure, independent of the concrete backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQL-level failure from the SQLite store
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-SQL backends report failures as plain messages
    #[error("store rejected operation: {0}")]
    Backend(String),
}

/// Unified error type for an import run.
///
/// `Configuration` and `FeedRead` are always fatal and surface before any
/// entry is processed. `Store` is fatal only where the engine lets it escape;
/// per-entry store failures are contained in the run loop and reported via
/// the summary instead. Hook errors always terminate the run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Invalid run configuration (unknown content type, taxonomy or language,
    /// empty feed uri)
    #[error("invalid import configuration: {0}")]
    Configuration(String),

    /// The feed collaborator failed before yielding any entries
    #[error("failed to read feed: {0}")]
    FeedRead(#[from] feed::FeedError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A caller-supplied post-insert hook returned an error; the record
    /// itself is already persisted
    #[error("record hook failed for record {record_id}: {source}")]
    RecordHook { record_id: i64, source: BoxError },

    /// A caller-supplied post-term hook returned an error; the term itself
    /// is already persisted
    #[error("term hook failed for term {term_id}: {source}")]
    TermHook { term_id: i64, source: BoxError },
}

impl ImportError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
