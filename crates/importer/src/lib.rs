pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod store;

pub use config::ImportConfig;
pub use db::create_pool;
pub use error::{BoxError, ImportError, StoreError};
pub use models::{
    EntryOutcome, ImportSummary, ImportTarget, NewRecord, Record, RecordStatus, Term,
};
pub use services::{
    DuplicateChecker, ImportEngine, RecordBuilder, RecordHook, TermHook, TermResolver,
};
pub use store::{ContentStore, MemoryStore, RecordFilter, SqliteStore};
