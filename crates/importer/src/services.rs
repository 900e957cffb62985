use std::sync::Arc;

use crate::error::BoxError;

mod dedup;
mod engine;
mod record;
mod term;

pub use dedup::DuplicateChecker;
pub use engine::ImportEngine;
pub use record::RecordBuilder;
pub use term::TermResolver;

/// Caller-supplied callback fired synchronously after a record insert.
///
/// An `Err` terminates the run; the record it was called for stays persisted.
pub type RecordHook = Arc<dyn Fn(i64) -> Result<(), BoxError> + Send + Sync>;

/// Caller-supplied callback fired synchronously after a term insert
pub type TermHook = Arc<dyn Fn(i64) -> Result<(), BoxError> + Send + Sync>;
