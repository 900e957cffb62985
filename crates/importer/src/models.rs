mod record;
mod summary;
mod target;
mod term;

pub(crate) use target::{default_author_id, default_content_type};

pub use record::{NewRecord, Record, RecordStatus};
pub use summary::{EntryOutcome, ImportSummary};
pub use target::ImportTarget;
pub use term::Term;
