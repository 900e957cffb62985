mod record;
mod schema;
mod term;

pub use record::RecordRepository;
pub use schema::SchemaRepository;
pub use term::TermRepository;
