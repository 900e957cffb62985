use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use feed::FeedClient;
use importer::{create_pool, ImportConfig, ImportEngine, SqliteStore};

/// Import entries from an RSS or Atom feed into the content store
#[derive(Parser, Debug)]
#[command(name = "feedport", version, about)]
struct Args {
    /// URI of the feed to import
    #[arg(long, env = "FEEDPORT_FEED_URI")]
    feed_uri: String,

    /// Path to the SQLite database
    #[arg(long, env = "FEEDPORT_DATABASE", default_value = "./data/feedport.db")]
    database: PathBuf,

    /// Content type to create records as
    #[arg(long, default_value = "post")]
    content_type: String,

    /// Taxonomy to map feed categories into
    #[arg(long)]
    taxonomy: Option<String>,

    /// Author id assigned to created records
    #[arg(long, default_value_t = 1)]
    author_id: i64,

    /// Language partition for created records (must be configured in the store)
    #[arg(long)]
    language: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Some(parent) = args.database.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let database_url = format!("sqlite:{}?mode=rwc", args.database.display());

    let pool = create_pool(&database_url).await?;
    let store = SqliteStore::new(pool).await?;
    let engine = ImportEngine::new(Arc::new(store));

    let config = ImportConfig {
        feed_uri: args.feed_uri,
        content_type: args.content_type,
        taxonomy: args.taxonomy,
        author_id: args.author_id,
        language: args.language,
    };

    let client = FeedClient::new();
    let summary = engine.import(&client, &config).await?;

    tracing::info!("Import complete: {}", summary);
    Ok(())
}
