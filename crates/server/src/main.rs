//! Bon content service
//!
//! Serves stories, fragments, localized fragments and tags over HTTP, backed
//! by a SQLite store and a SQLite FTS5 search index.

use std::sync::Arc;

use bon_content_persistence::{ContentIndex, ContentStore};
use bon_content_persistence::model::{Fragment, Localized, Story, Tag};
use bon_content_persistence::service::EntityService;
use bon_content_rest::{ServerConfig, create_app_with_config, init_logging};
use clap::Parser;
use tracing::info;

#[cfg(feature = "sqlite")]
use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};

/// Number of entities read per page while rebuilding the search index.
const REINDEX_BATCH_SIZE: u32 = 500;

/// Creates and initializes the SQLite store from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let db_path = config.database_path();
    info!(database = %db_path, "Initializing SQLite backend");

    let backend = if db_path == ":memory:" {
        SqliteBackend::in_memory()?
    } else {
        SqliteBackend::open(db_path)?
    };
    backend.init_schema()?;

    Ok(backend)
}

/// Creates and initializes the FTS5 search index from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_index(config: &ServerConfig) -> anyhow::Result<SqliteSearchIndex> {
    let index_path = config.search_index_path();
    info!(index = %index_path, "Initializing SQLite search index");

    let index = if index_path == ":memory:" {
        SqliteSearchIndex::in_memory()?
    } else {
        SqliteSearchIndex::open(index_path)?
    };
    index.init_schema()?;

    Ok(index)
}

/// Mirrors every stored entity into the search index.
async fn reindex_all<S, I>(store: Arc<S>, index: Arc<I>) -> anyhow::Result<()>
where
    S: ContentStore,
    I: ContentIndex,
{
    let service = EntityService::new(store, index);
    let stories = service.reindex::<Story>(REINDEX_BATCH_SIZE).await?;
    let fragments = service.reindex::<Fragment>(REINDEX_BATCH_SIZE).await?;
    let localizeds = service.reindex::<Localized>(REINDEX_BATCH_SIZE).await?;
    let tags = service.reindex::<Tag>(REINDEX_BATCH_SIZE).await?;
    info!(stories, fragments, localizeds, tags, "Search index rebuilt");
    Ok(())
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        application = %config.application_name,
        "Starting Bon content service"
    );

    start_sqlite(config).await
}

/// Starts the server over the SQLite store and index.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    let store = Arc::new(create_sqlite_backend(&config)?);
    let index = Arc::new(create_sqlite_index(&config)?);

    if config.reindex_on_startup {
        reindex_all(Arc::clone(&store), Arc::clone(&index)).await?;
    }

    let app = create_app_with_config(store, index, config.clone());
    serve(app, &config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p bon-content-server --features sqlite"
    )
}
