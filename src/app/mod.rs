//! Application setup and runtime.

use crate::{db, http};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
  pub db_url: String,
  pub addr: SocketAddr,
  pub static_roots: Vec<PathBuf>,
}

impl Config {
  /// Build a configuration from `LOGBOX_*` environment variables.
  pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
    let db_url =
      std::env::var("LOGBOX_DATABASE").unwrap_or_else(|_| "sqlite://logs.db".to_string());
    let addr: SocketAddr = std::env::var("LOGBOX_ADDR")
      .unwrap_or_else(|_| "127.0.0.1:8055".to_string())
      .parse()?;
    // Colon-separated list; earlier roots shadow later ones.
    let static_roots = std::env::var("LOGBOX_STATIC")
      .unwrap_or_else(|_| "./static".to_string())
      .split(':')
      .filter(|p| !p.is_empty())
      .map(PathBuf::from)
      .collect();
    Ok(Config {
      db_url,
      addr,
      static_roots,
    })
  }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
  pub db: SqlitePool,
  pub static_roots: Arc<Vec<PathBuf>>,
}

/// Start the HTTP server with the given configuration.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  crate::util::init_tracing();

  let db_url = db::ensure_sqlite_path(&config.db_url);
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;
  db::run_migrations(&pool).await?;

  let state = AppState {
    db: pool,
    static_roots: Arc::new(config.static_roots),
  };

  let app = http::build_router(state);

  info!("log viewer:       http://{}/log", config.addr);
  info!("beacon endpoint:  POST http://{}/log", config.addr);

  let listener = tokio::net::TcpListener::bind(config.addr).await?;
  // Handlers read the peer address of each connection, so the service is
  // built with connect info.
  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await?;
  Ok(())
}
