pub mod config;
pub mod models;
pub mod schema;

mod catalogue;
mod events;
mod setlists;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use ciel_core::ports::RepoError;

pub use config::StorageConfig;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Pragmas que se aplican a cada conexión que entrega el pool.
#[derive(Debug)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    conn
      .batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
      .map_err(diesel::r2d2::Error::QueryError)
  }
}

/// Adapter SQLite para todos los ports del núcleo
/// (`SongCatalogue`, `EventStore`, `SetlistStore`).
///
/// Diesel es bloqueante: cada operación toma una conexión del pool dentro de
/// `spawn_blocking`, así que clonar el adapter es barato y comparte el pool.
#[derive(Clone)]
pub struct SqliteArchive {
  pool: SqlitePool,
}

impl SqliteArchive {
  pub fn open(database_url: &str) -> Result<Self, RepoError> {
    Self::open_with(database_url, None)
  }

  pub fn open_with(database_url: &str, journal_mode: Option<&str>) -> Result<Self, RepoError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = Pool::builder().connection_customizer(Box::new(ConnectionPragmas));
    if is_memory_url(database_url) {
      // Cada conexión a `:memory:` es una base distinta: una sola, y que no caduque.
      builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
    }
    let pool = builder.build(manager).map_err(storage)?;

    let mut pooled = pool.get().map_err(storage)?;
    let conn: &mut SqliteConnection = &mut pooled;

    if let Some(mode) = journal_mode {
      if !mode.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RepoError::Storage(format!("invalid journal mode {mode:?}")));
      }
      conn.batch_execute(&format!("PRAGMA journal_mode = {mode};")).map_err(storage)?;
    }

    let applied =
      conn.run_pending_migrations(MIGRATIONS).map_err(|e| RepoError::Storage(format!("migrations: {e}")))?;
    info!(database = database_url, migrations = applied.len(), "sqlite archive ready");

    drop(pooled);
    Ok(Self { pool })
  }

  /// Abre la base de datos configurada en la sección `[storage]`.
  pub fn new_from_config() -> Result<Self, RepoError> {
    let cfg = StorageConfig::load().map_err(storage)?;
    Self::from_config(&cfg)
  }

  pub fn from_config(cfg: &StorageConfig) -> Result<Self, RepoError> {
    if let Some(parent) = cfg.db_path.parent() {
      std::fs::create_dir_all(parent).map_err(storage)?;
    }
    let url = cfg.db_path.to_string_lossy();
    Self::open_with(&url, cfg.journal_mode.as_deref())
  }

  /// Ejecuta `f` con una conexión del pool fuera del runtime async.
  pub(crate) async fn run<F, T>(&self, f: F) -> Result<T, RepoError>
  where
    F: FnOnce(&mut SqliteConnection) -> Result<T, RepoError> + Send + 'static,
    T: Send + 'static,
  {
    let pool = self.pool.clone();
    tokio::task::spawn_blocking(move || {
      let mut conn = pool.get().map_err(storage)?;
      debug!("sqlite connection acquired");
      f(&mut conn)
    })
    .await
    .map_err(|e| RepoError::Storage(format!("blocking task failed: {e}")))?
  }
}

fn is_memory_url(database_url: &str) -> bool {
  database_url == ":memory:" || database_url.contains("mode=memory")
}

pub(crate) fn storage<E: std::fmt::Display>(e: E) -> RepoError {
  RepoError::Storage(e.to_string())
}
