use ciel_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_JOURNAL_MODE: &str = "WAL";

/// Sección `[storage]` de `ciel.toml`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
  /// Archivo SQLite; se crea junto con sus directorios si no existe.
  pub db_path: PathBuf,
  /// `PRAGMA journal_mode` aplicado al abrir. `None` deja el de SQLite.
  pub journal_mode: Option<String>,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self::with_db_path(PATHS.default_database())
  }
}

impl StorageConfig {
  /// Configuración para una base de datos concreta, sin leer `ciel.toml`.
  pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
    StorageConfig { db_path: db_path.into(), journal_mode: Some(DEFAULT_JOURNAL_MODE.to_string()) }
  }

  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("storage")?;
    CONFIG_BACKEND.save_section("storage", &cfg)?;
    Ok(cfg)
  }
}
