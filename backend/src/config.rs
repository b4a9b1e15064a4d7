use ciel_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use ciel_core::parser::{DEFAULT_UNKNOWN_LOCATION, DEFAULT_UNTITLED_EVENT, ParseOptions};
use serde::{Deserialize, Serialize};

/// Sección `[import]` de `ciel.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ImportConfig {
  /// Texto usado como lugar cuando el texto pegado no trae línea `@`.
  #[serde(default = "default_unknown_location")]
  pub unknown_location: String,

  /// Texto usado como nombre cuando no se puede deducir.
  #[serde(default = "default_untitled_event")]
  pub untitled_event: String,
}

fn default_unknown_location() -> String {
  DEFAULT_UNKNOWN_LOCATION.to_string()
}

fn default_untitled_event() -> String {
  DEFAULT_UNTITLED_EVENT.to_string()
}

impl Default for ImportConfig {
  fn default() -> Self {
    ImportConfig { unknown_location: default_unknown_location(), untitled_event: default_untitled_event() }
  }
}

impl ImportConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("import")?;
    CONFIG_BACKEND.save_section("import", &cfg)?;
    Ok(cfg)
  }
}

impl From<ImportConfig> for ParseOptions {
  fn from(cfg: ImportConfig) -> Self {
    ParseOptions { unknown_location: cfg.unknown_location, untitled_event: cfg.untitled_event }
  }
}
