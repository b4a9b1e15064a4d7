use crate::io::atomic_write_str;
use crate::paths::{CielPaths, ConfigError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

/// Un único `ciel.toml` con una tabla por sección (`[storage]`, `[import]`...).
pub struct TomlConfigBackend {
  paths: CielPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: CielPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &CielPaths {
    &self.paths
  }

  /// Como [`ConfigBackend::load_section`], pero un archivo o sección ausente
  /// devuelve `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let table: toml::Table = toml::from_str(&content)?;

    let Some(value) = table.get(section) else {
      return Ok(T::default());
    };

    decode_section(section, value)
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, value: &toml::Value) -> Result<T, ConfigError> {
  value.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let table: toml::Table = toml::from_str(&content)?;

    let value = table
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", path)))?;

    decode_section(section, value)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    let mut doc = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("{}: {e}", path.display())))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // Sólo se reemplaza la tabla de la sección; comentarios y demás tablas quedan.
    doc[section] = section_item(section, value)?;

    atomic_write_str(&path, &doc.to_string())?;
    tracing::debug!(path = %path.display(), section, "config section saved");
    Ok(())
  }
}

fn section_item<T: Serialize>(section: &str, value: &T) -> Result<Item, ConfigError> {
  let encoded =
    toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;
  let doc = encoded
    .parse::<DocumentMut>()
    .map_err(|e| ConfigError::Other(format!("re-parse section [{section}]: {e}")))?;
  Ok(doc.into_item())
}
