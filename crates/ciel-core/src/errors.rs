use thiserror::Error;

use crate::domain::Event;
use crate::parser::ParseError;
use crate::ports::RepoError;

/// Error genérico del núcleo para las consultas de lectura.
///
/// Las capas superiores (CLI, vistas) lo convierten en un mensaje de usuario.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("repository error: {0}")]
  Repository(#[from] RepoError),

  #[error("not found")]
  NotFound,
}

/// Fallos del flujo de importación, en el orden en que pueden ocurrir.
///
/// Las variantes posteriores a `EventCreate` llevan el evento ya persistido:
/// no se deshace, y el usuario debe saber que existe sin setlist completa.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error("date parse error: {0}")]
  DateParse(#[from] ParseError),

  #[error("event create error: {0}")]
  EventCreate(#[source] RepoError),

  #[error("song lookup error for event {}: {source}", .event.id)]
  SongLookup {
    event: Event,
    #[source]
    source: RepoError,
  },

  #[error("setlist create error for event {}: {source}", .event.id)]
  SetlistCreate {
    event: Event,
    #[source]
    source: RepoError,
  },
}

impl ImportError {
  /// Evento que quedó guardado a pesar del fallo, si lo hay.
  pub fn persisted_event(&self) -> Option<&Event> {
    match self {
      ImportError::DateParse(_) | ImportError::EventCreate(_) => None,
      ImportError::SongLookup { event, .. } | ImportError::SetlistCreate { event, .. } => Some(event),
    }
  }
}
