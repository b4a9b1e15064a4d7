use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::domain::event::EventSummary;
use crate::domain::ids::{EventId, SetlistEntryId, SongId};
use crate::domain::song::Song;

/// Tipo de elemento dentro de una setlist.
///
/// El nombre canónico del elemento que no es canción es `other`; al
/// decodificar se acepta también `mc`, que es como lo guardaban versiones
/// anteriores del sitio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
  /// Una canción del catálogo.
  Song,
  /// MC, segmento hablado o título que no existe en el catálogo.
  Other,
}

impl ItemKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ItemKind::Song => "song",
      ItemKind::Other => "other",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown setlist item kind: {0:?}")]
pub struct UnknownItemKind(pub String);

impl FromStr for ItemKind {
  type Err = UnknownItemKind;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "song" => Ok(ItemKind::Song),
      "other" | "mc" => Ok(ItemKind::Other),
      _ => Err(UnknownItemKind(s.to_string())),
    }
  }
}

impl fmt::Display for ItemKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Una fila persistida de setlist.
///
/// Invariante: `song_id` está presente si y sólo si `kind == ItemKind::Song`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetlistEntry {
  pub id: SetlistEntryId,
  pub event_id: EventId,
  /// Posición 1-based, contigua y única dentro del evento.
  pub order: u32,
  pub kind: ItemKind,
  pub song_id: Option<SongId>,
  /// Etiqueta libre. Para `Other` sin emparejar es el texto original de la línea.
  pub note: Option<String>,
}

/// Fila de setlist aún no persistida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSetlistEntry {
  pub event_id: EventId,
  pub order: u32,
  pub kind: ItemKind,
  pub song_id: Option<SongId>,
  pub note: Option<String>,
}

impl NewSetlistEntry {
  pub fn song(event_id: EventId, order: u32, song_id: SongId) -> Self {
    Self { event_id, order, kind: ItemKind::Song, song_id: Some(song_id), note: None }
  }

  pub fn other(event_id: EventId, order: u32, note: Option<String>) -> Self {
    Self { event_id, order, kind: ItemKind::Other, song_id: None, note }
  }

  /// `true` si la fila es coherente con su tipo.
  pub fn is_consistent(&self) -> bool {
    match self.kind {
      ItemKind::Song => self.song_id.is_some(),
      ItemKind::Other => self.song_id.is_none(),
    }
  }
}

/// Elemento de setlist con la canción referenciada ya resuelta (si la hay).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetlistItem {
  pub entry: SetlistEntry,
  pub song: Option<Song>,
}

impl SetlistItem {
  /// Texto a mostrar: título de la canción, la nota libre, o `MC`.
  pub fn label(&self) -> &str {
    match (&self.song, &self.entry.note) {
      (Some(song), _) => &song.title,
      (None, Some(note)) => note,
      (None, None) => "MC",
    }
  }
}

/// Una aparición de una canción en la setlist de un evento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongAppearance {
  pub order: u32,
  pub event: EventSummary,
}
