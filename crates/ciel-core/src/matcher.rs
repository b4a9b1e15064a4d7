//! Emparejamiento de líneas de setlist con el catálogo de canciones.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{EventId, NewSetlistEntry, SongId, SongRef};

/// Marcador literal de un segmento hablado.
pub const MC_MARKER: &str = "MC";

/// Catálogo indexado por título exacto (sensible a mayúsculas).
#[derive(Debug, Clone, Default)]
pub struct TitleLookup {
  by_title: HashMap<String, SongId>,
}

impl TitleLookup {
  pub fn new(songs: impl IntoIterator<Item = SongRef>) -> Self {
    let by_title = songs.into_iter().map(|s| (s.title, s.id)).collect();
    Self { by_title }
  }

  pub fn get(&self, title: &str) -> Option<SongId> {
    self.by_title.get(title).copied()
  }

  pub fn len(&self) -> usize {
    self.by_title.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_title.is_empty()
  }
}

impl FromIterator<SongRef> for TitleLookup {
  fn from_iter<I: IntoIterator<Item = SongRef>>(iter: I) -> Self {
    TitleLookup::new(iter)
  }
}

/// Setlist resuelta: filas listas para persistir más los títulos sin emparejar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedSetlist {
  pub entries: Vec<NewSetlistEntry>,
  pub unmatched: Vec<String>,
}

pub fn is_mc_line(line: &str) -> bool {
  line.trim().eq_ignore_ascii_case(MC_MARKER)
}

/// Títulos que hay que buscar en el catálogo: sin MC y sin repetidos,
/// en orden de primera aparición.
pub fn lookup_titles(lines: &[String]) -> Vec<String> {
  let mut titles: Vec<String> = Vec::new();
  for line in lines.iter().filter(|l| !is_mc_line(l)) {
    if !titles.contains(line) {
      titles.push(line.clone());
    }
  }
  titles
}

/// Resuelve cada línea en orden. Nunca falla: un título desconocido se
/// convierte en un elemento `other` con la línea como etiqueta y se informa
/// en `unmatched`.
pub fn match_setlist(event_id: EventId, lines: &[String], catalogue: &TitleLookup) -> MatchedSetlist {
  let mut entries = Vec::with_capacity(lines.len());
  let mut unmatched = Vec::new();

  for (index, line) in lines.iter().enumerate() {
    let order = index as u32 + 1;

    let entry = if is_mc_line(line) {
      NewSetlistEntry::other(event_id, order, None)
    } else if let Some(song_id) = catalogue.get(line) {
      NewSetlistEntry::song(event_id, order, song_id)
    } else {
      unmatched.push(line.clone());
      NewSetlistEntry::other(event_id, order, Some(line.clone()))
    };

    entries.push(entry);
  }

  MatchedSetlist { entries, unmatched }
}
