use std::collections::HashSet;
use std::fmt::Write;

use ciel_core::domain::{EventDetail, EventId, ItemKind};

use crate::views::format::long_date;

/// Lista de eventos, del más reciente al más antiguo.
///
/// Qué setlists se muestran desplegadas es estado de la vista: un modo por
/// defecto más los eventos que el usuario alternó.
#[derive(Debug, Clone)]
pub struct EventListView {
  default_expanded: bool,
  toggled: HashSet<EventId>,
}

impl Default for EventListView {
  fn default() -> Self {
    Self::all_expanded()
  }
}

impl EventListView {
  pub fn all_expanded() -> Self {
    Self { default_expanded: true, toggled: HashSet::new() }
  }

  pub fn all_collapsed() -> Self {
    Self { default_expanded: false, toggled: HashSet::new() }
  }

  pub fn toggle(&mut self, id: EventId) {
    if !self.toggled.remove(&id) {
      self.toggled.insert(id);
    }
  }

  pub fn is_expanded(&self, id: EventId) -> bool {
    self.default_expanded != self.toggled.contains(&id)
  }

  pub fn render(&self, events: &[EventDetail]) -> String {
    if events.is_empty() {
      return "まだイベントが登録されていません\n".to_string();
    }

    events
      .iter()
      .map(|detail| render_event(detail, self.is_expanded(detail.event.id)))
      .collect::<Vec<_>>()
      .join("\n")
  }
}

/// Ficha de un evento; con `with_setlist` añade la setlist numerada.
///
/// Sólo las canciones llevan número; MC y títulos sin emparejar van sin él.
pub fn render_event(detail: &EventDetail, with_setlist: bool) -> String {
  let event = &detail.event;
  let mut out = String::new();

  let _ = writeln!(out, "{}", event.name);
  let _ = writeln!(out, "  日付: {}", long_date(event.date));
  let _ = writeln!(out, "  会場: {}", event.location);
  if let Some(notes) = event.notes.as_deref().filter(|n| !n.is_empty()) {
    let _ = writeln!(out, "  備考: {notes}");
  }

  if with_setlist && detail.has_setlist() {
    let _ = writeln!(out, "  セットリスト");
    let mut song_number = 0;
    for item in &detail.items {
      let number = match item.entry.kind {
        ItemKind::Song => {
          song_number += 1;
          format!("{song_number}.")
        }
        ItemKind::Other => String::new(),
      };

      let mut line = format!("    {number:>3} {}", item.label());
      if let (Some(_), Some(note)) = (&item.song, &item.entry.note) {
        let _ = write!(line, "  ({note})");
      }
      let _ = writeln!(out, "{}", line.trim_end());
    }
  }

  out
}
