use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::EventId;
use crate::domain::setlist::SetlistItem;

/// Un concierto o evento en vivo.
///
/// `date` es una fecha de calendario sin hora ni zona horaria: se formatea
/// siempre como fecha local para no desplazarla un día.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub id: EventId,
  pub name: String,
  pub location: String,
  pub date: NaiveDate,
  pub notes: Option<String>,
}

/// Datos para crear un evento; el almacén asigna la identidad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
  pub name: String,
  pub location: String,
  pub date: NaiveDate,
  pub notes: Option<String>,
}

/// Vista resumida de un evento, usada en la búsqueda inversa canción → eventos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
  pub id: EventId,
  pub name: String,
  pub date: NaiveDate,
  pub location: String,
}

impl From<&Event> for EventSummary {
  fn from(event: &Event) -> Self {
    EventSummary {
      id: event.id,
      name: event.name.clone(),
      date: event.date,
      location: event.location.clone(),
    }
  }
}

/// Evento con su setlist anidada, ordenada por `order` ascendente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
  pub event: Event,
  pub items: Vec<SetlistItem>,
}

impl EventDetail {
  pub fn has_setlist(&self) -> bool {
    !self.items.is_empty()
  }
}
