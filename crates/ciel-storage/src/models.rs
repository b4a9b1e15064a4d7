//! Filas de la base de datos y su conversión validada a tipos del dominio.
//!
//! Nada de lo que sale de SQLite se da por bueno: ids, fechas y tipos de
//! elemento se validan aquí y una fila rota se rechaza con `RepoError::Decode`.

use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use ciel_core::domain::{
  Event, EventId, EventSummary, ItemKind, NewEvent, NewSetlistEntry, SetlistEntry, SetlistEntryId, Song, SongId,
  SongRef,
};
use ciel_core::ports::RepoError;

use crate::schema::{events, setlists, songs};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = songs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SongRow {
  pub id: String,
  pub title: String,
  pub lyricist: Option<String>,
  pub composer: Option<String>,
  pub arranger: Option<String>,
  pub choreographer: Option<String>,
  pub release_date: Option<String>,
  pub notes: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
  pub id: String,
  pub event_name: String,
  pub location: String,
  pub date: String,
  pub notes: Option<String>,
  pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEventRow {
  pub id: String,
  pub event_name: String,
  pub location: String,
  pub date: String,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = setlists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SetlistRow {
  pub id: String,
  pub event_id: String,
  pub song_id: Option<String>,
  pub item_type: String,
  pub entry_order: i32,
  pub notes: Option<String>,
  pub created_at: String,
}

/// `None` se escribe como NULL para que SQLite acepte el insert por lotes.
#[derive(Debug, Insertable)]
#[diesel(table_name = setlists)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewSetlistRow {
  pub id: String,
  pub event_id: String,
  pub song_id: Option<String>,
  pub item_type: String,
  pub entry_order: i32,
  pub notes: Option<String>,
}

fn parse_uuid(table: &str, raw: &str) -> Result<Uuid, RepoError> {
  Uuid::parse_str(raw).map_err(|e| RepoError::Decode(format!("{table}: invalid id {raw:?}: {e}")))
}

fn parse_date(table: &str, raw: &str) -> Result<NaiveDate, RepoError> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
    .map_err(|e| RepoError::Decode(format!("{table}: invalid date {raw:?}: {e}")))
}

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

impl TryFrom<SongRow> for Song {
  type Error = RepoError;

  fn try_from(row: SongRow) -> Result<Self, Self::Error> {
    Ok(Song {
      id: SongId::from_uuid(parse_uuid("songs", &row.id)?),
      title: row.title,
      lyricist: row.lyricist,
      composer: row.composer,
      arranger: row.arranger,
      choreographer: row.choreographer,
      release_date: row.release_date.as_deref().map(|d| parse_date("songs", d)).transpose()?,
      notes: row.notes,
    })
  }
}

pub fn song_ref_from_columns((id, title): (String, String)) -> Result<SongRef, RepoError> {
  Ok(SongRef { id: SongId::from_uuid(parse_uuid("songs", &id)?), title })
}

impl TryFrom<EventRow> for Event {
  type Error = RepoError;

  fn try_from(row: EventRow) -> Result<Self, Self::Error> {
    Ok(Event {
      id: EventId::from_uuid(parse_uuid("events", &row.id)?),
      name: row.event_name,
      location: row.location,
      date: parse_date("events", &row.date)?,
      notes: row.notes,
    })
  }
}

impl TryFrom<EventRow> for EventSummary {
  type Error = RepoError;

  fn try_from(row: EventRow) -> Result<Self, Self::Error> {
    Event::try_from(row).map(|event| EventSummary::from(&event))
  }
}

impl TryFrom<SetlistRow> for SetlistEntry {
  type Error = RepoError;

  fn try_from(row: SetlistRow) -> Result<Self, Self::Error> {
    let kind: ItemKind = row.item_type.parse().map_err(|e| RepoError::Decode(format!("setlists: {e}")))?;
    let song_id = row.song_id.as_deref().map(|id| parse_uuid("setlists", id).map(SongId::from_uuid)).transpose()?;

    let order = u32::try_from(row.entry_order)
      .ok()
      .filter(|order| *order >= 1)
      .ok_or_else(|| RepoError::Decode(format!("setlists: invalid order {}", row.entry_order)))?;

    match (kind, &song_id) {
      (ItemKind::Song, None) => {
        return Err(RepoError::Decode(format!("setlists: song entry {} without song_id", row.id)));
      }
      (ItemKind::Other, Some(_)) => {
        return Err(RepoError::Decode(format!("setlists: other entry {} with song_id", row.id)));
      }
      _ => {}
    }

    Ok(SetlistEntry {
      id: SetlistEntryId::from_uuid(parse_uuid("setlists", &row.id)?),
      event_id: EventId::from_uuid(parse_uuid("setlists", &row.event_id)?),
      order,
      kind,
      song_id,
      note: row.notes,
    })
  }
}

impl From<&NewEvent> for NewEventRow {
  fn from(event: &NewEvent) -> Self {
    NewEventRow {
      id: EventId::new().to_string(),
      event_name: event.name.clone(),
      location: event.location.clone(),
      date: format_date(event.date),
      notes: event.notes.clone(),
    }
  }
}

impl NewSetlistRow {
  pub fn from_entry(id: SetlistEntryId, entry: &NewSetlistEntry) -> Result<Self, RepoError> {
    if !entry.is_consistent() {
      return Err(RepoError::Storage(format!(
        "setlist entry {} of event {} mixes kind {} with song {:?}",
        entry.order, entry.event_id, entry.kind, entry.song_id
      )));
    }
    let entry_order = i32::try_from(entry.order)
      .map_err(|_| RepoError::Storage(format!("setlist order {} out of range", entry.order)))?;

    Ok(NewSetlistRow {
      id: id.to_string(),
      event_id: entry.event_id.to_string(),
      song_id: entry.song_id.map(|id| id.to_string()),
      item_type: entry.kind.as_str().to_string(),
      entry_order,
      notes: entry.note.clone(),
    })
  }
}
