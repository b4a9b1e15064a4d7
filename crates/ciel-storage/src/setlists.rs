use async_trait::async_trait;
use diesel::prelude::*;
use tracing::debug;

use ciel_core::domain::{NewSetlistEntry, SetlistEntry, SetlistEntryId};
use ciel_core::ports::{RepoError, SetlistStore};

use crate::models::NewSetlistRow;
use crate::schema::setlists;
use crate::{SqliteArchive, storage};

#[async_trait]
impl SetlistStore for SqliteArchive {
  /// Inserta todo el lote en una transacción: o entran todas las filas o ninguna.
  async fn create_entries(&self, entries: &[NewSetlistEntry]) -> Result<Vec<SetlistEntry>, RepoError> {
    if entries.is_empty() {
      return Ok(Vec::new());
    }

    let ids: Vec<SetlistEntryId> = entries.iter().map(|_| SetlistEntryId::new()).collect();
    let rows = ids
      .iter()
      .zip(entries)
      .map(|(id, entry)| NewSetlistRow::from_entry(*id, entry))
      .collect::<Result<Vec<_>, _>>()?;

    let inserted = self
      .run(move |conn| {
        conn.transaction(|conn| diesel::insert_into(setlists::table).values(&rows).execute(conn)).map_err(storage)
      })
      .await?;
    debug!(rows = inserted, "setlist batch inserted");

    Ok(
      ids
        .into_iter()
        .zip(entries)
        .map(|(id, entry)| SetlistEntry {
          id,
          event_id: entry.event_id,
          order: entry.order,
          kind: entry.kind,
          song_id: entry.song_id,
          note: entry.note.clone(),
        })
        .collect(),
    )
  }
}
