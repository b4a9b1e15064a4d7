use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;

use ciel_core::domain::{Event, EventDetail, NewEvent, SetlistEntry, SetlistItem, Song};
use ciel_core::ports::{EventStore, RepoError};

use crate::models::{EventRow, NewEventRow, SetlistRow, SongRow};
use crate::schema::{events, setlists, songs};
use crate::{SqliteArchive, storage};

#[async_trait]
impl EventStore for SqliteArchive {
  async fn create_event(&self, event: &NewEvent) -> Result<Event, RepoError> {
    let new_row = NewEventRow::from(event);

    self
      .run(move |conn| {
        let row = diesel::insert_into(events::table)
          .values(&new_row)
          .returning(EventRow::as_returning())
          .get_result(conn)
          .map_err(storage)?;

        Event::try_from(row)
      })
      .await
  }

  async fn list_events(&self) -> Result<Vec<EventDetail>, RepoError> {
    self
      .run(|conn| {
        let event_rows = events::table
          .order((events::date.desc(), events::created_at.desc(), events::id.asc()))
          .select(EventRow::as_select())
          .load(conn)
          .map_err(storage)?;

        let item_rows = setlists::table
          .left_join(songs::table)
          .order((setlists::event_id.asc(), setlists::entry_order.asc()))
          .select((SetlistRow::as_select(), Option::<SongRow>::as_select()))
          .load::<(SetlistRow, Option<SongRow>)>(conn)
          .map_err(storage)?;

        let mut items_by_event: HashMap<String, Vec<SetlistItem>> = HashMap::new();
        for (entry_row, song_row) in item_rows {
          let event_key = entry_row.event_id.clone();
          let item = SetlistItem { entry: SetlistEntry::try_from(entry_row)?, song: song_row.map(Song::try_from).transpose()? };
          items_by_event.entry(event_key).or_default().push(item);
        }

        event_rows
          .into_iter()
          .map(|row| {
            let mut items = items_by_event.remove(&row.id).unwrap_or_default();
            items.sort_by_key(|item| item.entry.order);
            Ok(EventDetail { event: Event::try_from(row)?, items })
          })
          .collect()
      })
      .await
  }
}
