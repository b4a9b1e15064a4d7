use async_trait::async_trait;
use diesel::prelude::*;

use ciel_core::domain::{EventSummary, Song, SongAppearance, SongId, SongRef};
use ciel_core::ports::{RepoError, SongCatalogue};

use crate::models::{EventRow, SongRow, song_ref_from_columns};
use crate::schema::{events, setlists, songs};
use crate::{SqliteArchive, storage};

#[async_trait]
impl SongCatalogue for SqliteArchive {
  async fn find_by_titles(&self, titles: &[String]) -> Result<Vec<SongRef>, RepoError> {
    if titles.is_empty() {
      return Ok(Vec::new());
    }
    let titles = titles.to_vec();

    self
      .run(move |conn| {
        // `=` en SQLite usa la colación BINARY: coincidencia exacta.
        let rows = songs::table
          .filter(songs::title.eq_any(titles))
          .select((songs::id, songs::title))
          .load::<(String, String)>(conn)
          .map_err(storage)?;

        rows.into_iter().map(song_ref_from_columns).collect()
      })
      .await
  }

  async fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError> {
    let id_str = id.to_string();

    self
      .run(move |conn| {
        let row = songs::table
          .filter(songs::id.eq(id_str))
          .select(SongRow::as_select())
          .first(conn)
          .optional()
          .map_err(storage)?;

        row.map(Song::try_from).transpose()
      })
      .await
  }

  async fn list_songs(&self) -> Result<Vec<Song>, RepoError> {
    self
      .run(|conn| {
        // SQLite ordena NULL primero; las canciones sin fecha van al final.
        let rows = songs::table
          .order((songs::release_date.is_null().asc(), songs::release_date.asc(), songs::id.asc()))
          .select(SongRow::as_select())
          .load(conn)
          .map_err(storage)?;

        rows.into_iter().map(Song::try_from).collect()
      })
      .await
  }

  async fn appearances(&self, id: SongId) -> Result<Vec<SongAppearance>, RepoError> {
    let id_str = id.to_string();

    self
      .run(move |conn| {
        let rows = setlists::table
          .inner_join(events::table)
          .filter(setlists::song_id.eq(id_str))
          .order((events::date.asc(), setlists::entry_order.asc()))
          .select((setlists::entry_order, EventRow::as_select()))
          .load::<(i32, EventRow)>(conn)
          .map_err(storage)?;

        rows
          .into_iter()
          .map(|(order, row)| {
            let order = u32::try_from(order).map_err(|_| RepoError::Decode(format!("setlists: invalid order {order}")))?;
            Ok(SongAppearance { order, event: EventSummary::try_from(row)? })
          })
          .collect()
      })
      .await
  }
}
