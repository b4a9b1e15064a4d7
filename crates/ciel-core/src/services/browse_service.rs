use serde::{Deserialize, Serialize};

use crate::domain::{EventDetail, Song, SongAppearance, SongId};
use crate::errors::CoreError;
use crate::ports::{EventStore, SongCatalogue};

/// Ficha de una canción con los eventos donde se interpretó.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongHistory {
  pub song: Song,
  /// Apariciones de la más antigua a la más reciente.
  pub appearances: Vec<SongAppearance>,
}

impl SongHistory {
  pub fn performance_count(&self) -> usize {
    self.appearances.len()
  }
}

/// Consultas de sólo lectura que alimentan las vistas.
pub struct BrowseService<E, C>
where
  E: EventStore,
  C: SongCatalogue,
{
  events: E,
  catalogue: C,
}

impl<E, C> BrowseService<E, C>
where
  E: EventStore,
  C: SongCatalogue,
{
  pub fn new(events: E, catalogue: C) -> Self {
    Self { events, catalogue }
  }

  // -------- QUERY (read) --------

  pub async fn events(&self) -> Result<Vec<EventDetail>, CoreError> {
    Ok(self.events.list_events().await?)
  }

  pub async fn songs(&self) -> Result<Vec<Song>, CoreError> {
    Ok(self.catalogue.list_songs().await?)
  }

  pub async fn song(&self, id: SongId) -> Result<Song, CoreError> {
    self.catalogue.find_song(id).await?.ok_or(CoreError::NotFound)
  }

  pub async fn song_history(&self, id: SongId) -> Result<SongHistory, CoreError> {
    let song = self.song(id).await?;
    let mut appearances = self.catalogue.appearances(id).await?;
    appearances.sort_by(|a, b| a.event.date.cmp(&b.event.date).then(a.order.cmp(&b.order)));
    Ok(SongHistory { song, appearances })
  }
}
