pub mod event_store;
pub mod setlist_store;
pub mod song_catalogue;

pub use event_store::EventStore;
pub use setlist_store::SetlistStore;
pub use song_catalogue::SongCatalogue;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
  #[error("entity not found")]
  NotFound,
  #[error("storage error: {0}")]
  Storage(String),
  /// Una fila del almacén no se pudo convertir a un tipo del dominio.
  #[error("malformed row: {0}")]
  Decode(String),
}
