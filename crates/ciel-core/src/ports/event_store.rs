use async_trait::async_trait;

use crate::domain::{Event, EventDetail, NewEvent};
use crate::ports::RepoError;

#[async_trait]
pub trait EventStore: Send + Sync {
  /// Crea el evento y devuelve la fila con la identidad generada.
  async fn create_event(&self, event: &NewEvent) -> Result<Event, RepoError>;

  /// Todos los eventos por fecha descendente, cada uno con su setlist
  /// ordenada por `order` ascendente.
  async fn list_events(&self) -> Result<Vec<EventDetail>, RepoError>;
}
