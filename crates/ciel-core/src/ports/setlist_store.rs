use async_trait::async_trait;

use crate::domain::{NewSetlistEntry, SetlistEntry};
use crate::ports::RepoError;

/// Escritura masiva de setlists.
///
/// Desde el punto de vista del llamador el lote se guarda entero o falla
/// entero; no se reportan filas sueltas.
#[async_trait]
pub trait SetlistStore: Send + Sync {
  async fn create_entries(&self, entries: &[NewSetlistEntry]) -> Result<Vec<SetlistEntry>, RepoError>;
}
