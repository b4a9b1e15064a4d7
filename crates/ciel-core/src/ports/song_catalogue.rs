use async_trait::async_trait;

use crate::domain::{Song, SongAppearance, SongId, SongRef};
use crate::ports::RepoError;

/// Port de lectura del catálogo de canciones.
///
/// El catálogo es de sólo lectura desde este sistema; las altas y ediciones
/// de canciones ocurren fuera.
#[async_trait]
pub trait SongCatalogue: Send + Sync {
  /// Búsqueda masiva por títulos exactos. Devuelve sólo las filas cuyo título
  /// es byte a byte uno de `titles`.
  async fn find_by_titles(&self, titles: &[String]) -> Result<Vec<SongRef>, RepoError>;

  async fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError>;

  /// Todas las canciones, por fecha de lanzamiento y luego por id.
  async fn list_songs(&self) -> Result<Vec<Song>, RepoError>;

  /// Búsqueda inversa: cada fila de setlist que referencia la canción,
  /// junto con su evento.
  async fn appearances(&self, id: SongId) -> Result<Vec<SongAppearance>, RepoError>;
}
