use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::SongId;

/// La Canción (Song): una obra del catálogo.
///
/// El catálogo es de sólo lectura para este sistema: las canciones se
/// consultan por título exacto al importar setlists y se listan en las vistas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  /// Identificador único de la canción dentro del sistema.
  pub id: SongId,
  /// Título exacto; es la clave usada para emparejar líneas de setlist.
  pub title: String,
  /// Autor/a de la letra.
  pub lyricist: Option<String>,
  /// Compositor/a de la música.
  pub composer: Option<String>,
  /// Arreglista.
  pub arranger: Option<String>,
  /// Coreógrafo/a.
  pub choreographer: Option<String>,
  /// Fecha de lanzamiento, si se conoce.
  pub release_date: Option<NaiveDate>,
  /// Notas libres.
  pub notes: Option<String>,
}

/// Resultado mínimo de la búsqueda masiva por títulos: `{id, title}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRef {
  pub id: SongId,
  pub title: String,
}

impl From<&Song> for SongRef {
  fn from(song: &Song) -> Self {
    SongRef { id: song.id, title: song.title.clone() }
  }
}
