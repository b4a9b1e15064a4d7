use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Escribe `contents` en `<path>.tmp` y lo renombra encima de `path`.
///
/// Crea el directorio padre si falta; si algo falla el temporal se borra.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }

  let tmp = path.with_extension("tmp");
  let written = fs::File::create(&tmp).and_then(|mut file| {
    file.write_all(contents.as_bytes())?;
    file.sync_all()
  });

  match written.and_then(|()| fs::rename(&tmp, path)) {
    Ok(()) => Ok(()),
    Err(e) => {
      let _ = fs::remove_file(&tmp);
      Err(e)
    }
  }
}
