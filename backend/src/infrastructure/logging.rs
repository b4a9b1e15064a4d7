use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "ciel=info,ciel_lib=info,ciel_core=info,ciel_storage=info";

/// Filtro por defecto según cuántas veces se pasó `-v`.
pub fn default_filter(verbosity: u8) -> String {
  match verbosity {
    0 => DEFAULT_FILTER.to_string(),
    1 => DEFAULT_FILTER.replace("=info", "=debug"),
    _ => "trace".to_string(),
  }
}

/// Inicializa `tracing` escribiendo en stderr para no mezclarse con la salida.
///
/// `RUST_LOG` tiene prioridad sobre la verbosidad de la línea de comandos.
pub fn init(verbosity: u8) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
    .try_init();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_raises_the_default_level() {
    assert!(default_filter(0).contains("ciel_core=info"));
    assert!(default_filter(1).contains("ciel_storage=debug"));
    assert_eq!(default_filter(3), "trace");
  }
}
