use std::fmt::Write;

use ciel_core::services::{ImportStatus, StatusKind};

/// Mensaje de estado tras una importación, con los títulos a revisar.
pub fn render_status(status: &ImportStatus) -> String {
  let mut out = String::new();
  let prefix = match status.kind {
    StatusKind::Completed | StatusKind::EventOnly => "✔",
    StatusKind::CompletedWithUnmatched => "⚠",
    StatusKind::SetlistMissing | StatusKind::Failed => "✖",
  };
  let _ = writeln!(out, "{prefix} {}", status.message);

  if let Some(id) = status.event_id {
    let _ = writeln!(out, "  event: {id}");
  }

  if !status.unmatched.is_empty() {
    let _ = writeln!(out, "以下の曲は songs テーブルに見つかりませんでした：");
    for title in &status.unmatched {
      let _ = writeln!(out, "- {title}");
    }
  }

  out
}
