use serde::{Deserialize, Serialize};

use crate::domain::EventId;
use crate::errors::ImportError;
use crate::services::import_service::ImportReport;

/// Cómo terminó un intento de importación, visto por el usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
  /// Evento y setlist guardados, todas las líneas emparejadas.
  Completed,
  /// Guardado completo, pero hay títulos que no están en el catálogo.
  CompletedWithUnmatched,
  /// Sólo se guardó el evento porque no había setlist.
  EventOnly,
  /// El evento existe pero la setlist falta (total o parcialmente).
  SetlistMissing,
  /// No se guardó nada.
  Failed,
}

/// Mensaje único para el usuario más la lista de títulos a corregir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatus {
  pub kind: StatusKind,
  pub message: String,
  pub unmatched: Vec<String>,
  pub event_id: Option<EventId>,
}

impl ImportStatus {
  pub fn from_result(result: &Result<ImportReport, ImportError>) -> Self {
    match result {
      Ok(report) => Self::from_report(report),
      Err(err) => Self::from_error(err),
    }
  }

  pub fn from_report(report: &ImportReport) -> Self {
    let (kind, message) = if report.entries.is_empty() {
      (StatusKind::EventOnly, "イベント登録のみ完了しました（セットリストなし）")
    } else if report.unmatched.is_empty() {
      (StatusKind::Completed, "登録完了しました！🎉")
    } else {
      (StatusKind::CompletedWithUnmatched, "登録完了（一部の曲はカタログに見つかりませんでした）")
    };

    ImportStatus {
      kind,
      message: message.to_string(),
      unmatched: report.unmatched.clone(),
      event_id: Some(report.event.id),
    }
  }

  pub fn from_error(err: &ImportError) -> Self {
    let (kind, message) = match err {
      ImportError::DateParse(_) => (StatusKind::Failed, "日付の解析に失敗しました"),
      ImportError::EventCreate(_) => (StatusKind::Failed, "イベント登録に失敗しました"),
      ImportError::SongLookup { .. } => (StatusKind::SetlistMissing, "曲情報の取得に失敗しました（イベントは登録済）"),
      ImportError::SetlistCreate { .. } => {
        (StatusKind::SetlistMissing, "セットリストの登録に失敗しました（イベントは登録済）")
      }
    };

    ImportStatus {
      kind,
      message: message.to_string(),
      unmatched: Vec::new(),
      event_id: err.persisted_event().map(|e| e.id),
    }
  }

  pub fn is_failure(&self) -> bool {
    matches!(self.kind, StatusKind::Failed | StatusKind::SetlistMissing)
  }
}
