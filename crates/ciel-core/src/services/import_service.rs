use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{Event, NewEvent, SetlistEntry};
use crate::errors::ImportError;
use crate::matcher::{TitleLookup, lookup_titles, match_setlist};
use crate::parser::{ParseOptions, parse_import, parse_setlist_lines};
use crate::ports::{EventStore, SetlistStore, SongCatalogue};

/// Resultado de una importación que llegó hasta el final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
  pub event: Event,
  pub entries: Vec<SetlistEntry>,
  /// Líneas sin canción en el catálogo; se guardaron como `other`.
  pub unmatched: Vec<String>,
}

/// Orquesta el alta de un evento con su setlist:
/// parsear → crear evento → buscar canciones → crear filas de setlist.
///
/// Cada paso espera al anterior. No hay transacción entre el evento y la
/// setlist: si falla la segunda escritura el evento queda guardado.
pub struct ImportService<E, C, S>
where
  E: EventStore,
  C: SongCatalogue,
  S: SetlistStore,
{
  events: E,
  catalogue: C,
  setlists: S,
  options: ParseOptions,
}

impl<E, C, S> ImportService<E, C, S>
where
  E: EventStore,
  C: SongCatalogue,
  S: SetlistStore,
{
  pub fn new(events: E, catalogue: C, setlists: S) -> Self {
    Self { events, catalogue, setlists, options: ParseOptions::default() }
  }

  pub fn with_options(mut self, options: ParseOptions) -> Self {
    self.options = options;
    self
  }

  /// Importa un texto pegado (fecha, título, `@lugar`, `#`, canciones).
  pub async fn import_text(&self, raw: &str, notes: Option<String>) -> Result<ImportReport, ImportError> {
    let parsed = parse_import(raw, &self.options)?;
    info!(
      name = %parsed.event_name,
      date = %parsed.date,
      lines = parsed.setlist_lines.len(),
      "parsed setlist text"
    );

    let new_event =
      NewEvent { name: parsed.event_name, location: parsed.location, date: parsed.date, notes };

    self.persist(new_event, parsed.setlist_lines).await
  }

  /// Registro manual: los datos del evento vienen de un formulario y la
  /// setlist es una canción por línea, con numeración opcional.
  pub async fn register(&self, new_event: NewEvent, setlist_text: &str) -> Result<ImportReport, ImportError> {
    let lines = parse_setlist_lines(setlist_text);
    self.persist(new_event, lines).await
  }

  async fn persist(&self, new_event: NewEvent, lines: Vec<String>) -> Result<ImportReport, ImportError> {
    let event = self.events.create_event(&new_event).await.map_err(ImportError::EventCreate)?;
    info!(event_id = %event.id, "event created");

    if lines.is_empty() {
      return Ok(ImportReport { event, entries: Vec::new(), unmatched: Vec::new() });
    }

    let titles = lookup_titles(&lines);
    let found = if titles.is_empty() {
      Vec::new()
    } else {
      self
        .catalogue
        .find_by_titles(&titles)
        .await
        .map_err(|source| ImportError::SongLookup { event: event.clone(), source })?
    };

    // Sólo cuentan las filas cuyo título es exactamente uno de los pedidos.
    let lookup: TitleLookup = found.into_iter().filter(|song| titles.contains(&song.title)).collect();
    debug!(requested = titles.len(), found = lookup.len(), "catalogue lookup done");

    let matched = match_setlist(event.id, &lines, &lookup);
    if !matched.unmatched.is_empty() {
      warn!(event_id = %event.id, unmatched = ?matched.unmatched, "setlist lines without catalogue match");
    }

    let entries = self
      .setlists
      .create_entries(&matched.entries)
      .await
      .map_err(|source| ImportError::SetlistCreate { event: event.clone(), source })?;
    info!(event_id = %event.id, entries = entries.len(), "setlist created");

    Ok(ImportReport { event, entries, unmatched: matched.unmatched })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use async_trait::async_trait;
  use chrono::NaiveDate;

  use super::*;
  use crate::domain::{
    EventDetail, EventId, ItemKind, NewSetlistEntry, SetlistEntryId, Song, SongAppearance, SongId, SongRef,
  };
  use crate::parser::DEFAULT_UNKNOWN_LOCATION;
  use crate::ports::RepoError;

  #[derive(Default)]
  struct FakeEvents {
    fail: bool,
    calls: AtomicUsize,
  }

  #[async_trait]
  impl<'a> EventStore for &'a FakeEvents {
    async fn create_event(&self, event: &NewEvent) -> Result<Event, RepoError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        return Err(RepoError::Storage("insert rejected".into()));
      }
      Ok(Event {
        id: EventId::new(),
        name: event.name.clone(),
        location: event.location.clone(),
        date: event.date,
        notes: event.notes.clone(),
      })
    }

    async fn list_events(&self) -> Result<Vec<EventDetail>, RepoError> {
      Ok(Vec::new())
    }
  }

  #[derive(Default)]
  struct FakeCatalogue {
    songs: Vec<SongRef>,
    fail: bool,
    requested: Mutex<Vec<Vec<String>>>,
  }

  impl FakeCatalogue {
    fn with_titles(titles: &[&str]) -> Self {
      let songs = titles.iter().map(|t| SongRef { id: SongId::new(), title: t.to_string() }).collect();
      FakeCatalogue { songs, ..Default::default() }
    }

    fn id_of(&self, title: &str) -> SongId {
      self.songs.iter().find(|s| s.title == title).map(|s| s.id).unwrap()
    }
  }

  #[async_trait]
  impl<'a> SongCatalogue for &'a FakeCatalogue {
    async fn find_by_titles(&self, titles: &[String]) -> Result<Vec<SongRef>, RepoError> {
      self.requested.lock().unwrap().push(titles.to_vec());
      if self.fail {
        return Err(RepoError::Storage("catalogue offline".into()));
      }
      // Devuelve todo: el servicio debe quedarse sólo con los títulos pedidos.
      Ok(self.songs.clone())
    }

    async fn find_song(&self, _id: SongId) -> Result<Option<Song>, RepoError> {
      Ok(None)
    }

    async fn list_songs(&self) -> Result<Vec<Song>, RepoError> {
      Ok(Vec::new())
    }

    async fn appearances(&self, _id: SongId) -> Result<Vec<SongAppearance>, RepoError> {
      Ok(Vec::new())
    }
  }

  #[derive(Default)]
  struct FakeSetlists {
    fail: bool,
    calls: AtomicUsize,
    written: Mutex<Vec<NewSetlistEntry>>,
  }

  #[async_trait]
  impl<'a> SetlistStore for &'a FakeSetlists {
    async fn create_entries(&self, entries: &[NewSetlistEntry]) -> Result<Vec<SetlistEntry>, RepoError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        return Err(RepoError::Storage("batch rejected".into()));
      }
      self.written.lock().unwrap().extend_from_slice(entries);
      Ok(
        entries
          .iter()
          .map(|e| SetlistEntry {
            id: SetlistEntryId::new(),
            event_id: e.event_id,
            order: e.order,
            kind: e.kind,
            song_id: e.song_id,
            note: e.note.clone(),
          })
          .collect(),
      )
    }
  }

  const SAMPLE: &str = "2025.6.8(日)\nHYPE IDOL！× AGE FES!\n@ 品川グランドホール\n\n#しえるセットリスト\nYakusoku\nWe Can\n";

  #[tokio::test]
  async fn imports_the_pasted_sample() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue::with_titles(&["Yakusoku", "Answer"]);
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let report = service.import_text(SAMPLE, None).await.unwrap();

    assert_eq!(report.event.name, "HYPE IDOL！× AGE FES!");
    assert_eq!(report.event.location, "品川グランドホール");
    assert_eq!(report.event.date, NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
    assert_eq!(report.unmatched, vec!["We Can"]);

    let written = setlists.written.lock().unwrap().clone();
    assert_eq!(
      written,
      vec![
        NewSetlistEntry::song(report.event.id, 1, catalogue.id_of("Yakusoku")),
        NewSetlistEntry::other(report.event.id, 2, Some("We Can".into())),
      ]
    );
    assert_eq!(*catalogue.requested.lock().unwrap(), vec![vec!["Yakusoku".to_string(), "We Can".to_string()]]);
  }

  #[tokio::test]
  async fn missing_location_uses_sentinel_and_reports_unmatched() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue::with_titles(&["Answer"]);
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let report = service.import_text("2025.1.5\nLive\n#\nAnswer\nTrue Love", None).await.unwrap();

    assert_eq!(report.event.location, DEFAULT_UNKNOWN_LOCATION);
    let shape: Vec<(u32, ItemKind, Option<String>)> =
      report.entries.iter().map(|e| (e.order, e.kind, e.note.clone())).collect();
    assert_eq!(shape, vec![(1, ItemKind::Song, None), (2, ItemKind::Other, Some("True Love".into()))]);
    assert_eq!(report.unmatched, vec!["True Love"]);
  }

  #[tokio::test]
  async fn date_parse_failure_writes_nothing() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue::default();
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let err = service.import_text("no date here\n#\nA", None).await.unwrap_err();

    assert!(matches!(err, ImportError::DateParse(_)));
    assert_eq!(events.calls.load(Ordering::SeqCst), 0);
    assert_eq!(setlists.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn event_write_failure_never_reaches_setlist_write() {
    let events = FakeEvents { fail: true, ..Default::default() };
    let catalogue = FakeCatalogue::with_titles(&["Yakusoku"]);
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let err = service.import_text(SAMPLE, None).await.unwrap_err();

    assert!(matches!(err, ImportError::EventCreate(_)));
    assert!(err.persisted_event().is_none());
    assert_eq!(setlists.calls.load(Ordering::SeqCst), 0);
    assert!(catalogue.requested.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn lookup_failure_keeps_the_event() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue { fail: true, ..Default::default() };
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let err = service.import_text(SAMPLE, None).await.unwrap_err();

    assert!(matches!(err, ImportError::SongLookup { .. }));
    assert_eq!(err.persisted_event().map(|e| e.name.as_str()), Some("HYPE IDOL！× AGE FES!"));
    assert_eq!(setlists.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn setlist_failure_is_reported_without_rollback() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue::with_titles(&["Yakusoku"]);
    let setlists = FakeSetlists { fail: true, ..Default::default() };
    let service = ImportService::new(&events, &catalogue, &setlists);

    let err = service.import_text(SAMPLE, None).await.unwrap_err();

    assert!(matches!(err, ImportError::SetlistCreate { .. }));
    assert!(err.persisted_event().is_some());
    assert_eq!(events.calls.load(Ordering::SeqCst), 1);
    assert_eq!(setlists.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn only_mc_lines_skip_the_catalogue_lookup() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue::default();
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let report = service.import_text("2025.2.2\nTalk Live\n@ Cafe\n#\nMC\nmc", None).await.unwrap();

    assert!(catalogue.requested.lock().unwrap().is_empty());
    assert_eq!(report.entries.len(), 2);
    assert!(report.entries.iter().all(|e| e.kind == ItemKind::Other && e.note.is_none()));
    assert!(report.unmatched.is_empty());
  }

  #[tokio::test]
  async fn register_without_setlist_creates_only_the_event() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue::default();
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let new_event = NewEvent {
      name: "Release Event".into(),
      location: "Tower Records".into(),
      date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
      notes: Some("特典会あり".into()),
    };
    let report = service.register(new_event, "\n  \n").await.unwrap();

    assert_eq!(report.event.notes.as_deref(), Some("特典会あり"));
    assert!(report.entries.is_empty());
    assert_eq!(events.calls.load(Ordering::SeqCst), 1);
    assert_eq!(setlists.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn register_strips_numbering_and_matches() {
    let events = FakeEvents::default();
    let catalogue = FakeCatalogue::with_titles(&["Answer", "True Love"]);
    let setlists = FakeSetlists::default();
    let service = ImportService::new(&events, &catalogue, &setlists);

    let new_event = NewEvent {
      name: "Live".into(),
      location: "Hall".into(),
      date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
      notes: None,
    };
    let report = service.register(new_event, "1. Answer\n2. MC\n3. True Love").await.unwrap();

    let kinds: Vec<ItemKind> = report.entries.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ItemKind::Song, ItemKind::Other, ItemKind::Song]);
    assert_eq!(report.entries[2].song_id, Some(catalogue.id_of("True Love")));
  }
}
