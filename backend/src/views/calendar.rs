use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{Datelike, Months, NaiveDate};
use ciel_core::domain::EventDetail;
use serde::{Deserialize, Serialize};

use crate::views::event_list::render_event;
use crate::views::format::{long_date, month_title, truncate_chars};

/// Máximo de eventos listados por día en la cuadrícula.
const NAMES_PER_DAY: usize = 2;
/// Longitud máxima (en caracteres) de un nombre dentro de la cuadrícula.
const NAME_WIDTH: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CalendarLayout {
  /// Semanas de domingo a sábado, con los días de los meses vecinos.
  #[value(name = "grid")]
  MonthGrid,
  /// Lista de fechas con eventos.
  Agenda,
}

/// Calendario mensual con un único renderer y dos disposiciones.
#[derive(Debug, Clone)]
pub struct CalendarView {
  month_start: NaiveDate,
  layout: CalendarLayout,
  today: NaiveDate,
}

impl CalendarView {
  /// `month` puede ser cualquier día del mes a mostrar.
  pub fn new(month: NaiveDate, layout: CalendarLayout, today: NaiveDate) -> Self {
    Self { month_start: first_of_month(month), layout, today }
  }

  pub fn month_start(&self) -> NaiveDate {
    self.month_start
  }

  pub fn next_month(&mut self) {
    if let Some(next) = self.month_start.checked_add_months(Months::new(1)) {
      self.month_start = next;
    }
  }

  pub fn previous_month(&mut self) {
    if let Some(prev) = self.month_start.checked_sub_months(Months::new(1)) {
      self.month_start = prev;
    }
  }

  /// Un evento se puede abrir si ya pasó y tiene setlist.
  pub fn is_selectable(&self, detail: &EventDetail) -> bool {
    detail.has_setlist() && detail.event.date < self.today
  }

  /// Primer evento seleccionable del día, como al pulsar la celda.
  pub fn select_day<'a>(&self, events: &'a [EventDetail], day: NaiveDate) -> Option<&'a EventDetail> {
    events.iter().find(|detail| detail.event.date == day && self.is_selectable(detail))
  }

  pub fn render(&self, events: &[EventDetail]) -> String {
    match self.layout {
      CalendarLayout::MonthGrid => self.render_grid(events),
      CalendarLayout::Agenda => self.render_agenda(events),
    }
  }

  pub fn render_selection(&self, events: &[EventDetail], day: NaiveDate) -> String {
    match self.select_day(events, day) {
      Some(detail) => render_event(detail, true),
      None => format!("{} に表示できるセットリストはありません\n", long_date(day)),
    }
  }

  fn in_month(&self, date: NaiveDate) -> bool {
    date.year() == self.month_start.year() && date.month() == self.month_start.month()
  }

  fn by_date<'a>(&self, events: &'a [EventDetail]) -> BTreeMap<NaiveDate, Vec<&'a EventDetail>> {
    let mut map: BTreeMap<NaiveDate, Vec<&EventDetail>> = BTreeMap::new();
    for detail in events {
      map.entry(detail.event.date).or_default().push(detail);
    }
    map
  }

  fn render_grid(&self, events: &[EventDetail]) -> String {
    let by_date = self.by_date(events);
    let mut out = String::new();

    let _ = writeln!(out, "{}", month_title(self.month_start));
    let _ = writeln!(out, " 日  月  火  水  木  金  土 ");

    let first = self.month_start;
    let grid_start = first - chrono::Days::new(u64::from(first.weekday().num_days_from_sunday()));
    let last = last_of_month(first);
    let grid_len = (last - grid_start).num_days() as usize + 1;
    let grid_len = grid_len.div_ceil(7) * 7;

    for (i, day) in grid_start.iter_days().take(grid_len).enumerate() {
      let cell = if self.in_month(day) {
        let mark = if by_date.contains_key(&day) { '*' } else { ' ' };
        format!(" {:>2}{}", day.day(), mark)
      } else {
        format!("({:>2})", day.day())
      };
      out.push_str(&cell);
      if i % 7 == 6 {
        out.push('\n');
      }
    }

    let in_month: Vec<_> = by_date.iter().filter(|(date, _)| self.in_month(**date)).collect();
    if in_month.is_empty() {
      return out;
    }

    out.push('\n');
    for (date, day_events) in in_month {
      let label = format!("{}/{}", date.month(), date.day());
      for (i, detail) in day_events.iter().take(NAMES_PER_DAY).enumerate() {
        let mark = if self.is_selectable(detail) { " *" } else { "" };
        let prefix = if i == 0 { label.as_str() } else { "" };
        let _ = writeln!(out, "{prefix:>5}  {}{mark}", truncate_chars(&detail.event.name, NAME_WIDTH));
      }
      if day_events.len() > NAMES_PER_DAY {
        let _ = writeln!(out, "{:>5}  +{} more", "", day_events.len() - NAMES_PER_DAY);
      }
    }

    out
  }

  fn render_agenda(&self, events: &[EventDetail]) -> String {
    let by_date = self.by_date(events);
    let mut out = String::new();
    let _ = writeln!(out, "{}", month_title(self.month_start));

    let mut any = false;
    for (date, day_events) in by_date.iter().filter(|(date, _)| self.in_month(**date)) {
      any = true;
      let _ = writeln!(out, "{}", long_date(*date));
      for detail in day_events {
        let setlist = if detail.has_setlist() { " [セットリスト]" } else { "" };
        let _ = writeln!(out, "  {} @{}{setlist}", detail.event.name, detail.event.location);
      }
    }

    if !any {
      let _ = writeln!(out, "この月のイベントはありません");
    }
    out
  }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
  first
    .checked_add_months(Months::new(1))
    .and_then(|next| next.pred_opt())
    .unwrap_or(first)
}

#[cfg(test)]
mod tests {
  use ciel_core::domain::{Event, EventId, ItemKind, SetlistEntry, SetlistEntryId, SetlistItem};

  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn detail(name: &str, date: NaiveDate, with_setlist: bool) -> EventDetail {
    let event = Event { id: EventId::new(), name: name.into(), location: "Hall".into(), date, notes: None };
    let items = if with_setlist {
      vec![SetlistItem {
        entry: SetlistEntry {
          id: SetlistEntryId::new(),
          event_id: event.id,
          order: 1,
          kind: ItemKind::Other,
          song_id: None,
          note: None,
        },
        song: None,
      }]
    } else {
      vec![]
    };
    EventDetail { event, items }
  }

  #[test]
  fn grid_starts_on_sunday_and_shows_outside_days() {
    // Junio de 2025 empieza en domingo y termina en lunes.
    let view = CalendarView::new(ymd(2025, 6, 17), CalendarLayout::MonthGrid, ymd(2025, 7, 1));
    let text = view.render(&[detail("HYPE IDOL！× AGE FES!", ymd(2025, 6, 8), true)]);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "2025年6月");
    assert!(lines[2].starts_with("  1 "));
    assert!(lines[3].starts_with("  8*"));
    assert!(lines[6].contains("( 1)"));
    assert!(text.contains("  6/8  HYPE IDOL！× AGE... *"));
  }

  #[test]
  fn grid_lists_two_names_then_a_counter() {
    let day = ymd(2025, 6, 8);
    let events = vec![detail("A", day, false), detail("B", day, false), detail("C", day, false)];
    let view = CalendarView::new(day, CalendarLayout::MonthGrid, day);

    let text = view.render(&events);

    assert!(text.contains("  6/8  A\n"));
    assert!(text.contains("       B\n"));
    assert!(!text.contains("  C"));
    assert!(text.contains("+1 more"));
  }

  #[test]
  fn agenda_only_lists_the_shown_month() {
    let view = CalendarView::new(ymd(2025, 6, 1), CalendarLayout::Agenda, ymd(2025, 7, 1));
    let events = vec![detail("June", ymd(2025, 6, 8), true), detail("July", ymd(2025, 7, 5), false)];

    let text = view.render(&events);

    assert!(text.contains("2025年6月8日(日)\n  June @Hall [セットリスト]"));
    assert!(!text.contains("July"));
  }

  #[test]
  fn empty_agenda_says_so() {
    let view = CalendarView::new(ymd(2025, 2, 1), CalendarLayout::Agenda, ymd(2025, 7, 1));
    assert!(view.render(&[]).contains("この月のイベントはありません"));
  }

  #[test]
  fn only_past_events_with_setlists_are_selectable() {
    let day = ymd(2025, 6, 8);
    let events =
      vec![detail("No setlist", day, false), detail("With setlist", day, true), detail("Future", ymd(2025, 6, 20), true)];
    let view = CalendarView::new(day, CalendarLayout::MonthGrid, ymd(2025, 6, 10));

    assert_eq!(view.select_day(&events, day).map(|d| d.event.name.as_str()), Some("With setlist"));
    assert!(view.select_day(&events, ymd(2025, 6, 20)).is_none());
    assert!(view.render_selection(&events, ymd(2025, 6, 20)).contains("セットリストはありません"));
  }

  #[test]
  fn month_navigation_wraps_years() {
    let mut view = CalendarView::new(ymd(2025, 12, 31), CalendarLayout::Agenda, ymd(2025, 12, 31));
    view.next_month();
    assert_eq!(view.month_start(), ymd(2026, 1, 1));
    view.previous_month();
    view.previous_month();
    assert_eq!(view.month_start(), ymd(2025, 11, 1));
  }
}
