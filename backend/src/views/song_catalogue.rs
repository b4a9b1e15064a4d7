use std::fmt::Write;

use ciel_core::domain::Song;
use ciel_core::services::SongHistory;

use crate::views::format::{long_date, or_dash, short_date};

const HEADERS: [&str; 6] = ["ID", "曲名", "作詞", "作曲", "編曲", "振付"];

/// Tabla del catálogo. Los campos vacíos se muestran como `-`.
pub fn render_catalogue(songs: &[Song]) -> String {
  if songs.is_empty() {
    return "曲が登録されていません\n".to_string();
  }

  let rows: Vec<[String; 6]> = songs
    .iter()
    .map(|song| {
      [
        song.id.to_string(),
        song.title.clone(),
        or_dash(song.lyricist.as_deref()).to_string(),
        or_dash(song.composer.as_deref()).to_string(),
        or_dash(song.arranger.as_deref()).to_string(),
        or_dash(song.choreographer.as_deref()).to_string(),
      ]
    })
    .collect();

  let mut widths = HEADERS.map(display_width);
  for row in &rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(display_width(cell));
    }
  }

  let mut out = String::new();
  push_row(&mut out, &HEADERS.map(str::to_string), &widths);
  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  let _ = writeln!(out, "{}", rule.join("-+-"));
  for row in &rows {
    push_row(&mut out, row, &widths);
  }
  out
}

/// Ficha de una canción con su historial de interpretaciones.
pub fn render_song_detail(history: &SongHistory) -> String {
  let song = &history.song;
  let mut out = String::new();

  let _ = writeln!(out, "{}", song.title);
  let release = song.release_date.map(short_date);
  let _ = writeln!(out, "  発売日: {}", or_dash(release.as_deref()));
  let _ = writeln!(out, "  作詞: {}", or_dash(song.lyricist.as_deref()));
  let _ = writeln!(out, "  作曲: {}", or_dash(song.composer.as_deref()));
  let _ = writeln!(out, "  編曲: {}", or_dash(song.arranger.as_deref()));
  let _ = writeln!(out, "  振付: {}", or_dash(song.choreographer.as_deref()));
  if let Some(notes) = song.notes.as_deref().filter(|n| !n.is_empty()) {
    let _ = writeln!(out, "  備考: {notes}");
  }
  let _ = writeln!(out, "  披露回数: {}回", history.performance_count());

  if !history.appearances.is_empty() {
    let _ = writeln!(out, "  披露イベント");
    for appearance in &history.appearances {
      let event = &appearance.event;
      let _ = writeln!(
        out,
        "    {}  {} @{} ({}曲目)",
        long_date(event.date),
        event.name,
        event.location,
        appearance.order
      );
    }
  }

  out
}

// Ancho de columna aproximado: los caracteres de ancho completo cuentan doble.
fn display_width(text: &str) -> usize {
  text.chars().map(|c| if (c as u32) < 0x1100 { 1 } else { 2 }).sum()
}

fn push_row(out: &mut String, row: &[String; 6], widths: &[usize; 6]) {
  let cells: Vec<String> = row
    .iter()
    .zip(widths)
    .map(|(cell, width)| {
      let pad = width.saturating_sub(display_width(cell));
      format!("{cell}{}", " ".repeat(pad))
    })
    .collect();
  let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use ciel_core::domain::{EventId, EventSummary, SongAppearance, SongId};

  use super::*;

  fn song(title: &str, composer: Option<&str>) -> Song {
    Song {
      id: SongId::new(),
      title: title.into(),
      lyricist: None,
      composer: composer.map(str::to_string),
      arranger: None,
      choreographer: None,
      release_date: NaiveDate::from_ymd_opt(2024, 3, 1),
      notes: None,
    }
  }

  #[test]
  fn catalogue_uses_dashes_for_missing_credits() {
    let text = render_catalogue(&[song("Yakusoku", Some("someone"))]);
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("ID"));
    assert!(lines[0].contains("作詞 | 作曲"));
    assert!(lines[2].contains("Yakusoku | -"));
    assert!(lines[2].contains("someone"));
  }

  #[test]
  fn empty_catalogue_message() {
    assert_eq!(render_catalogue(&[]), "曲が登録されていません\n");
  }

  #[test]
  fn detail_lists_performances_with_count() {
    let history = SongHistory {
      song: song("Yakusoku", None),
      appearances: vec![SongAppearance {
        order: 3,
        event: EventSummary {
          id: EventId::new(),
          name: "HYPE IDOL！× AGE FES!".into(),
          date: NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
          location: "品川".into(),
        },
      }],
    };

    let text = render_song_detail(&history);

    assert!(text.contains("発売日: 2024年3月1日"));
    assert!(text.contains("作詞: -"));
    assert!(text.contains("披露回数: 1回"));
    assert!(text.contains("2025年6月8日(日)  HYPE IDOL！× AGE FES! @品川 (3曲目)"));
  }

  #[test]
  fn wide_characters_take_two_columns() {
    assert_eq!(display_width("曲名"), 4);
    assert_eq!(display_width("ID"), 2);
  }
}
