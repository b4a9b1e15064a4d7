//! Parser del texto libre de setlists.
//!
//! Convierte un texto pegado como
//!
//! ```text
//! 2025.6.8(日)
//! HYPE IDOL！× AGE FES!
//! @ 品川グランドホール
//!
//! #しえるセットリスト
//! Yakusoku
//! We Can
//! ```
//!
//! en un [`ParsedImport`]. No hace I/O: el emparejamiento con el catálogo
//! vive en [`crate::matcher`].

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `YYYY.M.D` al inicio de la línea; puede seguirle texto (p. ej. `(日)`).
static DATE_LINE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^([0-9]{4})\.([0-9]{1,2})\.([0-9]{1,2})").expect("valid date regex"));

/// Prefijo ordinal como `1.`, `12 ` o `3.　`.
static ORDINAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.?\s*").expect("valid ordinal regex"));

pub const DEFAULT_UNKNOWN_LOCATION: &str = "場所不明";
pub const DEFAULT_UNTITLED_EVENT: &str = "無題イベント";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("no line starting with a YYYY.M.D date was found")]
  MissingDate,

  #[error("invalid calendar date in line {line:?}")]
  InvalidDate { line: String },
}

/// Textos centinela para los campos que faltan en el texto pegado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
  pub unknown_location: String,
  pub untitled_event: String,
}

impl Default for ParseOptions {
  fn default() -> Self {
    ParseOptions {
      unknown_location: DEFAULT_UNKNOWN_LOCATION.to_string(),
      untitled_event: DEFAULT_UNTITLED_EVENT.to_string(),
    }
  }
}

/// Borrador estructurado de un evento y su setlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedImport {
  pub event_name: String,
  pub location: String,
  pub date: NaiveDate,
  /// Títulos en orden de aparición; su posición (1-based) es el `order`.
  pub setlist_lines: Vec<String>,
}

impl ParsedImport {
  /// Forma canónica en texto: volver a parsearla da el mismo resultado.
  ///
  /// Las líneas de la setlist se numeran para que un título que empieza
  /// por dígitos sobreviva al recorte del prefijo ordinal.
  pub fn to_text(&self) -> String {
    let mut out = format!(
      "{:04}.{}.{}\n{}\n@ {}\n#\n",
      self.date.year(),
      self.date.month(),
      self.date.day(),
      self.event_name,
      self.location
    );
    for (index, line) in self.setlist_lines.iter().enumerate() {
      out.push_str(&format!("{}. {}\n", index + 1, line));
    }
    out
  }
}

/// Parsea el texto completo de importación.
pub fn parse_import(text: &str, options: &ParseOptions) -> Result<ParsedImport, ParseError> {
  let lines = clean_lines(text);

  let (date_idx, date) = find_date(&lines)?;
  let location_idx = lines.iter().position(|l| l.starts_with('@'));
  let marker_idx = lines.iter().position(|l| l.starts_with('#'));

  let location = location_idx
    .map(|i| lines[i].trim_start_matches('@').trim().to_string())
    .filter(|loc| !loc.is_empty())
    .unwrap_or_else(|| options.unknown_location.clone());

  let event_name =
    event_name(&lines, date_idx, location_idx, marker_idx).unwrap_or_else(|| options.untitled_event.clone());

  let setlist_lines = match marker_idx {
    Some(i) => strip_ordinals(&lines[i + 1..]),
    None => Vec::new(),
  };

  Ok(ParsedImport { event_name, location, date, setlist_lines })
}

/// Sólo la parte de la setlist: una línea por título, con o sin numeración.
///
/// Lo usa el registro manual, donde los datos del evento vienen de un formulario.
pub fn parse_setlist_lines(text: &str) -> Vec<String> {
  strip_ordinals(&clean_lines(text))
}

fn clean_lines(text: &str) -> Vec<&str> {
  text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn find_date(lines: &[&str]) -> Result<(usize, NaiveDate), ParseError> {
  let (idx, caps) = lines
    .iter()
    .enumerate()
    .find_map(|(i, line)| DATE_LINE.captures(line).map(|caps| (i, caps)))
    .ok_or(ParseError::MissingDate)?;

  let invalid = || ParseError::InvalidDate { line: lines[idx].to_string() };

  let year: i32 = caps[1].parse().map_err(|_| invalid())?;
  let month: u32 = caps[2].parse().map_err(|_| invalid())?;
  let day: u32 = caps[3].parse().map_err(|_| invalid())?;

  let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
  Ok((idx, date))
}

fn event_name(
  lines: &[&str],
  date_idx: usize,
  location_idx: Option<usize>,
  marker_idx: Option<usize>,
) -> Option<String> {
  match location_idx {
    Some(loc) if loc > date_idx => {
      // El nombre nunca se extiende más allá del marcador de setlist.
      let end = match marker_idx {
        Some(m) if m > date_idx && m < loc => m,
        _ => loc,
      };
      let name = lines[date_idx + 1..end].join(" ");
      (!name.is_empty()).then_some(name)
    }
    _ => lines
      .get(date_idx + 1)
      .filter(|l| !l.starts_with('#') && !l.starts_with('@'))
      .map(|l| l.to_string()),
  }
}

fn strip_ordinals(lines: &[&str]) -> Vec<String> {
  lines
    .iter()
    .map(|line| ORDINAL_PREFIX.replace(line, "").trim().to_string())
    .filter(|line| !line.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(text: &str) -> Result<ParsedImport, ParseError> {
    parse_import(text, &ParseOptions::default())
  }

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  const SAMPLE: &str = "2025.6.8(日)\nHYPE IDOL！× AGE FES!\n@ 品川グランドホール\n\n#しえるセットリスト\nYakusoku\nWe Can\n";

  #[test]
  fn parses_the_pasted_sample() {
    let parsed = parse(SAMPLE).unwrap();

    assert_eq!(parsed.event_name, "HYPE IDOL！× AGE FES!");
    assert_eq!(parsed.location, "品川グランドホール");
    assert_eq!(parsed.date, ymd(2025, 6, 8));
    assert_eq!(parsed.setlist_lines, vec!["Yakusoku", "We Can"]);
  }

  #[test]
  fn missing_date_line_is_an_error() {
    let err = parse("HYPE IDOL\n@ somewhere\n#\nYakusoku").unwrap_err();
    assert_eq!(err, ParseError::MissingDate);
  }

  #[test]
  fn date_must_be_at_line_start() {
    let err = parse("live on 2025.6.8\n#\nYakusoku").unwrap_err();
    assert_eq!(err, ParseError::MissingDate);
  }

  #[test]
  fn impossible_calendar_date_is_an_error() {
    let err = parse("2025.2.30\nname\n#\nA").unwrap_err();
    assert_eq!(err, ParseError::InvalidDate { line: "2025.2.30".to_string() });
  }

  #[test]
  fn missing_location_uses_sentinel() {
    let parsed = parse("2025.1.5\nNew Year Live\n#\nA\nB").unwrap();

    assert_eq!(parsed.location, DEFAULT_UNKNOWN_LOCATION);
    assert_eq!(parsed.event_name, "New Year Live");
    assert_eq!(parsed.setlist_lines, vec!["A", "B"]);
  }

  #[test]
  fn bare_at_sign_falls_back_to_sentinel() {
    let parsed = parse("2025.1.5\nLive\n@\n#\nA").unwrap();
    assert_eq!(parsed.location, DEFAULT_UNKNOWN_LOCATION);
  }

  #[test]
  fn name_joins_every_line_between_date_and_location() {
    let parsed = parse("2025.3.1 (土)\nSpring\nSpecial  Stage\n@Zepp\n#\nA").unwrap();

    assert_eq!(parsed.event_name, "Spring Special  Stage");
    assert_eq!(parsed.location, "Zepp");
  }

  #[test]
  fn name_falls_back_to_line_after_date_when_location_precedes_it() {
    let parsed = parse("@ Hall\n2025.3.1\nSolo Live\nextra\n#\nA").unwrap();

    assert_eq!(parsed.event_name, "Solo Live");
    assert_eq!(parsed.location, "Hall");
  }

  #[test]
  fn name_uses_sentinel_when_nothing_follows_the_date() {
    let parsed = parse("@ Hall\n2025.3.1").unwrap();

    assert_eq!(parsed.event_name, DEFAULT_UNTITLED_EVENT);
    assert!(parsed.setlist_lines.is_empty());
  }

  #[test]
  fn marker_line_is_never_taken_as_the_name() {
    let parsed = parse("2025.3.1\n#list\nA").unwrap();

    assert_eq!(parsed.event_name, DEFAULT_UNTITLED_EVENT);
    assert_eq!(parsed.setlist_lines, vec!["A"]);
  }

  #[test]
  fn custom_sentinels_are_honoured() {
    let options = ParseOptions { unknown_location: "TBA".into(), untitled_event: "Untitled".into() };
    let parsed = parse_import("2025.3.1", &options).unwrap();

    assert_eq!(parsed.location, "TBA");
    assert_eq!(parsed.event_name, "Untitled");
  }

  #[test]
  fn ordinal_prefixes_are_stripped_and_empty_lines_dropped() {
    let parsed = parse("2025.3.1\nLive\n@ Hall\n#\n1. Answer\n2.True Love\n3 MC\n4.\n\n10.  Yakusoku").unwrap();
    assert_eq!(parsed.setlist_lines, vec!["Answer", "True Love", "MC", "Yakusoku"]);
  }

  #[test]
  fn without_marker_there_is_no_setlist() {
    let parsed = parse("2025.3.1\nLive\n@ Hall\nA\nB").unwrap();
    assert!(parsed.setlist_lines.is_empty());
  }

  #[test]
  fn setlist_lines_only_parser_handles_numbered_text() {
    let lines = parse_setlist_lines("1. Answer\n\n 2. True Love \nMC\n");
    assert_eq!(lines, vec!["Answer", "True Love", "MC"]);
  }

  #[test]
  fn reparsing_the_canonical_text_is_idempotent() {
    let inputs = [
      SAMPLE,
      "2025.1.5\nNew Year Live\n#\nA\nB",
      "@ Hall\n2025.3.1\nSolo Live\n#\n1. 100\n2 4 6\n.hack",
      "2025.12.31\n#\n@ inside setlist\nMC",
      "0999.1.1\nOld\n@ Somewhere\n#",
    ];

    for input in inputs {
      let first = parse(input).unwrap();
      let second = parse(&first.to_text()).unwrap();
      assert_eq!(first, second, "round trip of {input:?}");
    }
  }
}
