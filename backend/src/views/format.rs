use chrono::{Datelike, NaiveDate};

const WEEKDAYS_JA: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

pub fn weekday_ja(date: NaiveDate) -> &'static str {
  WEEKDAYS_JA[date.weekday().num_days_from_monday() as usize]
}

/// `2025年6月8日(日)`
pub fn long_date(date: NaiveDate) -> String {
  format!("{}({})", short_date(date), weekday_ja(date))
}

/// `2025年6月8日`
pub fn short_date(date: NaiveDate) -> String {
  format!("{}年{}月{}日", date.year(), date.month(), date.day())
}

/// `2025年6月`
pub fn month_title(date: NaiveDate) -> String {
  format!("{}年{}月", date.year(), date.month())
}

/// Corta por caracteres, no por bytes, y añade `...` si sobró texto.
pub fn truncate_chars(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }
  let mut out: String = text.chars().take(max).collect();
  out.push_str("...");
  out
}

pub fn or_dash(value: Option<&str>) -> &str {
  match value {
    Some(v) if !v.is_empty() => v,
    _ => "-",
  }
}
