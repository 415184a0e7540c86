//! Date and datetime parsing, split out of the lexer's number/date
//! disambiguation step (`spec.md` §4.1, §9 "Date vs. datetime heuristic").
//!
//! Classification (which of Int/Real/Date/DateTime a numeric run is) happens
//! once, in [`crate::lexer`], by inspecting the run's characters; these
//! functions only turn an already-classified run into a typed value, so
//! there is no try-parse-fallback chain that could mask a malformed input.

use chrono::{DateTime as ChronoUtcDateTime, NaiveDate, NaiveDateTime, Utc};

use crate::value::{Date, DateTime};

/// Parses a run already classified as a `Date` (`YYYY-MM-DD`, no time part).
pub fn parse_date(run: &str) -> Result<Date, String> {
  if run.starts_with('-') {
    return Err("date values cannot be negative".into());
  }
  NaiveDate::parse_from_str(run, "%Y-%m-%d")
    .map_err(|e| format!("invalid date literal {:?}: {}", run, e))
}

/// Parses a run already classified as a `DateTime`. A trailing `Z` denotes a
/// UTC instant (`spec.md` §9, open question 3) and is stripped before the
/// naive wall-clock reading is parsed.
pub fn parse_datetime(run: &str) -> Result<DateTime, String> {
  if run.starts_with('-') {
    return Err("datetime values cannot be negative".into());
  }
  let (is_utc, body) = match run.strip_suffix('Z') {
    Some(stripped) => (true, stripped),
    None => (false, run),
  };
  let naive = parse_naive_datetime(body)
    .ok_or_else(|| format!("invalid datetime literal {:?}", run))?;
  if is_utc {
    Ok(DateTime::Utc(ChronoUtcDateTime::from_naive_utc_and_offset(
      naive,
      Utc,
    )))
  } else {
    Ok(DateTime::Naive(naive))
  }
}

fn parse_naive_datetime(body: &str) -> Option<NaiveDateTime> {
  const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
  FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(body, fmt).ok())
}
