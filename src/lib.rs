//! `pxd` is a reader/writer for PXD, a plain-text, human-readable, typed
//! data interchange format: an alternative to CSV/INI/JSON/TOML/XML/YAML
//! when callers want richer scalar types (bytes, dates, datetimes) and a
//! compact table encoding for homogeneous row sets.
//!
//! The crate is organized leaf-first: [`value`] and [`table`] define the
//! in-memory model; [`lexer`] tokenizes text; [`parser`] assembles tokens
//! into a [`Value`] tree; [`emitter`] walks a tree back into text. [`read`]
//! and [`write`] compose the pipeline for the common case.
//!
//! Reading and parsing never partially recover: a document is either
//! wholly accepted or wholly rejected ([`PxdError`]).

mod datetime;
pub mod emitter;
pub mod error;
mod hex;
pub mod lexer;
pub mod parser;
pub mod table;
pub mod token;
pub mod value;
mod xml_escape;

pub use error::PxdError;
pub use table::{canonicalize_field_name, canonicalize_table_name, Row, Table};
pub use value::{Date, DateTime, Dict, DictKey, Value};

use lexer::Lexer;
use parser::{Parser, DEFAULT_DEPTH_CAP};

/// Reads a complete PXD document from `text`, returning its root value and
/// the header's custom string (`""` if none was present).
///
/// Shorthand for [`read_with`] with warn-as-error off and the default
/// nesting cap ([`parser::DEFAULT_DEPTH_CAP`]).
pub fn read(text: &str) -> Result<(Value, String), PxdError> {
  read_with(text, false, DEFAULT_DEPTH_CAP)
}

/// Reads a complete PXD document from `text`.
///
/// `warn_as_error` escalates a header version greater than this crate's
/// supported version ([`lexer::SUPPORTED_VERSION`]) from a logged warning
/// to a fatal [`PxdError::VersionUnsupported`]. `depth_cap` bounds how
/// deeply lists and dicts may nest before a [`PxdError::DepthExceeded`].
pub fn read_with(
  text: &str,
  warn_as_error: bool,
  depth_cap: usize,
) -> Result<(Value, String), PxdError> {
  let lexer = Lexer::new(text, warn_as_error)?;
  let custom = lexer.custom().to_string();
  let tokens = lexer.scan()?;
  let value = Parser::new(text, tokens, depth_cap).parse()?;
  Ok((value, custom))
}

/// Serializes `value` as a complete PXD document (header, body, trailing
/// newline) and writes it to `sink`. `value` must be a List, Dict, or
/// Table. `indent` is the per-level space count, `0..=9`; out-of-range
/// values fall back to 2.
pub fn write<W: std::io::Write>(
  mut sink: W,
  value: &Value,
  custom: &str,
  indent: usize,
) -> Result<(), PxdError> {
  let text = emitter::emit(value, custom, indent)?;
  sink.write_all(text.as_bytes())?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn read_then_write_round_trips_a_dict() {
    let input = "pxd 1.0 demo\n{ <name> <Ada> <born> 1815-12-10 <tags> [ <math> <cs> ] }\n";
    let (value, custom) = read(input).unwrap();
    assert_eq!(custom, "demo");
    let mut out = Vec::new();
    write(&mut out, &value, &custom, 2).unwrap();
    let (value2, custom2) = read(std::str::from_utf8(&out).unwrap()).unwrap();
    assert_eq!(value, value2);
    assert_eq!(custom, custom2);
  }

  #[test]
  fn version_above_supported_is_fatal_under_warn_as_error() {
    let err = read_with("pxd 2.0\n[]\n", true, DEFAULT_DEPTH_CAP).unwrap_err();
    assert!(matches!(err, PxdError::VersionUnsupported(_, _, _)));
  }

  #[test]
  fn depth_cap_is_configurable() {
    let text = format!("pxd 1.0\n{}{}{}\n", "[".repeat(5), "1", "]".repeat(5));
    assert!(read_with(&text, false, 3).is_err());
    assert!(read_with(&text, false, 10).is_ok());
  }
}
