//! The in-memory value model: the tagged sum over every PXD scalar and
//! container variant (`spec.md` §3).

use std::fmt;

use chrono::{DateTime as ChronoUtcDateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;

use crate::table::Table;

/// A calendar date with no time component (`YYYY-MM-DD`).
pub type Date = NaiveDate;

/// A date and time, distinguishing a naive local reading from a `Z`-suffixed
/// UTC instant (open question 3 in `spec.md` §9: `Z` is treated as UTC).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DateTime {
  /// No trailing `Z` in the wire form: no offset is implied.
  Naive(NaiveDateTime),
  /// Trailing `Z` in the wire form: a UTC instant.
  Utc(ChronoUtcDateTime<Utc>),
}

impl DateTime {
  /// The naive wall-clock reading, discarding any UTC-ness.
  pub fn naive(&self) -> NaiveDateTime {
    match self {
      DateTime::Naive(dt) => *dt,
      DateTime::Utc(dt) => dt.naive_utc(),
    }
  }

  /// True if this datetime carries a trailing `Z` (is a UTC instant).
  pub fn is_utc(&self) -> bool {
    matches!(self, DateTime::Utc(_))
  }
}

impl fmt::Display for DateTime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DateTime::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
      DateTime::Utc(dt) => write!(f, "{}Z", dt.format("%Y-%m-%dT%H:%M:%S")),
    }
  }
}

/// The restricted set of types a [`Dict`] key may hold (`spec.md` §3,
/// "Dict key restriction"). Any other `Value` variant used as a key is a
/// parse error, never a representable `DictKey`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DictKey {
  Int(i64),
  Date(Date),
  DateTime(DateTime),
  Str(String),
  Bytes(Vec<u8>),
}

impl fmt::Display for DictKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DictKey::Int(v) => write!(f, "{}", v),
      DictKey::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
      DictKey::DateTime(v) => write!(f, "{}", v),
      DictKey::Str(v) => write!(f, "{:?}", v),
      DictKey::Bytes(v) => write!(f, "{} byte(s)", v.len()),
    }
  }
}

/// An insertion-ordered mapping from restricted keys to values
/// (`spec.md` §3, "Dict").
pub type Dict = IndexMap<DictKey, Value>;

/// The tagged sum over every PXD value variant.
///
/// Implemented as a plain enum rather than any form of open-ended
/// inheritance, per `spec.md` §9 ("Value polymorphism").
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
  /// Distinct from a missing key or element.
  Null,
  /// Accepted spellings on read: `yes`, `true`, `no`, `false`.
  Bool(bool),
  /// A signed, base-10 integer, at least 64-bit.
  Int(i64),
  /// An IEEE-754 double. Always emitted with a fractional part or exponent.
  Real(f64),
  Date(Date),
  DateTime(DateTime),
  /// A sequence of Unicode scalars; the wire form XML-escapes `< > &`, etc.
  Str(String),
  /// An opaque byte vector; the wire form is uppercase hexadecimal.
  Bytes(Vec<u8>),
  /// An ordered, possibly heterogeneous sequence of values.
  List(Vec<Value>),
  Dict(Dict),
  Table(Table),
}

impl Value {
  /// True for every variant except `List`, `Dict`, and `Table`
  /// (`spec.md` glossary, "Scalar"). Table cells must satisfy this.
  pub fn is_scalar(&self) -> bool {
    !matches!(self, Value::List(_) | Value::Dict(_) | Value::Table(_))
  }

  /// Converts a scalar value into a [`DictKey`], if its variant is one of
  /// the five allowed key types (`spec.md` §3, "Dict key restriction").
  pub fn as_dict_key(&self) -> Option<DictKey> {
    match self {
      Value::Int(v) => Some(DictKey::Int(*v)),
      Value::Date(v) => Some(DictKey::Date(*v)),
      Value::DateTime(v) => Some(DictKey::DateTime(v.clone())),
      Value::Str(v) => Some(DictKey::Str(v.clone())),
      Value::Bytes(v) => Some(DictKey::Bytes(v.clone())),
      _ => None,
    }
  }
}

impl From<DictKey> for Value {
  fn from(key: DictKey) -> Self {
    match key {
      DictKey::Int(v) => Value::Int(v),
      DictKey::Date(v) => Value::Date(v),
      DictKey::DateTime(v) => Value::DateTime(v),
      DictKey::Str(v) => Value::Str(v),
      DictKey::Bytes(v) => Value::Bytes(v),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scalars_are_scalar() {
    assert!(Value::Null.is_scalar());
    assert!(Value::Bool(true).is_scalar());
    assert!(Value::Int(1).is_scalar());
    assert!(Value::Real(1.0).is_scalar());
    assert!(Value::Str("x".into()).is_scalar());
    assert!(Value::Bytes(vec![1, 2]).is_scalar());
  }

  #[test]
  fn containers_are_not_scalar() {
    assert!(!Value::List(vec![]).is_scalar());
    assert!(!Value::Dict(Dict::new()).is_scalar());
    assert!(!Value::Table(Table::new()).is_scalar());
  }

  #[test]
  fn dict_key_round_trips_through_value() {
    let key = DictKey::Str("name".into());
    let value: Value = key.clone().into();
    assert_eq!(value.as_dict_key(), Some(key));
  }
}
