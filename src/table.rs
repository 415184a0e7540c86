//! The named, field-named, row-oriented container (`spec.md` §3 "Table",
//! §4.4 "Table operations").

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::PxdError;
use crate::value::Value;

/// Strips everything but ASCII word characters (`spec.md` §4.3).
fn strip_non_word(name: &str) -> String {
  name.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect()
}

/// Canonicalizes a table's on-disk name into a host-language accessor name
/// (`spec.md` §4.3). The on-disk name itself is never altered; this only
/// feeds name generation for generated accessors.
pub fn canonicalize_table_name(name: &str) -> String {
  let stripped = strip_non_word(name);
  if stripped.is_empty() {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    return format!("Table{:x}", hasher.finish());
  }
  if !stripped.chars().next().unwrap().is_ascii_alphabetic() {
    return format!("Table{stripped}");
  }
  stripped
}

/// Canonicalizes a table field's on-disk name into a host-language accessor
/// name (`spec.md` §4.3). `index` is the field's zero-based position, used
/// to synthesize a name when nothing of the original survives stripping.
pub fn canonicalize_field_name(name: &str, index: usize) -> String {
  let stripped = strip_non_word(name);
  if stripped.is_empty() {
    return format!("Field{index}");
  }
  if !stripped.chars().next().unwrap().is_ascii_alphabetic() {
    return format!("Field{stripped}");
  }
  stripped
}

/// A single record, addressable by field name as well as by position.
///
/// Per `spec.md` §9 ("Table record accessors"), this targets a statically
/// typed host by pairing a field-name slice with a value slice rather than
/// generating one record type per table.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
  field_names: &'a [String],
  values: &'a [Value],
}

impl<'a> Row<'a> {
  /// The cell for `field`, or `None` if no such field exists.
  pub fn get(&self, field: &str) -> Option<&'a Value> {
    self
      .field_names
      .iter()
      .position(|name| name == field)
      .map(|i| &self.values[i])
  }

  /// The cell at `index`, or `None` if out of range.
  pub fn get_index(&self, index: usize) -> Option<&'a Value> {
    self.values.get(index)
  }

  /// All cells, in field-name order.
  pub fn values(&self) -> &'a [Value] {
    self.values
  }
}

/// A named, field-named, row-oriented container of homogeneous-arity scalar
/// rows. Invariants (`spec.md` §3):
/// - every completed record has length equal to the field name count;
/// - a table cannot be finalized with zero field names or an empty name;
/// - an append that fills a record starts a new one on the next call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
  name: String,
  field_names: Vec<String>,
  records: Vec<Vec<Value>>,
  pending: Vec<Value>,
}

impl Table {
  /// An unnamed, field-less, empty table. Not yet finalizable: see
  /// [`Table::validate`].
  pub fn new() -> Self {
    Self::default()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn set_name(&mut self, name: impl Into<String>) {
    self.name = name.into();
  }

  pub fn field_names(&self) -> &[String] {
    &self.field_names
  }

  /// Appends a field name. Forbidden once the first row has been completed
  /// (`spec.md` §4.4).
  pub fn append_field_name(&mut self, name: impl Into<String>) -> Result<(), PxdError> {
    if !self.records.is_empty() {
      return Err(PxdError::TableInvariant(
        "cannot append a field name after a row has been appended".into(),
      ));
    }
    self.field_names.push(name.into());
    Ok(())
  }

  /// Appends `value` to the record currently being built; starts a new
  /// record if the previous one was just completed. Rejects non-scalar
  /// values and appends before any field name exists.
  pub fn append(&mut self, value: Value) -> Result<(), PxdError> {
    if self.field_names.is_empty() {
      return Err(PxdError::TableInvariant(
        "cannot append to a table with no field names".into(),
      ));
    }
    if !value.is_scalar() {
      return Err(PxdError::TableInvariant(
        "table cells must be scalar values; lists, dicts and tables are not allowed".into(),
      ));
    }
    self.pending.push(value);
    if self.pending.len() == self.field_names.len() {
      self.records.push(std::mem::take(&mut self.pending));
    }
    Ok(())
  }

  /// Number of completed records.
  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// The completed records, as raw cell slices in field-name order.
  pub fn records(&self) -> &[Vec<Value>] {
    &self.records
  }

  /// Checks the table can be finalized: a non-empty name, at least one
  /// field name, and no partially filled trailing record.
  pub fn validate(&self) -> Result<(), PxdError> {
    if self.name.is_empty() {
      return Err(PxdError::TableInvariant(
        "a table cannot be finalized with an empty name".into(),
      ));
    }
    if self.field_names.is_empty() {
      return Err(PxdError::TableInvariant(
        "a table cannot be finalized with zero field names".into(),
      ));
    }
    if !self.pending.is_empty() {
      return Err(PxdError::TableInvariant(
        "a table cannot be finalized with a partially filled record".into(),
      ));
    }
    Ok(())
  }

  /// Yields records as field-named tuples. Requires a name and at least one
  /// field name (`spec.md` §4.4).
  pub fn iterate(&self) -> Result<impl Iterator<Item = Row<'_>>, PxdError> {
    self.validate()?;
    Ok(self.records.iter().map(move |values| Row {
      field_names: &self.field_names,
      values,
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn people_table() -> Table {
    let mut t = Table::new();
    t.set_name("People");
    t.append_field_name("name").unwrap();
    t.append_field_name("age").unwrap();
    t.append(Value::Str("Ada".into())).unwrap();
    t.append(Value::Int(36)).unwrap();
    t.append(Value::Str("Grace".into())).unwrap();
    t.append(Value::Int(85)).unwrap();
    t
  }

  #[test]
  fn append_fills_then_starts_new_record() {
    let t = people_table();
    assert_eq!(t.len(), 2);
    assert_eq!(t.records()[0][0], Value::Str("Ada".into()));
    assert_eq!(t.records()[1][1], Value::Int(85));
  }

  #[test]
  fn iterate_addresses_cells_by_field_name() {
    let t = people_table();
    let rows: Vec<_> = t.iterate().unwrap().collect();
    assert_eq!(rows[0].get("name"), Some(&Value::Str("Ada".into())));
    assert_eq!(rows[1].get("age"), Some(&Value::Int(85)));
    assert_eq!(rows[0].get("nope"), None);
  }

  #[test]
  fn finalize_rejects_empty_name() {
    let mut t = Table::new();
    t.append_field_name("a").unwrap();
    assert!(matches!(t.validate(), Err(PxdError::TableInvariant(_))));
  }

  #[test]
  fn finalize_rejects_zero_field_names() {
    let mut t = Table::new();
    t.set_name("T");
    assert!(matches!(t.validate(), Err(PxdError::TableInvariant(_))));
  }

  #[test]
  fn finalize_rejects_partial_trailing_record() {
    let mut t = Table::new();
    t.set_name("T");
    t.append_field_name("a").unwrap();
    t.append_field_name("b").unwrap();
    t.append(Value::Int(1)).unwrap();
    assert!(matches!(t.validate(), Err(PxdError::TableInvariant(_))));
  }

  #[test]
  fn append_rejects_non_scalar_cells() {
    let mut t = Table::new();
    t.set_name("T");
    t.append_field_name("a").unwrap();
    let err = t.append(Value::List(vec![])).unwrap_err();
    assert!(matches!(err, PxdError::TableInvariant(_)));
  }

  #[test]
  fn append_field_name_forbidden_after_first_row() {
    let mut t = people_table();
    let err = t.append_field_name("extra").unwrap_err();
    assert!(matches!(err, PxdError::TableInvariant(_)));
  }

  #[test]
  fn canonicalize_passes_through_an_already_valid_name() {
    assert_eq!(canonicalize_table_name("People"), "People");
    assert_eq!(canonicalize_field_name("name", 0), "name");
  }

  #[test]
  fn canonicalize_strips_non_word_characters() {
    assert_eq!(canonicalize_table_name("My Table!"), "MyTable");
    assert_eq!(canonicalize_field_name("first-name", 0), "firstname");
  }

  #[test]
  fn canonicalize_synthesizes_a_name_when_nothing_survives_stripping() {
    assert_eq!(canonicalize_table_name("!!!"), canonicalize_table_name("!!!"));
    assert!(canonicalize_table_name("!!!").starts_with("Table"));
    assert_eq!(canonicalize_field_name("***", 3), "Field3");
    assert_eq!(canonicalize_field_name("<>", 0), "Field0");
  }

  #[test]
  fn canonicalize_prefixes_a_leading_non_letter() {
    assert_eq!(canonicalize_table_name("123abc"), "Table123abc");
    assert_eq!(canonicalize_field_name("_private", 1), "Field_private");
  }
}
