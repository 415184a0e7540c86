//! The emitter: walks a [`Value`] tree and writes the canonical PXD text
//! representation (`spec.md` §4.3). The Emitter and Parser are inverses up
//! to insignificant whitespace and the canonicalizations listed here.
//!
//! Table and field name rewriting for host-language accessors lives in
//! [`crate::table::canonicalize_table_name`]/[`crate::table::canonicalize_field_name`] —
//! it governs accessor names only, never the on-disk name this module writes
//! verbatim inside `<…>`.

use crate::error::PxdError;
use crate::hex;
use crate::table::Table;
use crate::value::{Dict, DictKey, Value};
use crate::xml_escape;

/// Indent values outside `0..=9` fall back to this (`spec.md` §4.3).
const FALLBACK_PAD: usize = 2;

/// Writes `value` as a complete PXD document: header line, canonical body,
/// trailing newline. `value` must be a List, Dict, or Table — the same
/// restriction the parser's `Collection` state places on a document root.
pub fn emit(value: &Value, custom: &str, indent: usize) -> Result<String, PxdError> {
  if !matches!(value, Value::List(_) | Value::Dict(_) | Value::Table(_)) {
    return Err(PxdError::EmitInvalid(
      "a document root must be a list, dict, or table".into(),
    ));
  }
  let pad = if indent <= 9 { indent } else { FALLBACK_PAD };
  let mut out = String::new();
  out.push_str("pxd 1.0");
  if !custom.is_empty() {
    out.push(' ');
    out.push_str(custom);
  }
  out.push('\n');
  emit_value(value, 0, pad, &mut out)?;
  out.push('\n');
  Ok(out)
}

fn emit_value(value: &Value, depth: usize, pad: usize, out: &mut String) -> Result<(), PxdError> {
  match value {
    Value::Null => {
      out.push_str("null");
      Ok(())
    }
    Value::Bool(b) => {
      out.push_str(if *b { "yes" } else { "no" });
      Ok(())
    }
    Value::Int(i) => {
      out.push_str(&i.to_string());
      Ok(())
    }
    Value::Real(r) => emit_real(*r, out),
    Value::Date(d) => {
      out.push_str(&d.format("%Y-%m-%d").to_string());
      Ok(())
    }
    Value::DateTime(dt) => {
      out.push_str(&dt.to_string());
      Ok(())
    }
    Value::Str(s) => {
      emit_text(s, out);
      Ok(())
    }
    Value::Bytes(b) => {
      emit_bytes(b, out);
      Ok(())
    }
    Value::List(items) => emit_list(items, depth, pad, out),
    Value::Dict(map) => emit_dict(map, depth, pad, out),
    Value::Table(table) => emit_table(table, depth, pad, out),
  }
}

fn emit_real(r: f64, out: &mut String) -> Result<(), PxdError> {
  if !r.is_finite() {
    return Err(PxdError::EmitInvalid(
      "cannot represent a non-finite real number".into(),
    ));
  }
  let text = r.to_string();
  out.push_str(&text);
  if !text.contains('.') && !text.contains('e') && !text.contains('E') {
    out.push_str(".0");
  }
  Ok(())
}

fn emit_text(s: &str, out: &mut String) {
  out.push('<');
  out.push_str(&xml_escape::escape(s));
  out.push('>');
}

fn emit_bytes(b: &[u8], out: &mut String) {
  out.push('(');
  out.push_str(&hex::encode(b));
  out.push(')');
}

fn emit_key(key: &DictKey, out: &mut String) {
  match key {
    DictKey::Int(i) => out.push_str(&i.to_string()),
    DictKey::Date(d) => out.push_str(&d.format("%Y-%m-%d").to_string()),
    DictKey::DateTime(dt) => out.push_str(&dt.to_string()),
    DictKey::Str(s) => emit_text(s, out),
    DictKey::Bytes(b) => emit_bytes(b, out),
  }
}

fn indent_str(pad: usize, depth: usize) -> String {
  " ".repeat(pad * depth)
}

fn emit_list(items: &[Value], depth: usize, pad: usize, out: &mut String) -> Result<(), PxdError> {
  out.push('[');
  if items.is_empty() {
    out.push(']');
    return Ok(());
  }
  out.push('\n');
  let inner = indent_str(pad, depth + 1);
  for item in items {
    out.push_str(&inner);
    emit_value(item, depth + 1, pad, out)?;
    out.push('\n');
  }
  out.push_str(&indent_str(pad, depth));
  out.push(']');
  Ok(())
}

fn emit_dict(map: &Dict, depth: usize, pad: usize, out: &mut String) -> Result<(), PxdError> {
  out.push('{');
  if map.is_empty() {
    out.push('}');
    return Ok(());
  }
  out.push('\n');
  let inner = indent_str(pad, depth + 1);
  for (key, value) in map {
    out.push_str(&inner);
    emit_key(key, out);
    out.push(' ');
    emit_value(value, depth + 1, pad, out)?;
    out.push('\n');
  }
  out.push_str(&indent_str(pad, depth));
  out.push('}');
  Ok(())
}

fn emit_table(table: &Table, depth: usize, pad: usize, out: &mut String) -> Result<(), PxdError> {
  table.validate()?;
  out.push_str("[= ");
  emit_text(table.name(), out);
  for field in table.field_names() {
    out.push(' ');
    emit_text(field, out);
  }
  out.push_str(" =\n");
  let inner = indent_str(pad, depth + 1);
  let arity = table.field_names().len();
  for record in table.records() {
    if record.len() != arity {
      return Err(PxdError::TableInvariant(format!(
        "row has {} cell(s), expected {}",
        record.len(),
        arity
      )));
    }
    out.push_str(&inner);
    for (i, cell) in record.iter().enumerate() {
      if i > 0 {
        out.push(' ');
      }
      emit_value(cell, depth + 1, pad, out)?;
    }
    out.push('\n');
  }
  out.push_str(&indent_str(pad, depth));
  out.push_str("=]");
  Ok(())
}
