//! End-to-end tests exercising the public `read`/`write` surface on whole
//! documents, mirroring the concrete scenarios in `spec.md` §8.

use pxd::value::{Dict, DictKey, Value};
use pxd::{PxdError, Table};

#[test]
fn minimal_list() {
  let (value, custom) = pxd::read("pxd 1.0\n[ 1 2 3 ]\n").unwrap();
  assert_eq!(
    value,
    Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
  );
  assert_eq!(custom, "");
}

#[test]
fn dict_with_mixed_scalars() {
  let input = "pxd 1.0 demo\n{ <name> <Ada> <born> 1815-12-10 <tags> [ <math> <cs> ] }\n";
  let (value, custom) = pxd::read(input).unwrap();
  assert_eq!(custom, "demo");
  let Value::Dict(map) = value else { panic!("expected dict") };
  assert_eq!(map.get(&DictKey::Str("name".into())), Some(&Value::Str("Ada".into())));
  assert!(matches!(map.get(&DictKey::Str("born".into())), Some(Value::Date(_))));
  assert_eq!(
    map.get(&DictKey::Str("tags".into())),
    Some(&Value::List(vec![Value::Str("math".into()), Value::Str("cs".into())]))
  );
}

#[test]
fn table_scenario() {
  let input = "pxd 1.0\n[= <People> <name> <age> =\n  <Ada> 36\n  <Grace> 85\n=]\n";
  let (value, _) = pxd::read(input).unwrap();
  let Value::Table(table) = value else { panic!("expected table") };
  assert_eq!(table.name(), "People");
  assert_eq!(table.field_names(), &["name".to_string(), "age".to_string()]);
  let rows: Vec<_> = table.iterate().unwrap().collect();
  assert_eq!(rows[0].get("name"), Some(&Value::Str("Ada".into())));
  assert_eq!(rows[1].get("age"), Some(&Value::Int(85)));
}

#[test]
fn bytes_and_null() {
  let (value, _) = pxd::read("pxd 1.0\n{ <k> (DEAD BEEF) <z> null }\n").unwrap();
  let Value::Dict(map) = value else { panic!("expected dict") };
  assert_eq!(
    map.get(&DictKey::Str("k".into())),
    Some(&Value::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]))
  );
  assert_eq!(map.get(&DictKey::Str("z".into())), Some(&Value::Null));
}

#[test]
fn rejects_illegal_dict_key_type() {
  let err = pxd::read("pxd 1.0\n{ 1.5 <x> }\n").unwrap_err();
  assert!(matches!(err, PxdError::Parse(_, _)));
}

#[test]
fn rejects_nested_collection_inside_table() {
  let err = pxd::read("pxd 1.0\n[= <T> <a> = [ 1 ] =]\n").unwrap_err();
  assert!(matches!(err, PxdError::Parse(_, _)));
}

#[test]
fn empty_list_empty_dict_and_zero_row_table_round_trip() {
  for input in ["pxd 1.0\n[]\n", "pxd 1.0\n{}\n", "pxd 1.0\n[= <T> <a> =\n=]\n"] {
    let (value, custom) = pxd::read(input).unwrap();
    let mut out = Vec::new();
    pxd::write(&mut out, &value, &custom, 2).unwrap();
    let (value2, _) = pxd::read(std::str::from_utf8(&out).unwrap()).unwrap();
    assert_eq!(value, value2);
  }
}

#[test]
fn extreme_integers_round_trip() {
  let input = format!("pxd 1.0\n[ {} {} ]\n", i64::MAX, i64::MIN + 1);
  let (value, _) = pxd::read(&input).unwrap();
  assert_eq!(
    value,
    Value::List(vec![Value::Int(i64::MAX), Value::Int(i64::MIN + 1)])
  );
}

#[test]
fn datetime_with_trailing_z_round_trips_to_the_same_utc_instant() {
  let input = "pxd 1.0\n[ 2024-01-02T03:04:05Z ]\n";
  let (value, custom) = pxd::read(input).unwrap();
  let Value::List(items) = &value else { panic!("expected list") };
  let Value::DateTime(dt) = &items[0] else { panic!("expected datetime") };
  assert!(dt.is_utc());

  let mut out = Vec::new();
  pxd::write(&mut out, &value, &custom, 2).unwrap();
  let (value2, _) = pxd::read(std::str::from_utf8(&out).unwrap()).unwrap();
  assert_eq!(value, value2);
}

#[test]
fn strings_with_entities_newlines_and_astral_code_points_round_trip() {
  let original = Value::List(vec![Value::Str("a <b> & \"c\" \n d \u{1F600}".into())]);
  let mut out = Vec::new();
  pxd::write(&mut out, &original, "", 2).unwrap();
  let (parsed, _) = pxd::read(std::str::from_utf8(&out).unwrap()).unwrap();
  assert_eq!(parsed, original);
}

#[test]
fn parse_of_emit_round_trips_every_scalar_variant() {
  let mut dict = Dict::new();
  dict.insert(DictKey::Int(1), Value::Null);
  dict.insert(DictKey::Str("flag".into()), Value::Bool(true));
  dict.insert(DictKey::Str("pi".into()), Value::Real(3.5));
  dict.insert(DictKey::Bytes(vec![1, 2, 3]), Value::Bytes(vec![9, 8, 7]));

  let mut table = Table::new();
  table.set_name("Rows");
  table.append_field_name("a").unwrap();
  table.append(Value::Int(1)).unwrap();

  let original = Value::List(vec![Value::Dict(dict.clone()), Value::Table(table)]);
  let mut out = Vec::new();
  pxd::write(&mut out, &original, "", 2).unwrap();
  let (parsed, _) = pxd::read(std::str::from_utf8(&out).unwrap()).unwrap();
  assert_eq!(parsed, original);
}

#[test]
fn emit_of_parse_is_idempotent_under_its_own_canonicalization() {
  let input = "pxd 1.0\n[ 1 2 3 ]\n";
  let (value, custom) = pxd::read(input).unwrap();
  let mut first = Vec::new();
  pxd::write(&mut first, &value, &custom, 2).unwrap();
  let (value2, custom2) = pxd::read(std::str::from_utf8(&first).unwrap()).unwrap();
  let mut second = Vec::new();
  pxd::write(&mut second, &value2, &custom2, 2).unwrap();
  assert_eq!(first, second);
}

#[test]
fn unterminated_container_at_eof_is_an_error() {
  let err = pxd::read("pxd 1.0\n[ 1 2\n").unwrap_err();
  assert!(matches!(err, PxdError::Parse(_, _)));
}

#[test]
fn missing_header_is_an_error() {
  let err = pxd::read("[ 1 ]").unwrap_err();
  assert!(matches!(err, PxdError::HeaderMissing));
}
