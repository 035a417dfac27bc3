//! Field enforcement (spec §4.4.3): after the caller's merge directives have
//! run, every defined field is walked through a fixed nine-step pipeline.
use crate::catalog::{Field, FieldMap};
use crate::err::Error;
use crate::expr::Bindings;
use crate::path::{self, parse};
use crate::types::{coerce, Value};

/// Run the pipeline for every field defined on the table, in name order
/// (`FieldMap` is a `BTreeMap`, so this is the definition's natural sort,
/// not necessarily the order fields were declared in).
pub fn enforce(fields: &FieldMap, initial: &Value, current: &mut Value, thing: &str) -> Result<(), Error> {
	for field in fields.values() {
		enforce_one(field, initial, current, thing)?;
	}
	Ok(())
}

/// A `schemafull` table only ever stores what it defines (spec §4.2):
/// any top-level key with no matching field definition is rejected rather
/// than silently stored.
pub fn enforce_schemafull(fields: &FieldMap, current: &Value, table: &str) -> Result<(), Error> {
	let Value::Object(obj) = current else {
		return Ok(());
	};
	for key in obj.keys() {
		if key == "id" {
			continue;
		}
		if !fields.contains_key(key) {
			return Err(Error::UndefinedField {
				table: table.to_owned(),
				field: key.clone(),
			});
		}
	}
	Ok(())
}

fn enforce_one(field: &Field, initial: &Value, current: &mut Value, thing: &str) -> Result<(), Error> {
	let path = parse(&field.name)?;

	// Step 1: readonly fields snap back to whatever was already stored.
	if field.readonly {
		let initial_val = path::get(initial, &path);
		if !initial_val.is_none() {
			path::set(current, &path, initial_val);
		}
	}

	// Step 2: embedded scripts have no evaluator here; a field that declares
	// one always fails closed rather than silently skipping the step.
	if field.code.is_some() {
		return Err(Error::ScriptingDisabled);
	}

	// Step 3: defaults only fire when the field is entirely absent.
	if let Some(default) = &field.default {
		if path::get(current, &path).is_none() {
			let bindings = bindings_for(current);
			let val = default.compute(&bindings)?;
			path::set(current, &path, val);
		}
	}

	check_constraints(field, initial, current, thing, &path)?;

	// Step 9: re-run (3)-(5) so a coercion/match restore can't reintroduce a
	// violation the earlier passes would have caught.
	if let Some(default) = &field.default {
		if path::get(current, &path).is_none() {
			let bindings = bindings_for(current);
			let val = default.compute(&bindings)?;
			path::set(current, &path, val);
		}
	}
	recheck_presence(field, current, thing, &path)
}

fn bindings_for(current: &Value) -> Bindings {
	Bindings {
		value: current.clone(),
		..Default::default()
	}
}

/// Steps 4-8: nullability, mandatoriness, type coercion, regex match and
/// range bounds.
fn check_constraints(field: &Field, initial: &Value, current: &mut Value, thing: &str, path: &crate::path::Path) -> Result<(), Error> {
	let val = path::get(current, path);

	if field.notnull && val.is_null() {
		return Err(Error::FieldValueNone {
			field: field.name.clone(),
			thing: thing.to_owned(),
		});
	}

	if field.mandatory && val.is_none() {
		return Err(Error::FieldMandatory {
			field: field.name.clone(),
			thing: thing.to_owned(),
		});
	}

	if val.is_nullish() {
		return Ok(());
	}

	if let Some(kind) = &field.kind {
		match coerce::coerce(&val, kind) {
			Some(coerced) => path::set(current, path, coerced),
			None => {
				let ok = match &field.assert {
					Some(assert) => assert.compute(&bindings_for(current))?.is_truthy(),
					None => false,
				};
				if !ok {
					if field.validate {
						return Err(Error::FieldCoerce {
							thing: thing.to_owned(),
							field: field.name.clone(),
							kind: format!("{kind:?}"),
							value: val.to_string(),
						});
					}
					path::set(current, path, path::get(initial, path));
				}
			}
		}
	}

	let val = path::get(current, path);
	if let Some(re) = &field.match_regex {
		let pattern = regex::Regex::new(re).map_err(|e| Error::InvalidPath(e.to_string()))?;
		if !pattern.is_match(&val.as_string()) {
			if field.validate {
				return Err(Error::FieldMatch {
					thing: thing.to_owned(),
					field: field.name.clone(),
					check: re.clone(),
					value: val.to_string(),
				});
			}
			path::set(current, path, path::get(initial, path));
		}
	}

	let val = path::get(current, path);
	if field.min.is_some() || field.max.is_some() {
		let measured = match &val {
			Value::Number(n) => n.as_float(),
			Value::Strand(s) => s.chars().count() as f64,
			Value::Array(a) => a.len() as f64,
			_ => return Ok(()),
		};
		if let Some(min) = &field.min {
			if measured < min.as_float() {
				return Err(Error::FieldRange {
					thing: thing.to_owned(),
					field: field.name.clone(),
					value: val.to_string(),
				});
			}
		}
		if let Some(max) = &field.max {
			if measured > max.as_float() {
				return Err(Error::FieldRange {
					thing: thing.to_owned(),
					field: field.name.clone(),
					value: val.to_string(),
				});
			}
		}
	}

	Ok(())
}

fn recheck_presence(field: &Field, current: &Value, thing: &str, path: &crate::path::Path) -> Result<(), Error> {
	let val = path::get(current, path);
	if field.notnull && val.is_null() {
		return Err(Error::FieldValueNone {
			field: field.name.clone(),
			thing: thing.to_owned(),
		});
	}
	if field.mandatory && val.is_none() {
		return Err(Error::FieldMandatory {
			field: field.name.clone(),
			thing: thing.to_owned(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::Permissions;
	use crate::types::Object;

	fn field(name: &str) -> Field {
		Field {
			name: name.to_owned(),
			what: "person".to_owned(),
			kind: None,
			default: None,
			assert: None,
			code: None,
			readonly: false,
			mandatory: false,
			notnull: false,
			match_regex: None,
			min: None,
			max: None,
			validate: true,
			permissions: Permissions::full(),
			comment: None,
		}
	}

	fn obj(pairs: &[(&str, Value)]) -> Value {
		Value::Object(Object(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()))
	}

	#[test]
	fn readonly_restores_initial() {
		let f = Field { readonly: true, ..field("name") };
		let initial = obj(&[("name", Value::from("alice"))]);
		let mut current = obj(&[("name", Value::from("mallory"))]);
		enforce_one(&f, &initial, &mut current, "person:1").unwrap();
		assert_eq!(path::get(&current, &parse("name").unwrap()), Value::from("alice"));
	}

	#[test]
	fn mandatory_absent_errors() {
		let f = Field { mandatory: true, ..field("name") };
		let initial = Value::None;
		let mut current = obj(&[]);
		assert!(matches!(enforce_one(&f, &initial, &mut current, "person:1"), Err(Error::FieldMandatory { .. })));
	}

	#[test]
	fn default_fills_absent_field() {
		let f = Field { default: Some(crate::expr::Expr::Literal(Value::from(18i64))), ..field("age") };
		let initial = Value::None;
		let mut current = obj(&[]);
		enforce_one(&f, &initial, &mut current, "person:1").unwrap();
		assert_eq!(path::get(&current, &parse("age").unwrap()), Value::from(18i64));
	}

	#[test]
	fn coercion_failure_without_assert_errors() {
		let f = Field { kind: Some(crate::types::Kind::Number), ..field("age") };
		let initial = Value::None;
		let mut current = obj(&[("age", Value::from("not-a-number"))]);
		assert!(matches!(enforce_one(&f, &initial, &mut current, "person:1"), Err(Error::FieldCoerce { .. })));
	}

	#[test]
	fn range_check_rejects_out_of_bounds() {
		let f = Field { min: Some(crate::types::Number::from(0i64)), max: Some(crate::types::Number::from(120i64)), ..field("age") };
		let initial = Value::None;
		let mut current = obj(&[("age", Value::from(200i64))]);
		assert!(matches!(enforce_one(&f, &initial, &mut current, "person:1"), Err(Error::FieldRange { .. })));
	}

	#[test]
	fn match_regex_rejects_non_conforming_value() {
		let f = Field { match_regex: Some("^[a-z]+$".to_owned()), ..field("slug") };
		let initial = Value::None;
		let mut current = obj(&[("slug", Value::from("Not-Valid"))]);
		assert!(matches!(enforce_one(&f, &initial, &mut current, "person:1"), Err(Error::FieldMatch { .. })));
	}

	#[test]
	fn non_validating_coercion_failure_restores_initial() {
		let f = Field { kind: Some(crate::types::Kind::Number), validate: false, ..field("age") };
		let initial = obj(&[("age", Value::from(30i64))]);
		let mut current = obj(&[("age", Value::from("not-a-number"))]);
		enforce_one(&f, &initial, &mut current, "person:1").unwrap();
		assert_eq!(path::get(&current, &parse("age").unwrap()), Value::from(30i64));
	}

	#[test]
	fn non_validating_match_failure_restores_initial() {
		let f = Field { match_regex: Some("^[a-z]+$".to_owned()), validate: false, ..field("slug") };
		let initial = obj(&[("slug", Value::from("valid"))]);
		let mut current = obj(&[("slug", Value::from("Not-Valid"))]);
		enforce_one(&f, &initial, &mut current, "person:1").unwrap();
		assert_eq!(path::get(&current, &parse("slug").unwrap()), Value::from("valid"));
	}

	#[test]
	fn schemafull_rejects_undefined_field() {
		let mut fields = FieldMap::new();
		fields.insert("name".to_owned(), field("name"));
		let current = obj(&[("name", Value::from("alice")), ("nickname", Value::from("ally"))]);
		assert!(matches!(
			enforce_schemafull(&fields, &current, "person"),
			Err(Error::UndefinedField { .. })
		));
	}

	#[test]
	fn embedded_script_field_fails_closed() {
		let f = Field { code: Some("return undefined".to_owned()), ..field("computed") };
		let initial = Value::None;
		let mut current = obj(&[]);
		assert!(matches!(enforce_one(&f, &initial, &mut current, "person:1"), Err(Error::ScriptingDisabled)));
	}

	#[test]
	fn schemafull_allows_id_and_defined_fields() {
		let mut fields = FieldMap::new();
		fields.insert("name".to_owned(), field("name"));
		let current = obj(&[("id", Value::from("person:1")), ("name", Value::from("alice"))]);
		assert!(enforce_schemafull(&fields, &current, "person").is_ok());
	}
}
