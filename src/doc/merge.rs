//! Merge directives (spec §4.4.2): the ordered list of edits a caller
//! supplies before field enforcement runs.
use crate::diff::{self, Operation};
use crate::err::Error;
use crate::expr::{Bindings, Expr};
use crate::path::{self, Path};
use crate::types::{Array, Number, Object, Value};

#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Merge {
	/// Replace `current` wholesale with a supplied object.
	Content(Object),
	/// Deep-merge a supplied object into `current`, right-biased; arrays
	/// replace rather than concatenate.
	Merge(Object),
	/// Apply a diff/patch op list (component 7).
	Diff(Vec<Operation>),
	/// `field = expr`; `expr` computing to `Value::None` deletes the field.
	Set {
		field: Path,
		expr: Expr,
	},
	/// `field += expr`.
	Inc {
		field: Path,
		expr: Expr,
	},
	/// `field -= expr`.
	Dec {
		field: Path,
		expr: Expr,
	},
}

/// Apply `directives` in order against `current`. `$value` is bound to the
/// document as it stands before each directive runs.
pub fn apply(current: &mut Value, directives: &[Merge]) -> Result<(), Error> {
	for directive in directives {
		match directive {
			Merge::Content(obj) => *current = Value::Object(obj.clone()),
			Merge::Merge(obj) => deep_merge(current, obj),
			Merge::Diff(ops) => *current = diff::patch(current, ops)?,
			Merge::Set {
				field,
				expr,
			} => {
				let bindings = Bindings {
					value: current.clone(),
					..Default::default()
				};
				let val = expr.compute(&bindings)?;
				if val.is_none() {
					path::del(current, field)?;
				} else {
					path::set(current, field, val);
				}
			}
			Merge::Inc {
				field,
				expr,
			} => {
				let bindings = Bindings {
					value: current.clone(),
					..Default::default()
				};
				let rhs = expr.compute(&bindings)?;
				let existing = path::get(current, field);
				let updated = match (&existing, &rhs) {
					(Value::Number(a), Value::Number(b)) => Value::Number(*a + *b),
					(Value::None, Value::Number(_)) => rhs,
					_ => {
						let mut items = existing.into_array().unwrap_or_default();
						items.push(rhs);
						Value::Array(items)
					}
				};
				path::set(current, field, updated);
			}
			Merge::Dec {
				field,
				expr,
			} => {
				let bindings = Bindings {
					value: current.clone(),
					..Default::default()
				};
				let rhs = expr.compute(&bindings)?;
				let existing = path::get(current, field);
				let updated = match (&existing, &rhs) {
					(Value::Number(a), Value::Number(b)) => Value::Number(*a - *b),
					(Value::None, Value::Number(n)) => Value::Number(Number::from(0i64) - *n),
					_ => {
						let items = existing.into_array().unwrap_or_default();
						Value::Array(Array(items.0.into_iter().filter(|v| v != &rhs).collect()))
					}
				};
				path::set(current, field, updated);
			}
		}
	}
	Ok(())
}

/// Right-biased recursive object merge; a non-object value (including an
/// array) on either side is replaced wholesale by the incoming one.
fn deep_merge(current: &mut Value, incoming: &Object) {
	if !matches!(current, Value::Object(_)) {
		*current = Value::Object(Object::default());
	}
	let Value::Object(dst) = current else {
		unreachable!()
	};
	for (k, v) in incoming.iter() {
		match (dst.get_mut(k), v) {
			(Some(Value::Object(existing)), Value::Object(incoming_obj)) => {
				let mut nested = Value::Object(existing.clone());
				deep_merge(&mut nested, incoming_obj);
				if let Value::Object(merged) = nested {
					*existing = merged;
				}
			}
			_ => {
				dst.0.insert(k.clone(), v.clone());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::path::parse;

	fn obj(pairs: &[(&str, Value)]) -> Object {
		Object(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
	}

	#[test]
	fn content_replaces_wholesale() {
		let mut doc = Value::Object(obj(&[("a", Value::from(1i64))]));
		apply(&mut doc, &[Merge::Content(obj(&[("b", Value::from(2i64))]))]).unwrap();
		assert_eq!(doc, Value::Object(obj(&[("b", Value::from(2i64))])));
	}

	#[test]
	fn merge_is_right_biased_and_recursive() {
		let mut doc =
			Value::Object(obj(&[("a", Value::Object(obj(&[("x", Value::from(1i64)), ("y", Value::from(2i64))])))]));
		apply(&mut doc, &[Merge::Merge(obj(&[("a", Value::Object(obj(&[("y", Value::from(9i64))])))]))]).unwrap();
		assert_eq!(
			doc,
			Value::Object(obj(&[("a", Value::Object(obj(&[("x", Value::from(1i64)), ("y", Value::from(9i64))])))]))
		);
	}

	#[test]
	fn merge_replaces_array_rather_than_concatenating() {
		let mut doc = Value::Object(obj(&[("tags", Value::Array(Array(vec![Value::from("a")])))]));
		apply(&mut doc, &[Merge::Merge(obj(&[("tags", Value::Array(Array(vec![Value::from("b")])))]))]).unwrap();
		assert_eq!(doc, Value::Object(obj(&[("tags", Value::Array(Array(vec![Value::from("b")])))])));
	}

	#[test]
	fn set_void_deletes_field() {
		let mut doc = Value::Object(obj(&[("a", Value::from(1i64))]));
		apply(&mut doc, &[Merge::Set { field: parse("a").unwrap(), expr: Expr::Literal(Value::None) }]).unwrap();
		assert_eq!(doc, Value::Object(Object::default()));
	}

	#[test]
	fn inc_numeric_adds() {
		let mut doc = Value::Object(obj(&[("n", Value::from(1i64))]));
		apply(&mut doc, &[Merge::Inc { field: parse("n").unwrap(), expr: Expr::Literal(Value::from(4i64)) }]).unwrap();
		assert_eq!(path::get(&doc, &parse("n").unwrap()), Value::from(5i64));
	}

	#[test]
	fn inc_on_absent_array_field_creates_singleton() {
		let mut doc = Value::Object(Object::default());
		apply(&mut doc, &[Merge::Inc { field: parse("tags").unwrap(), expr: Expr::Literal(Value::from("a")) }])
			.unwrap();
		assert_eq!(path::get(&doc, &parse("tags").unwrap()), Value::Array(Array(vec![Value::from("a")])));
	}

	#[test]
	fn dec_removes_matching_array_item() {
		let mut doc = Value::Object(obj(&[("tags", Value::Array(Array(vec![Value::from("a"), Value::from("b")])))]));
		apply(&mut doc, &[Merge::Dec { field: parse("tags").unwrap(), expr: Expr::Literal(Value::from("a")) }])
			.unwrap();
		assert_eq!(path::get(&doc, &parse("tags").unwrap()), Value::Array(Array(vec![Value::from("b")])));
	}
}
