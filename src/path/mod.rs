//! Doc path addressing (component 8): a small path language for nested
//! read/write over [`Value`] — dotted keys, array indices, slice ranges,
//! wildcards, first/last. No SQL grammar backs this; it is a general nested
//! accessor any caller (document engine, merge directives, diff/patch) uses.

mod ops;
mod parse;
mod part;

pub use parse::parse;
pub use part::{Part, Path};

use crate::err::Error;
use crate::types::Value;

/// `Get` on a missing path returns a null-carrying value (spec §4.5
/// invariant), never an error.
pub fn get(doc: &Value, path: &[Part]) -> Value {
	ops::get(doc, path)
}

/// `Set` creates intermediate objects as needed.
pub fn set(doc: &mut Value, path: &[Part], val: Value) {
	ops::set(doc, path, val)
}

/// `Del` on a missing path is a no-op; on a missing *object* (i.e. an
/// intermediate segment resolves to a non-container value) it is an error.
pub fn del(doc: &mut Value, path: &[Part]) -> Result<(), Error> {
	ops::del(doc, path)
}

/// Yield `(joined_path, value)` for every scalar leaf reachable by walking
/// `path` through `doc`, expanding wildcards/slices along the way. Used by
/// field enforcement to iterate every concrete location a field definition
/// (which may itself contain a wildcard, e.g. `tags[*]`) addresses.
pub fn walk(doc: &Value, path: &[Part]) -> Vec<(Path, Value)> {
	ops::walk(doc, &[], path)
}

/// Join a path back into its dotted/bracketed string form.
pub fn join(path: &[Part]) -> String {
	let mut s = String::new();
	for (i, p) in path.iter().enumerate() {
		match p {
			Part::Name(n) => {
				if i > 0 {
					s.push('.');
				}
				s.push_str(n);
			}
			other => s.push_str(&other.to_string()),
		}
	}
	s
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Array, Object};

	fn obj(pairs: &[(&str, Value)]) -> Value {
		Value::Object(Object(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()))
	}

	#[test]
	fn get_set_roundtrip() {
		let mut doc = Value::None;
		let path = parse("a.b.c").unwrap();
		set(&mut doc, &path, Value::from(42i64));
		assert_eq!(get(&doc, &path), Value::from(42i64));
	}

	#[test]
	fn del_after_set_restores_prior_state() {
		let mut doc = obj(&[("a", Value::from(1i64))]);
		let path = parse("b").unwrap();
		set(&mut doc, &path, Value::from(2i64));
		del(&mut doc, &path).unwrap();
		assert_eq!(doc, obj(&[("a", Value::from(1i64))]));
	}

	#[test]
	fn get_missing_is_null_carrying() {
		let doc = obj(&[]);
		let path = parse("missing.nested").unwrap();
		assert_eq!(get(&doc, &path), Value::None);
	}

	#[test]
	fn del_missing_path_is_noop() {
		let mut doc = obj(&[("a", Value::from(1i64))]);
		let path = parse("missing").unwrap();
		assert!(del(&mut doc, &path).is_ok());
	}

	#[test]
	fn del_through_non_object_errors() {
		let mut doc = obj(&[("a", Value::from(1i64))]);
		let path = parse("a.b").unwrap();
		assert!(del(&mut doc, &path).is_err());
	}

	#[test]
	fn wildcard_get_returns_parallel_list() {
		let doc = Value::Array(Array(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]));
		let path = parse("[*]").unwrap();
		let got = get(&doc, &path);
		assert_eq!(got, Value::Array(Array(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)])));
	}

	#[test]
	fn wildcard_set_sets_every_element() {
		let mut doc = Value::Array(Array(vec![Value::from(1i64), Value::from(2i64)]));
		let path = parse("[*]").unwrap();
		set(&mut doc, &path, Value::from(0i64));
		assert_eq!(doc, Value::Array(Array(vec![Value::from(0i64), Value::from(0i64)])));
	}

	#[test]
	fn first_last() {
		let doc = Value::Array(Array(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]));
		assert_eq!(get(&doc, &parse("[first]").unwrap()), Value::from(1i64));
		assert_eq!(get(&doc, &parse("[last]").unwrap()), Value::from(3i64));
	}

	#[test]
	fn slice_half_open() {
		let doc = Value::Array(Array((0..5).map(Value::from).collect()));
		let got = get(&doc, &parse("[1:3]").unwrap());
		assert_eq!(got, Value::Array(Array(vec![Value::from(1i64), Value::from(2i64)])));
	}

	#[test]
	fn walk_yields_scalar_leaves() {
		let doc = obj(&[("tags", Value::Array(Array(vec![Value::from("a"), Value::from("b")])))]);
		let path = parse("tags[*]").unwrap();
		let leaves = walk(&doc, &path);
		assert_eq!(leaves.len(), 2);
		assert_eq!(join(&leaves[0].0), "tags[0]");
		assert_eq!(leaves[0].1, Value::from("a"));
	}

	#[test]
	fn colon_and_star_are_synonymous() {
		let doc = Value::Array(Array(vec![Value::from(1i64), Value::from(2i64)]));
		assert_eq!(get(&doc, &parse("[:]").unwrap()), get(&doc, &parse("[*]").unwrap()));
	}
}
