//! Diff/patch (component 7): computes an ordered list of operations between
//! two documents, and replays such a list elsewhere. The document engine
//! writes a diff's operations as patch history on every commit
//! (`kvs::tx::put_patch`) and replays them to reconstruct a prior version.
//!
//! The operation shape and string-delta behaviour mirror the JSON-Patch-like
//! scheme SurrealDB exposes on `Value`, but is expressed here in terms of
//! this crate's own [`Value`] and doc [`Path`] rather than a SQL AST.
use crate::err::Error;
use crate::path::{self, Part, Path};
use crate::types::{Array, Value};
use serde::{Deserialize, Serialize};

/// One step of a diff. `Change` carries a `dmp`-format textual delta (not
/// the replacement string) so that patch history stays small for a long
/// string that changes a little at a time; it must round-trip under
/// [`patch`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Operation {
	Add {
		path: Path,
		value: Value,
	},
	Remove {
		path: Path,
	},
	Replace {
		path: Path,
		value: Value,
	},
	Change {
		path: Path,
		value: Value,
	},
	Copy {
		path: Path,
		from: Path,
	},
	Move {
		path: Path,
		from: Path,
	},
	Test {
		path: Path,
		value: Value,
	},
}

/// Compute the ordered list of operations that turns `old` into `new`.
pub fn diff(old: &Value, new: &Value) -> Vec<Operation> {
	let mut ops = Vec::new();
	walk(&[], old, new, &mut ops);
	collapse_moves(&mut ops, old, new);
	ops
}

fn walk(base: &[Part], old: &Value, new: &Value, ops: &mut Vec<Operation>) {
	if old == new {
		return;
	}
	match (old, new) {
		(Value::Object(o), Value::Object(n)) => {
			for k in o.keys() {
				if !n.contains_key(k) {
					ops.push(Operation::Remove {
						path: push(base, Part::Name(k.clone())),
					});
				}
			}
			for (k, v) in n.iter() {
				match o.get(k) {
					None => ops.push(Operation::Add {
						path: push(base, Part::Name(k.clone())),
						value: v.clone(),
					}),
					Some(old_v) => walk(&push(base, Part::Name(k.clone())), old_v, v, ops),
				}
			}
		}
		(Value::Array(o), Value::Array(n)) => diff_array(base, o, n, ops),
		(Value::Strand(o), Value::Strand(n)) => ops.push(Operation::Change {
			path: base.to_vec(),
			value: Value::from(make_delta(o.as_str(), n.as_str())),
		}),
		_ => ops.push(Operation::Replace {
			path: base.to_vec(),
			value: new.clone(),
		}),
	}
}

fn diff_array(base: &[Part], old: &Array, new: &Array, ops: &mut Vec<Operation>) {
	let common = old.len().min(new.len());
	for i in 0..common {
		walk(&push(base, Part::Index(i)), &old[i], &new[i], ops);
	}
	if new.len() > old.len() {
		for i in common..new.len() {
			ops.push(Operation::Add {
				path: push(base, Part::Index(i)),
				value: new[i].clone(),
			});
		}
	} else {
		// Remove trailing indices back-to-front so earlier indices in this
		// same batch are never shifted by an already-applied removal.
		for i in (common..old.len()).rev() {
			ops.push(Operation::Remove {
				path: push(base, Part::Index(i)),
			});
		}
	}
}

fn push(base: &[Part], part: Part) -> Path {
	let mut p = base.to_vec();
	p.push(part);
	p
}

/// Fold an `Add` + `Remove` pair whose values are deep-equal into a single
/// `Move`: a field (or array element) that only relocated shouldn't be
/// serialised as a full value twice.
fn collapse_moves(ops: &mut Vec<Operation>, old: &Value, new: &Value) {
	let mut i = 0;
	'outer: while i < ops.len() {
		if let Operation::Remove {
			path: removed,
		} = ops[i].clone()
		{
			let removed_val = path::get(old, &removed);
			if removed_val.is_none() {
				i += 1;
				continue;
			}
			for j in 0..ops.len() {
				if i == j {
					continue;
				}
				if let Operation::Add {
					path: added,
					value,
				} = &ops[j]
				{
					if *value == removed_val && path::get(new, added) == removed_val {
						let (lo, hi) = (i.min(j), i.max(j));
						ops.remove(hi);
						ops[lo] = Operation::Move {
							path: added.clone(),
							from: removed,
						};
						continue 'outer;
					}
				}
			}
		}
		i += 1;
	}
}

fn make_delta(old: &str, new: &str) -> String {
	let dmp = dmp::new();
	let patches = dmp.patch_make(dmp::PatchInput::Texts(old, new));
	dmp.patch_to_text(&patches)
}

/// Apply `ops` to `doc`, returning the patched document without mutating
/// the input.
pub fn patch(doc: &Value, ops: &[Operation]) -> Result<Value, Error> {
	let mut new = doc.clone();
	for op in ops {
		apply_one(&mut new, op)?;
	}
	Ok(new)
}

fn apply_one(doc: &mut Value, op: &Operation) -> Result<(), Error> {
	match op {
		Operation::Add {
			path,
			value,
		} => add(doc, path, value.clone()),
		Operation::Remove {
			path,
		} => path::del(doc, path),
		Operation::Replace {
			path,
			value,
		} => {
			path::set(doc, path, value.clone());
			Ok(())
		}
		Operation::Change {
			path,
			value,
		} => {
			let Value::Strand(delta) = value else {
				return Ok(());
			};
			let Value::Strand(cur) = path::get(doc, path) else {
				return Ok(());
			};
			let dmp = dmp::new();
			let patches = dmp.patch_from_text(delta.as_str().to_owned()).map_err(|e| Error::InvalidPatch {
				message: format!("{e:?}"),
			})?;
			let (chars, _) = dmp.patch_apply(&patches, cur.as_str()).map_err(|e| Error::InvalidPatch {
				message: format!("{e:?}"),
			})?;
			path::set(doc, path, Value::from(chars.into_iter().collect::<String>()));
			Ok(())
		}
		Operation::Copy {
			path,
			from,
		} => {
			let val = path::get(doc, from);
			path::set(doc, path, val);
			Ok(())
		}
		Operation::Move {
			path,
			from,
		} => {
			let val = path::get(doc, from);
			path::set(doc, path, val);
			path::del(doc, from)
		}
		Operation::Test {
			path,
			value,
		} => {
			let found = path::get(doc, path);
			if &found != value {
				return Err(Error::PatchTest {
					expected: value.to_string(),
					got: found.to_string(),
				});
			}
			Ok(())
		}
	}
}

/// Append semantics when the parent is an array: inserting at an index
/// within bounds shifts the rest right; at or past the end, it appends.
fn add(doc: &mut Value, path: &[Part], value: Value) -> Result<(), Error> {
	let Some((last, parent)) = path.split_last() else {
		*doc = value;
		return Ok(());
	};
	match last {
		Part::Index(i) => {
			let mut arr = match path::get(doc, parent) {
				Value::Array(a) => a,
				_ => Array::default(),
			};
			if *i < arr.len() {
				arr.0.insert(*i, value);
			} else {
				arr.0.push(value);
			}
			path::set(doc, parent, Value::Array(arr));
			Ok(())
		}
		_ => {
			path::set(doc, path, value);
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::path::parse;
	use crate::types::Object;

	fn obj(pairs: &[(&str, Value)]) -> Value {
		Value::Object(Object(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()))
	}

	#[test]
	fn diff_add_key() {
		let old = obj(&[]);
		let new = obj(&[("a", Value::from(1i64))]);
		let ops = diff(&old, &new);
		assert_eq!(ops, vec![Operation::Add { path: parse("a").unwrap(), value: Value::from(1i64) }]);
		assert_eq!(patch(&old, &ops).unwrap(), new);
	}

	#[test]
	fn diff_remove_key() {
		let old = obj(&[("a", Value::from(1i64))]);
		let new = obj(&[]);
		let ops = diff(&old, &new);
		assert_eq!(ops, vec![Operation::Remove { path: parse("a").unwrap() }]);
		assert_eq!(patch(&old, &ops).unwrap(), new);
	}

	#[test]
	fn diff_replace_primitive() {
		let old = obj(&[("a", Value::from(1i64))]);
		let new = obj(&[("a", Value::Bool(true))]);
		let ops = diff(&old, &new);
		assert_eq!(ops, vec![Operation::Replace { path: parse("a").unwrap(), value: Value::Bool(true) }]);
		assert_eq!(patch(&old, &ops).unwrap(), new);
	}

	#[test]
	fn diff_change_string_round_trips() {
		let old = obj(&[("a", Value::from("hello world"))]);
		let new = obj(&[("a", Value::from("hello brave world"))]);
		let ops = diff(&old, &new);
		assert!(matches!(ops.as_slice(), [Operation::Change { .. }]));
		assert_eq!(patch(&old, &ops).unwrap(), new);
	}

	#[test]
	fn diff_array_append() {
		let old = Value::Array(Array(vec![Value::from(1i64), Value::from(2i64)]));
		let new = Value::Array(Array(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]));
		let ops = diff(&old, &new);
		assert_eq!(ops, vec![Operation::Add { path: vec![Part::Index(2)], value: Value::from(3i64) }]);
		assert_eq!(patch(&old, &ops).unwrap(), new);
	}

	#[test]
	fn diff_array_shrink() {
		let old = Value::Array(Array(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]));
		let new = Value::Array(Array(vec![Value::from(1i64)]));
		let ops = diff(&old, &new);
		assert_eq!(
			ops,
			vec![Operation::Remove { path: vec![Part::Index(2)] }, Operation::Remove { path: vec![Part::Index(1)] }]
		);
		assert_eq!(patch(&old, &ops).unwrap(), new);
	}

	#[test]
	fn diff_nested_object_in_array() {
		let old = Value::Array(Array(vec![obj(&[("a", Value::from(1i64))])]));
		let new = Value::Array(Array(vec![obj(&[("a", Value::from(2i64))])]));
		let ops = diff(&old, &new);
		assert_eq!(ops, vec![Operation::Replace { path: vec![Part::Index(0), Part::Name("a".into())], value: Value::from(2i64) }]);
		assert_eq!(patch(&old, &ops).unwrap(), new);
	}

	#[test]
	fn test_op_fails_on_mismatch() {
		let doc = obj(&[("a", Value::from(1i64))]);
		let ops = vec![Operation::Test { path: parse("a").unwrap(), value: Value::from(2i64) }];
		assert!(matches!(patch(&doc, &ops), Err(Error::PatchTest { .. })));
	}

	#[test]
	fn copy_duplicates_value() {
		let doc = obj(&[("a", Value::from(1i64))]);
		let ops = vec![Operation::Copy { path: parse("b").unwrap(), from: parse("a").unwrap() }];
		let patched = patch(&doc, &ops).unwrap();
		assert_eq!(path::get(&patched, &parse("a").unwrap()), Value::from(1i64));
		assert_eq!(path::get(&patched, &parse("b").unwrap()), Value::from(1i64));
	}

	#[test]
	fn move_relocates_value() {
		let doc = obj(&[("a", Value::from(1i64))]);
		let ops = vec![Operation::Move { path: parse("b").unwrap(), from: parse("a").unwrap() }];
		let patched = patch(&doc, &ops).unwrap();
		assert_eq!(path::get(&patched, &parse("a").unwrap()), Value::None);
		assert_eq!(path::get(&patched, &parse("b").unwrap()), Value::from(1i64));
	}

	#[test]
	fn diff_no_change_is_empty() {
		let doc = obj(&[("a", Value::from(1i64))]);
		assert!(diff(&doc, &doc).is_empty());
	}
}
