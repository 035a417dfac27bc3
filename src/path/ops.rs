use crate::err::Error;
use crate::path::part::{Part, Path};
use crate::types::{Array, Object, Value};

fn resolve_index(i: usize, len: usize) -> Option<usize> {
	(i < len).then_some(i)
}

fn resolve_bound(b: usize, len: usize) -> usize {
	if b == usize::MAX {
		len
	} else {
		b.min(len)
	}
}

pub(super) fn get(doc: &Value, path: &[Part]) -> Value {
	let Some((head, rest)) = path.split_first() else {
		return doc.clone();
	};
	match head {
		Part::Name(k) => match doc.as_object().and_then(|o| o.get(k)) {
			Some(v) => get(v, rest),
			None => Value::None,
		},
		Part::Index(i) => match doc.as_array().and_then(|a| resolve_index(*i, a.len())) {
			Some(i) => get(&doc.as_array().unwrap()[i], rest),
			None => Value::None,
		},
		Part::First => match doc.as_array().filter(|a| !a.is_empty()) {
			Some(a) => get(&a[0], rest),
			None => Value::None,
		},
		Part::Last => match doc.as_array().filter(|a| !a.is_empty()) {
			Some(a) => get(&a[a.len() - 1], rest),
			None => Value::None,
		},
		Part::Wildcard => match doc {
			Value::Array(a) => Value::Array(Array(a.iter().map(|v| get(v, rest)).collect())),
			Value::Object(o) => Value::Array(Array(o.values().map(|v| get(v, rest)).collect())),
			_ => Value::None,
		},
		Part::Slice {
			start,
			end,
		} => match doc {
			Value::Array(a) => {
				let s = resolve_bound(*start, a.len());
				let e = resolve_bound(*end, a.len()).max(s);
				Value::Array(Array(a[s..e].iter().map(|v| get(v, rest)).collect()))
			}
			_ => Value::None,
		},
	}
}

pub(super) fn set(doc: &mut Value, path: &[Part], val: Value) {
	let Some((head, rest)) = path.split_first() else {
		*doc = val;
		return;
	};
	match head {
		Part::Name(k) => {
			if !matches!(doc, Value::Object(_)) {
				*doc = Value::Object(Object::default());
			}
			if let Value::Object(o) = doc {
				let entry = o.0.entry(k.clone()).or_insert(Value::None);
				set(entry, rest, val);
			}
		}
		Part::Index(i) => {
			ensure_array_len(doc, *i + 1);
			if let Value::Array(a) = doc {
				set(&mut a[*i], rest, val);
			}
		}
		Part::First => {
			ensure_array_len(doc, 1);
			if let Value::Array(a) = doc {
				set(&mut a[0], rest, val);
			}
		}
		Part::Last => {
			ensure_array_len(doc, 1);
			if let Value::Array(a) = doc {
				let i = a.len() - 1;
				set(&mut a[i], rest, val);
			}
		}
		Part::Wildcard => match doc {
			Value::Array(a) => {
				for v in a.iter_mut() {
					set(v, rest, val.clone());
				}
			}
			Value::Object(o) => {
				for v in o.values_mut() {
					set(v, rest, val.clone());
				}
			}
			_ => {}
		},
		Part::Slice {
			start,
			end,
		} => {
			if let Value::Array(a) = doc {
				let s = resolve_bound(*start, a.len());
				let e = resolve_bound(*end, a.len()).max(s);
				for v in a[s..e].iter_mut() {
					set(v, rest, val.clone());
				}
			}
		}
	}
}

fn ensure_array_len(doc: &mut Value, len: usize) {
	if !matches!(doc, Value::Array(_)) {
		*doc = Value::Array(Array::default());
	}
	if let Value::Array(a) = doc {
		while a.len() < len {
			a.push(Value::None);
		}
	}
}

pub(super) fn del(doc: &mut Value, path: &[Part]) -> Result<(), Error> {
	let Some((head, rest)) = path.split_first() else {
		*doc = Value::None;
		return Ok(());
	};
	match head {
		Part::Name(k) => match doc {
			Value::Object(o) => {
				if let Some(sub) = o.0.get_mut(k) {
					if rest.is_empty() {
						o.0.remove(k);
						Ok(())
					} else {
						del(sub, rest)
					}
				} else {
					Ok(()) // missing path: no-op
				}
			}
			Value::None | Value::Null => Ok(()),
			_ => Err(Error::InvalidPath(format!("cannot delete '{k}' from a non-object value"))),
		},
		Part::Index(i) => del_array_index(doc, *i, rest),
		Part::First => match doc.as_array() {
			Some(a) if !a.is_empty() => del_array_index(doc, 0, rest),
			Some(_) => Ok(()),
			None => del_missing_object(doc),
		},
		Part::Last => match doc.as_array() {
			Some(a) if !a.is_empty() => {
				let i = a.len() - 1;
				del_array_index(doc, i, rest)
			}
			Some(_) => Ok(()),
			None => del_missing_object(doc),
		},
		Part::Wildcard => match doc {
			Value::Array(a) => {
				if rest.is_empty() {
					a.0.clear();
					Ok(())
				} else {
					for v in a.iter_mut() {
						del(v, rest)?;
					}
					Ok(())
				}
			}
			Value::Object(o) => {
				if rest.is_empty() {
					o.0.clear();
					Ok(())
				} else {
					for v in o.values_mut() {
						del(v, rest)?;
					}
					Ok(())
				}
			}
			Value::None | Value::Null => Ok(()),
			_ => Err(Error::InvalidPath("cannot delete a wildcard from a scalar value".into())),
		},
		Part::Slice {
			start,
			end,
		} => match doc {
			Value::Array(a) => {
				let s = resolve_bound(*start, a.len());
				let e = resolve_bound(*end, a.len()).max(s);
				if rest.is_empty() {
					a.0.drain(s..e);
				} else {
					for v in a.0[s..e].iter_mut() {
						del(v, rest)?;
					}
				}
				Ok(())
			}
			Value::None | Value::Null => Ok(()),
			_ => Err(Error::InvalidPath("cannot delete a slice from a non-array value".into())),
		},
	}
}

fn del_array_index(doc: &mut Value, i: usize, rest: &[Part]) -> Result<(), Error> {
	match doc {
		Value::Array(a) => {
			if i >= a.len() {
				return Ok(()); // missing path: no-op
			}
			if rest.is_empty() {
				a.0.remove(i);
				Ok(())
			} else {
				del(&mut a[i], rest)
			}
		}
		Value::None | Value::Null => Ok(()),
		_ => Err(Error::InvalidPath(format!("cannot delete index {i} from a non-array value"))),
	}
}

fn del_missing_object(doc: &Value) -> Result<(), Error> {
	match doc {
		Value::None | Value::Null => Ok(()),
		_ => Err(Error::InvalidPath("cannot delete from a non-array value".into())),
	}
}

/// Resolve `path` through `doc`, fanning out at wildcards/slices, then
/// recursively expand every resulting value into its scalar leaves.
pub(super) fn walk(doc: &Value, base: &[Part], path: &[Part]) -> Vec<(Path, Value)> {
	let Some((head, rest)) = path.split_first() else {
		return leaves(doc, base);
	};
	match head {
		Part::Name(k) => {
			let mut next = base.to_vec();
			next.push(Part::Name(k.clone()));
			match doc.as_object().and_then(|o| o.get(k)) {
				Some(v) => walk(v, &next, rest),
				None => walk(&Value::None, &next, rest),
			}
		}
		Part::Index(i) => walk_index(doc, base, *i, rest),
		Part::First => walk_index(doc, base, 0, rest),
		Part::Last => {
			let len = doc.as_array().map(|a| a.len()).unwrap_or(0);
			walk_index(doc, base, len.saturating_sub(1), rest)
		}
		Part::Wildcard => match doc {
			Value::Array(a) => {
				let mut out = Vec::new();
				for (i, v) in a.iter().enumerate() {
					let mut next = base.to_vec();
					next.push(Part::Index(i));
					out.extend(walk(v, &next, rest));
				}
				out
			}
			Value::Object(o) => {
				let mut out = Vec::new();
				for (k, v) in o.iter() {
					let mut next = base.to_vec();
					next.push(Part::Name(k.clone()));
					out.extend(walk(v, &next, rest));
				}
				out
			}
			_ => Vec::new(),
		},
		Part::Slice {
			start,
			end,
		} => match doc {
			Value::Array(a) => {
				let s = resolve_bound(*start, a.len());
				let e = resolve_bound(*end, a.len()).max(s);
				let mut out = Vec::new();
				for i in s..e {
					let mut next = base.to_vec();
					next.push(Part::Index(i));
					out.extend(walk(&a[i], &next, rest));
				}
				out
			}
			_ => Vec::new(),
		},
	}
}

fn walk_index(doc: &Value, base: &[Part], i: usize, rest: &[Part]) -> Vec<(Path, Value)> {
	match doc.as_array().and_then(|a| resolve_index(i, a.len())) {
		Some(i) => {
			let mut next = base.to_vec();
			next.push(Part::Index(i));
			walk(&doc.as_array().unwrap()[i], &next, rest)
		}
		None => Vec::new(),
	}
}

/// Recursively expand `val` into `(path, leaf)` pairs for every scalar it
/// contains (an empty object/array has no leaves of its own).
fn leaves(val: &Value, base: &[Part]) -> Vec<(Path, Value)> {
	match val {
		Value::Array(a) if !a.is_empty() => {
			let mut out = Vec::new();
			for (i, v) in a.iter().enumerate() {
				let mut next = base.to_vec();
				next.push(Part::Index(i));
				out.extend(leaves(v, &next));
			}
			out
		}
		Value::Object(o) if !o.is_empty() => {
			let mut out = Vec::new();
			for (k, v) in o.iter() {
				let mut next = base.to_vec();
				next.push(Part::Name(k.clone()));
				out.extend(leaves(v, &next));
			}
			out
		}
		other => vec![(base.to_vec(), other.clone())],
	}
}
