//! Index maintenance (spec §4.4.4 and §4.4.6 steps 2-3): computing the tuple
//! set an index definition addresses on a document, and keeping the stored
//! index entries in step with a record's old and new tuple sets.
use crate::catalog::Index;
use crate::err::Error;
use crate::key;
use crate::kvs::tx::Tx;
use crate::path::parse;
use crate::types::{Array, Id, Value};
use std::collections::BTreeSet;

/// The tuple set `index` addresses on `doc`: the Cartesian product of each
/// column's value set (a non-array column contributes one value, an array
/// column contributes its element set).
pub fn tuples(index: &Index, doc: &Value) -> Result<BTreeSet<Array>, Error> {
	let mut sets: Vec<Vec<Value>> = Vec::with_capacity(index.cols.len());
	for col in &index.cols {
		let path = parse(col)?;
		let val = crate::path::get(doc, &path);
		match val {
			Value::Array(a) => sets.push(a.0),
			other => sets.push(vec![other]),
		}
	}
	let mut out = BTreeSet::new();
	cartesian(&sets, &mut Vec::with_capacity(sets.len()), &mut out);
	Ok(out)
}

fn cartesian(sets: &[Vec<Value>], acc: &mut Vec<Value>, out: &mut BTreeSet<Array>) {
	match sets.split_first() {
		None => out.insert(Array(acc.clone())),
		Some((first, rest)) => {
			for v in first {
				acc.push(v.clone());
				cartesian(rest, acc, out);
				acc.pop();
			}
			return;
		}
	};
}

/// Bring every index on the table in step with the document's transition
/// from `initial` to `current` (spec §4.4.6 steps 2-3): drop entries for
/// tuples the record no longer produces, then insert entries for the ones
/// it newly produces.
pub async fn maintain(
	tx: &mut Tx,
	ns: &str,
	db: &str,
	tb: &str,
	id: &Id,
	indexes: &[Index],
	initial: &Value,
	current: &Value,
) -> Result<(), Error> {
	for ix in indexes {
		let old = tuples(ix, initial)?;
		let new = tuples(ix, current)?;

		for fd in old.difference(&new) {
			if ix.unique {
				del_unique_if_owned(tx, ns, db, tb, &ix.name, fd, id).await?;
			} else {
				tx.del_point_index(ns, db, tb, &ix.name, fd, id.clone()).await?;
			}
		}
		for fd in new.difference(&old) {
			if ix.unique {
				tx.put_unique_index(ns, db, tb, &ix.name, fd, id).await?;
			} else {
				tx.put_point_index(ns, db, tb, &ix.name, fd, id.clone()).await?;
			}
		}
	}
	Ok(())
}

/// Delete a unique-index entry only if it still points at `id` — another
/// record may already have claimed the tuple by the time this runs, in
/// which case the stale entry is left alone (spec §4.4.4: "ignore
/// mismatches — another record owned it").
async fn del_unique_if_owned(tx: &mut Tx, ns: &str, db: &str, tb: &str, ix: &str, fd: &Array, id: &Id) -> Result<(), Error> {
	let key = key::index::Unique::new(ns, db, tb, ix, fd).encode()?;
	match tx.get(key).await? {
		Some(stored) => {
			let owner: Id = crate::kvs::tx::decode(&stored)?;
			if &owner == id {
				tx.del_unique_index(ns, db, tb, ix, fd).await?;
			}
		}
		None => {}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Object;

	fn obj(pairs: &[(&str, Value)]) -> Value {
		Value::Object(Object(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()))
	}

	#[test]
	fn single_column_scalar_tuple() {
		let ix = Index { name: "ix".into(), what: "t".into(), cols: vec!["email".into()], unique: true, comment: None };
		let doc = obj(&[("email", Value::from("a@example.com"))]);
		let t = tuples(&ix, &doc).unwrap();
		assert_eq!(t.len(), 1);
		assert!(t.contains(&Array(vec![Value::from("a@example.com")])));
	}

	#[test]
	fn array_column_fans_out() {
		let ix = Index { name: "ix".into(), what: "t".into(), cols: vec!["tags".into()], unique: false, comment: None };
		let doc = obj(&[("tags", Value::Array(Array(vec![Value::from("a"), Value::from("b")])))]);
		let t = tuples(&ix, &doc).unwrap();
		assert_eq!(t.len(), 2);
	}

	#[test]
	fn two_array_columns_cartesian_product() {
		let ix = Index {
			name: "ix".into(),
			what: "t".into(),
			cols: vec!["a".into(), "b".into()],
			unique: false,
			comment: None,
		};
		let doc = obj(&[
			("a", Value::Array(Array(vec![Value::from(1i64), Value::from(2i64)]))),
			("b", Value::Array(Array(vec![Value::from("x"), Value::from("y")]))),
		]);
		let t = tuples(&ix, &doc).unwrap();
		assert_eq!(t.len(), 4);
	}
}
