//! The record key: `/*{ns}*{db}*{tb}*{id}` (spec §3.1).
use crate::key::category::{Categorise, Category};
use crate::key::{MAX, MIN};
use crate::types::Id;
use derive::Key;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Thing<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	pub id: Id,
}

impl<'a> Thing<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, id: Id) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'*',
			id,
		}
	}

	pub fn prefix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = super::table::All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'*', MIN]);
		k
	}

	pub fn suffix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = super::table::All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'*', MAX]);
		k
	}
}

impl Categorise for Thing<'_> {
	fn categorise(&self) -> Category {
		Category::Thing
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let val = Thing::new("testns", "testdb", "testtb", Id::from("testid"));
		let enc = Thing::encode(&val).unwrap();
		assert_eq!(Thing::decode(&enc).unwrap(), val);
	}

	#[test]
	fn range() {
		assert_eq!(Thing::prefix("testns", "testdb", "testtb"), b"/*testns\0*testdb\0*testtb\0*\0");
		assert_eq!(Thing::suffix("testns", "testdb", "testtb"), b"/*testns\0*testdb\0*testtb\0*\xff");
	}
}
