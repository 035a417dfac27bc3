//! Per-record patch history (component 6/spec §4.4.5):
//! `/*{ns}*{db}*{tb}*{id}#{version}`. Stored alongside the record itself so a
//! range scan over one thing's history never has to cross a table boundary.
use crate::key::category::{Categorise, Category};
use crate::key::{MAX, MIN};
use crate::types::Id;
use derive::Key;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Patch<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	pub id: Id,
	_e: u8,
	pub version: u64,
}

impl<'a> Patch<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, id: Id, version: u64) -> Self {
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
			_e: b'#',
			version,
		}
	}

	pub fn prefix(ns: &str, db: &str, tb: &str, id: Id) -> Vec<u8> {
		let mut k = super::thing::Thing::new(ns, db, tb, id).encode().unwrap();
		k.extend_from_slice(&[b'#', MIN]);
		k
	}

	pub fn suffix(ns: &str, db: &str, tb: &str, id: Id) -> Vec<u8> {
		let mut k = super::thing::Thing::new(ns, db, tb, id).encode().unwrap();
		k.extend_from_slice(&[b'#', MAX]);
		k
	}
}

impl Categorise for Patch<'_> {
	fn categorise(&self) -> Category {
		Category::Patch
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key_roundtrip() {
		let val = Patch::new("testns", "testdb", "testtb", Id::from("rec1"), 3);
		let enc = Patch::encode(&val).unwrap();
		assert_eq!(Patch::decode(&enc).unwrap(), val);
	}

	#[test]
	fn versions_sort_in_order() {
		let a = Patch::encode(&Patch::new("ns", "db", "tb", Id::from("r"), 1)).unwrap();
		let b = Patch::encode(&Patch::new("ns", "db", "tb", Id::from("r"), 2)).unwrap();
		assert!(a < b);
	}
}
