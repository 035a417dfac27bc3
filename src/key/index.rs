//! Index entry keys (component 5, spec §4.4.4). The indexed tuple of column
//! values becomes the sort key; a unique index stores the tuple alone (a
//! duplicate tuple collides with the existing key and a `PutC` on it fails),
//! a non-unique index appends the record id so every matching row gets a
//! distinct key.
use crate::key::category::{Categorise, Category};
use crate::key::{MAX, MIN};
use crate::types::{Array, Id};
use derive::Key;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// `/*{ns}*{db}*{tb}+{ix}*` — prefix for every entry of one index, used to
/// drop or rebuild an index wholesale.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
struct Prefix<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	pub ix: &'a str,
	_e: u8,
}

impl<'a> Prefix<'a> {
	fn new(ns: &'a str, db: &'a str, tb: &'a str, ix: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'+',
			ix,
			_e: b'*',
		}
	}
}

pub fn prefix(ns: &str, db: &str, tb: &str, ix: &str) -> Vec<u8> {
	let mut k = Prefix::new(ns, db, tb, ix).encode().unwrap();
	k.push(MIN);
	k
}

pub fn suffix(ns: &str, db: &str, tb: &str, ix: &str) -> Vec<u8> {
	let mut k = Prefix::new(ns, db, tb, ix).encode().unwrap();
	k.push(MAX);
	k
}

/// `/*{ns}*{db}*{tb}+{ix}*{fd}` — a unique index entry. The stored value is
/// the `Thing` the tuple belongs to.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Unique<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	pub ix: &'a str,
	_e: u8,
	pub fd: Cow<'a, Array>,
}

impl<'a> Unique<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, ix: &'a str, fd: &'a Array) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'+',
			ix,
			_e: b'*',
			fd: Cow::Borrowed(fd),
		}
	}
}

impl Categorise for Unique<'_> {
	fn categorise(&self) -> Category {
		Category::Index
	}
}

/// `/*{ns}*{db}*{tb}+{ix}*{fd}{id}` — a non-unique ("point") index entry; one
/// key per matching record rather than per distinct tuple.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Point<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	pub ix: &'a str,
	_e: u8,
	pub fd: Cow<'a, Array>,
	pub id: Id,
}

impl<'a> Point<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, ix: &'a str, fd: &'a Array, id: Id) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'+',
			ix,
			_e: b'*',
			fd: Cow::Borrowed(fd),
			id,
		}
	}
}

impl Categorise for Point<'_> {
	fn categorise(&self) -> Category {
		Category::Index
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Value;

	#[test]
	fn unique_roundtrip() {
		let fd = Array(vec![Value::from("alice@example.com")]);
		let val = Unique::new("testns", "testdb", "testtb", "testix", &fd);
		let enc = Unique::encode(&val).unwrap();
		assert_eq!(Unique::decode(&enc).unwrap(), val);
	}

	#[test]
	fn point_roundtrip() {
		let fd = Array(vec![Value::from("engineering")]);
		let val = Point::new("testns", "testdb", "testtb", "testix", &fd, Id::from("rec1"));
		let enc = Point::encode(&val).unwrap();
		assert_eq!(Point::decode(&enc).unwrap(), val);
	}

	#[test]
	fn range() {
		assert_eq!(prefix("testns", "testdb", "testtb", "testix"), b"/*testns\0*testdb\0*testtb\0+testix*\0");
		assert_eq!(suffix("testns", "testdb", "testtb", "testix"), b"/*testns\0*testdb\0*testtb\0+testix*\xff");
	}
}
