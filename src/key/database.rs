//! Database-level keys, nested under a namespace.
use crate::key::category::{Categorise, Category};
use crate::key::{MAX, MIN};
use derive::Key;
use serde::{Deserialize, Serialize};

/// `/*{ns}!db{db}` — the `DEFINE DATABASE` catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Db<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	_c: u8,
	_d: u8,
	pub db: &'a str,
}

impl<'a> Db<'a> {
	pub fn new(ns: &'a str, db: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'!',
			_c: b'd',
			_d: b'b',
			db,
		}
	}
}

impl Categorise for Db<'_> {
	fn categorise(&self) -> Category {
		Category::Database
	}
}

pub fn db_prefix(ns: &str) -> Vec<u8> {
	let mut k = super::namespace::All::new(ns).encode().unwrap();
	k.extend_from_slice(&[b'!', b'd', b'b', MIN]);
	k
}

pub fn db_suffix(ns: &str) -> Vec<u8> {
	let mut k = super::namespace::All::new(ns).encode().unwrap();
	k.extend_from_slice(&[b'!', b'd', b'b', MAX]);
	k
}

/// `/*{ns}*{db}` — prefix for every key nested under a database.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct All<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
}

impl<'a> All<'a> {
	pub fn new(ns: &'a str, db: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
		}
	}
}

impl Categorise for All<'_> {
	fn categorise(&self) -> Category {
		Category::DatabaseRoot
	}
}

pub fn all<'a>(ns: &'a str, db: &'a str) -> All<'a> {
	All::new(ns, db)
}

/// `/*{ns}*{db}!tk{tk}` — a database-level login token definition.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Dt<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	_d: u8,
	_e: u8,
	pub tk: &'a str,
}

impl<'a> Dt<'a> {
	pub fn new(ns: &'a str, db: &'a str, tk: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'!',
			_d: b't',
			_e: b'k',
			tk,
		}
	}
}

impl Categorise for Dt<'_> {
	fn categorise(&self) -> Category {
		Category::DatabaseToken
	}
}

pub fn dt_prefix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'k', MIN]);
	k
}

pub fn dt_suffix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'k', MAX]);
	k
}

/// `/*{ns}*{db}!us{us}` — a database-level login.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Du<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	_d: u8,
	_e: u8,
	pub us: &'a str,
}

impl<'a> Du<'a> {
	pub fn new(ns: &'a str, db: &'a str, us: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'!',
			_d: b'u',
			_e: b's',
			us,
		}
	}
}

impl Categorise for Du<'_> {
	fn categorise(&self) -> Category {
		Category::DatabaseUser
	}
}

pub fn du_prefix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b'u', b's', MIN]);
	k
}

pub fn du_suffix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b'u', b's', MAX]);
	k
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn db_key() {
		let val = Db::new("testns", "testdb");
		let enc = Db::encode(&val).unwrap();
		assert_eq!(enc, b"/*testns\0!dbtestdb\0");
		assert_eq!(Db::decode(&enc).unwrap(), val);
	}

	#[test]
	fn all_prefix() {
		let val = All::new("testns", "testdb");
		let enc = All::encode(&val).unwrap();
		assert_eq!(enc, b"/*testns\0*testdb\0");
	}
}
