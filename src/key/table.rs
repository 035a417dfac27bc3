//! Table-level keys: the table catalog entry and its field/index/event/view/
//! live-query definitions (spec §3.2, §4.2).
use crate::key::category::{Categorise, Category};
use crate::key::{MAX, MIN};
use derive::Key;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `/*{ns}*{db}!tb{tb}` — the `DEFINE TABLE` catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Tb<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	_d: u8,
	_e: u8,
	pub tb: &'a str,
}

impl<'a> Tb<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'!',
			_d: b't',
			_e: b'b',
			tb,
		}
	}
}

impl Categorise for Tb<'_> {
	fn categorise(&self) -> Category {
		Category::Table
	}
}

pub fn tb_prefix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = super::database::All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'b', MIN]);
	k
}

pub fn tb_suffix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = super::database::All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'b', MAX]);
	k
}

/// `/*{ns}*{db}*{tb}` — prefix for every key nested under a table.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct All<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
}

impl<'a> All<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
		}
	}
}

impl Categorise for All<'_> {
	fn categorise(&self) -> Category {
		Category::TableRoot
	}
}

pub fn all<'a>(ns: &'a str, db: &'a str, tb: &'a str) -> All<'a> {
	All::new(ns, db, tb)
}

/// `/*{ns}*{db}*{tb}!fd{fd}` — a `DEFINE FIELD` catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Fd<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	_e: u8,
	_f: u8,
	pub fd: &'a str,
}

impl<'a> Fd<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, fd: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'!',
			_e: b'f',
			_f: b'd',
			fd,
		}
	}

	pub fn prefix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'f', b'd', MIN]);
		k
	}

	pub fn suffix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'f', b'd', MAX]);
		k
	}
}

impl Categorise for Fd<'_> {
	fn categorise(&self) -> Category {
		Category::TableField
	}
}

/// `/*{ns}*{db}*{tb}!ix{ix}` — a `DEFINE INDEX` catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Ix<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	_e: u8,
	_f: u8,
	pub ix: &'a str,
}

impl<'a> Ix<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, ix: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'!',
			_e: b'i',
			_f: b'x',
			ix,
		}
	}

	pub fn prefix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'i', b'x', MIN]);
		k
	}

	pub fn suffix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'i', b'x', MAX]);
		k
	}
}

impl Categorise for Ix<'_> {
	fn categorise(&self) -> Category {
		Category::IndexDefinition
	}
}

/// `/*{ns}*{db}*{tb}!ev{ev}` — a `DEFINE EVENT` catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Ev<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	_e: u8,
	_f: u8,
	pub ev: &'a str,
}

impl<'a> Ev<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, ev: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'!',
			_e: b'e',
			_f: b'v',
			ev,
		}
	}

	pub fn prefix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'e', b'v', MIN]);
		k
	}

	pub fn suffix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'e', b'v', MAX]);
		k
	}
}

impl Categorise for Ev<'_> {
	fn categorise(&self) -> Category {
		Category::TableEvent
	}
}

/// `/*{ns}*{db}*{tb}!ft{ft}` — a materialised view (`DEFINE TABLE ... AS
/// SELECT`) foreign-table entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Ft<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	_e: u8,
	_f: u8,
	pub ft: &'a str,
}

impl<'a> Ft<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, ft: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'!',
			_e: b'f',
			_f: b't',
			ft,
		}
	}

	pub fn prefix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'f', b't', MIN]);
		k
	}

	pub fn suffix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
		let mut k = All::new(ns, db, tb).encode().unwrap();
		k.extend_from_slice(&[b'!', b'f', b't', MAX]);
		k
	}
}

impl Categorise for Ft<'_> {
	fn categorise(&self) -> Category {
		Category::TableView
	}
}

/// `/*{ns}*{db}*{tb}!lv{lv}` — a `LIVE SELECT` subscription definition
/// (component 10).
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Lv<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub tb: &'a str,
	_d: u8,
	_e: u8,
	_f: u8,
	#[serde(with = "uuid::serde::compact")]
	pub lv: Uuid,
}

impl<'a> Lv<'a> {
	pub fn new(ns: &'a str, db: &'a str, tb: &'a str, lv: Uuid) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'*',
			tb,
			_d: b'!',
			_e: b'l',
			_f: b'v',
			lv,
		}
	}
}

impl Categorise for Lv<'_> {
	fn categorise(&self) -> Category {
		Category::TableLiveQuery
	}
}

pub fn lv_prefix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
	let mut k = All::new(ns, db, tb).encode().unwrap();
	k.extend_from_slice(&[b'!', b'l', b'v', MIN]);
	k
}

pub fn lv_suffix(ns: &str, db: &str, tb: &str) -> Vec<u8> {
	let mut k = All::new(ns, db, tb).encode().unwrap();
	k.extend_from_slice(&[b'!', b'l', b'v', MAX]);
	k
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tb_key() {
		let val = Tb::new("testns", "testdb", "testtb");
		let enc = Tb::encode(&val).unwrap();
		assert_eq!(enc, b"/*testns\0*testdb\0!tbtesttb\0");
		assert_eq!(Tb::decode(&enc).unwrap(), val);
	}

	#[test]
	fn fd_key_and_range() {
		let val = Fd::new("testns", "testdb", "testtb", "testfd");
		let enc = Fd::encode(&val).unwrap();
		assert_eq!(enc, b"/*testns\0*testdb\0*testtb\0!fdtestfd\0");
		assert_eq!(Fd::decode(&enc).unwrap(), val);
		assert_eq!(Fd::prefix("testns", "testdb", "testtb"), b"/*testns\0*testdb\0*testtb\0!fd\0");
		assert_eq!(Fd::suffix("testns", "testdb", "testtb"), b"/*testns\0*testdb\0*testtb\0!fd\xff");
	}

	#[test]
	fn lv_key() {
		let id = Uuid::from_bytes([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
		let val = Lv::new("testns", "testdb", "testtb", id);
		let enc = Lv::encode(&val).unwrap();
		assert_eq!(Lv::decode(&enc).unwrap(), val);
	}
}
