//! Scope-level keys: SIGNIN/SIGNUP scopes and their tokens (spec §6).
use crate::key::category::{Categorise, Category};
use crate::key::{MAX, MIN, SCOPE_SIGIL};
use derive::Key;
use serde::{Deserialize, Serialize};

/// `/*{ns}*{db}!sc{sc}` — the `DEFINE SCOPE` catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Sc<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	_d: u8,
	_e: u8,
	pub sc: &'a str,
}

impl<'a> Sc<'a> {
	pub fn new(ns: &'a str, db: &'a str, sc: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: b'!',
			_d: b's',
			_e: b'c',
			sc,
		}
	}
}

impl Categorise for Sc<'_> {
	fn categorise(&self) -> Category {
		Category::Scope
	}
}

pub fn sc_prefix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = super::database::All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b's', b'c', MIN]);
	k
}

pub fn sc_suffix(ns: &str, db: &str) -> Vec<u8> {
	let mut k = super::database::All::new(ns, db).encode().unwrap();
	k.extend_from_slice(&[b'!', b's', b'c', MAX]);
	k
}

/// `/*{ns}*{db}\xb1{sc}` — prefix for every key nested under a scope.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct All<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub sc: &'a str,
}

impl<'a> All<'a> {
	pub fn new(ns: &'a str, db: &'a str, sc: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: SCOPE_SIGIL,
			sc,
		}
	}
}

impl Categorise for All<'_> {
	fn categorise(&self) -> Category {
		Category::ScopeRoot
	}
}

/// `/*{ns}*{db}\xb1{sc}!tk{tk}` — a scope-level signin token definition.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct St<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	pub db: &'a str,
	_c: u8,
	pub sc: &'a str,
	_d: u8,
	_e: u8,
	_f: u8,
	pub tk: &'a str,
}

impl<'a> St<'a> {
	pub fn new(ns: &'a str, db: &'a str, sc: &'a str, tk: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'*',
			db,
			_c: SCOPE_SIGIL,
			sc,
			_d: b'!',
			_e: b't',
			_f: b'k',
			tk,
		}
	}
}

impl Categorise for St<'_> {
	fn categorise(&self) -> Category {
		Category::ScopeToken
	}
}

pub fn st_prefix(ns: &str, db: &str, sc: &str) -> Vec<u8> {
	let mut k = All::new(ns, db, sc).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'k', MIN]);
	k
}

pub fn st_suffix(ns: &str, db: &str, sc: &str) -> Vec<u8> {
	let mut k = All::new(ns, db, sc).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'k', MAX]);
	k
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sc_key() {
		let val = Sc::new("testns", "testdb", "testsc");
		let enc = Sc::encode(&val).unwrap();
		assert_eq!(enc, b"/*testns\0*testdb\0!sctestsc\0");
		assert_eq!(Sc::decode(&enc).unwrap(), val);
	}

	#[test]
	fn all_uses_scope_sigil() {
		let val = All::new("testns", "testdb", "testsc");
		let enc = All::encode(&val).unwrap();
		assert_eq!(enc, b"/*testns\0*testdb\0\xb1testsc\0");
	}
}
