//! Namespace-level keys: the namespace catalog entry itself, its tokens and
//! its root logins.
use crate::key::category::{Categorise, Category};
use crate::key::{MAX, MIN};
use derive::Key;
use serde::{Deserialize, Serialize};

/// `/!ns{ns}` — the `DEFINE NAMESPACE` catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Ns<'a> {
	__: u8,
	_a: u8,
	_b: u8,
	_c: u8,
	pub ns: &'a str,
}

impl<'a> Ns<'a> {
	pub fn new(ns: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'!',
			_b: b'n',
			_c: b's',
			ns,
		}
	}
}

impl Categorise for Ns<'_> {
	fn categorise(&self) -> Category {
		Category::Namespace
	}
}

/// `/*{ns}` — prefix for every key nested under a namespace.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct All<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
}

impl<'a> All<'a> {
	pub fn new(ns: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
		}
	}
}

impl Categorise for All<'_> {
	fn categorise(&self) -> Category {
		Category::NamespaceRoot
	}
}

pub fn all(ns: &str) -> All<'_> {
	All::new(ns)
}

/// `/!ns` — prefix for every `DEFINE NAMESPACE` entry at the root.
pub fn ns_prefix() -> Vec<u8> {
	vec![b'/', b'!', b'n', b's', MIN]
}

pub fn ns_suffix() -> Vec<u8> {
	vec![b'/', b'!', b'n', b's', MAX]
}

/// `/*{ns}!tk{tk}` — a namespace-level login token definition.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Nt<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	_c: u8,
	_d: u8,
	pub tk: &'a str,
}

impl<'a> Nt<'a> {
	pub fn new(ns: &'a str, tk: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'!',
			_c: b't',
			_d: b'k',
			tk,
		}
	}
}

impl Categorise for Nt<'_> {
	fn categorise(&self) -> Category {
		Category::NamespaceToken
	}
}

pub fn nt_prefix(ns: &str) -> Vec<u8> {
	let mut k = All::new(ns).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'k', MIN]);
	k
}

pub fn nt_suffix(ns: &str) -> Vec<u8> {
	let mut k = All::new(ns).encode().unwrap();
	k.extend_from_slice(&[b'!', b't', b'k', MAX]);
	k
}

/// `/*{ns}!us{us}` — a namespace-level login (root user scoped to a ns).
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Serialize, Deserialize, Key)]
#[non_exhaustive]
pub struct Nu<'a> {
	__: u8,
	_a: u8,
	pub ns: &'a str,
	_b: u8,
	_c: u8,
	_d: u8,
	pub us: &'a str,
}

impl<'a> Nu<'a> {
	pub fn new(ns: &'a str, us: &'a str) -> Self {
		Self {
			__: b'/',
			_a: b'*',
			ns,
			_b: b'!',
			_c: b'u',
			_d: b's',
			us,
		}
	}
}

impl Categorise for Nu<'_> {
	fn categorise(&self) -> Category {
		Category::NamespaceUser
	}
}

pub fn nu_prefix(ns: &str) -> Vec<u8> {
	let mut k = All::new(ns).encode().unwrap();
	k.extend_from_slice(&[b'!', b'u', b's', MIN]);
	k
}

pub fn nu_suffix(ns: &str) -> Vec<u8> {
	let mut k = All::new(ns).encode().unwrap();
	k.extend_from_slice(&[b'!', b'u', b's', MAX]);
	k
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ns_key() {
		let val = Ns::new("testns");
		let enc = Ns::encode(&val).unwrap();
		assert_eq!(enc, b"/!nstestns\0");
		assert_eq!(Ns::decode(&enc).unwrap(), val);
	}

	#[test]
	fn ns_range() {
		assert_eq!(ns_prefix(), b"/!ns\0");
		assert_eq!(ns_suffix(), b"/!ns\xff");
	}

	#[test]
	fn nt_key_and_range() {
		let val = Nt::new("testns", "testtk");
		let enc = Nt::encode(&val).unwrap();
		assert_eq!(enc, b"/*testns\0!tktesttk\0");
		assert_eq!(Nt::decode(&enc).unwrap(), val);
		assert_eq!(nt_prefix("testns"), b"/*testns\0!tk\0");
		assert_eq!(nt_suffix("testns"), b"/*testns\0!tk\xff");
	}
}
