use crate::err::Error;
use crate::kvs::{Check, Key, Val};
use std::future::Future;
use std::ops::Range;

/// The contract every storage backend (currently only the in-memory
/// `echodb`-backed one, per `kv-mem`) must satisfy. Methods are written with
/// return-position `impl Future` so a backend's transaction type needs no
/// boxing to be `async` — mirrors how the reference engine keeps this trait
/// object-free.
pub trait Transaction {
	/// Override the behaviour on an unclosed write transaction being dropped.
	fn check_level(&mut self, check: Check);
	/// Has this transaction already been committed or cancelled?
	fn closed(&self) -> bool;
	/// Was this transaction opened for writing?
	fn writeable(&self) -> bool;
	/// Roll back all writes made on this transaction.
	fn cancel(&mut self) -> impl Future<Output = Result<(), Error>>;
	/// Make all writes made on this transaction visible.
	fn commit(&mut self) -> impl Future<Output = Result<(), Error>>;
	/// Does `key` exist?
	fn exists<K>(&mut self, key: K) -> impl Future<Output = Result<bool, Error>>
	where
		K: Into<Key>;
	/// Fetch `key`, or `None` if it doesn't exist.
	fn get<K>(&mut self, key: K) -> impl Future<Output = Result<Option<Val>, Error>>
	where
		K: Into<Key>;
	/// Unconditionally write `key` to `val`.
	fn set<K, V>(&mut self, key: K, val: V) -> impl Future<Output = Result<(), Error>>
	where
		K: Into<Key>,
		V: Into<Val>;
	/// Write `key` to `val` only if it does not already exist.
	fn put<K, V>(&mut self, key: K, val: V) -> impl Future<Output = Result<(), Error>>
	where
		K: Into<Key>,
		V: Into<Val>;
	/// Write `key` to `val` only if its current value equals `chk` (`None`
	/// means "only if absent").
	fn putc<K, V>(&mut self, key: K, val: V, chk: Option<V>) -> impl Future<Output = Result<(), Error>>
	where
		K: Into<Key>,
		V: Into<Val>;
	/// Unconditionally delete `key`.
	fn del<K>(&mut self, key: K) -> impl Future<Output = Result<(), Error>>
	where
		K: Into<Key>;
	/// Delete `key` only if its current value equals `chk` (`None` means
	/// "only if absent").
	fn delc<K, V>(&mut self, key: K, chk: Option<V>) -> impl Future<Output = Result<(), Error>>
	where
		K: Into<Key>,
		V: Into<Val>;
	/// Return up to `limit` key/value pairs in `rng`, in key order.
	fn scan<K>(&mut self, rng: Range<K>, limit: u32) -> impl Future<Output = Result<Vec<(Key, Val)>, Error>>
	where
		K: Into<Key>;
}
