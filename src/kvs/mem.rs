#![cfg(feature = "kv-mem")]
//! The in-memory backend, an `echodb`-backed `Transaction` impl. `echodb`
//! gives us MVCC snapshot isolation and the `PutC`/`DelC` CAS primitives for
//! free; this module just adapts its API to ours and adds the
//! unclosed-transaction `Drop` guard (§2's "readers never block writers").
use crate::err::Error;
use crate::kvs::{Check, Key, Val};
use std::ops::Range;
use tracing::{instrument, trace, warn};

#[non_exhaustive]
pub struct Datastore {
	db: echodb::Db<Key, Val>,
}

#[non_exhaustive]
pub struct Transaction {
	done: bool,
	write: bool,
	check: Check,
	inner: echodb::Tx<Key, Val>,
}

impl Drop for Transaction {
	fn drop(&mut self) {
		if !self.done && self.write && !std::thread::panicking() {
			match self.check {
				Check::None => trace!("a transaction was dropped without being committed or cancelled"),
				Check::Warn => warn!("a transaction was dropped without being committed or cancelled"),
				Check::Panic => panic!("a transaction was dropped without being committed or cancelled"),
			}
		}
	}
}

impl Datastore {
	pub async fn new() -> Result<Datastore, Error> {
		Ok(Datastore {
			db: echodb::db::new(),
		})
	}

	pub async fn transaction(&self, write: bool) -> Result<Transaction, Error> {
		let inner = self.db.begin(write).await.map_err(|e| Error::StoreUnavailable(e.to_string()))?;
		Ok(Transaction {
			done: false,
			write,
			check: Check::default(),
			inner,
		})
	}
}

impl super::api::Transaction for Transaction {
	fn check_level(&mut self, check: Check) {
		self.check = check;
	}

	fn closed(&self) -> bool {
		self.done
	}

	fn writeable(&self) -> bool {
		self.write
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self))]
	async fn cancel(&mut self) -> Result<(), Error> {
		if self.done {
			return Err(Error::TxFinished);
		}
		self.done = true;
		self.inner.cancel().map_err(|e| Error::TxFailure(e.to_string()))
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self))]
	async fn commit(&mut self) -> Result<(), Error> {
		if self.done {
			return Err(Error::TxFinished);
		}
		if !self.write {
			return Err(Error::TxReadonly);
		}
		self.done = true;
		self.inner.commit().map_err(|e| Error::TxFailure(e.to_string()))
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, key), fields(key_len = key.into().len()))]
	async fn exists<K>(&mut self, key: K) -> Result<bool, Error>
	where
		K: Into<Key>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		self.inner.exi(key.into()).map_err(|e| Error::TxFailure(e.to_string()))
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, key))]
	async fn get<K>(&mut self, key: K) -> Result<Option<Val>, Error>
	where
		K: Into<Key>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		self.inner.get(key.into()).map_err(|e| Error::TxFailure(e.to_string()))
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, key, val))]
	async fn set<K, V>(&mut self, key: K, val: V) -> Result<(), Error>
	where
		K: Into<Key>,
		V: Into<Val>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		if !self.write {
			return Err(Error::TxReadonly);
		}
		self.inner.set(key.into(), val.into()).map_err(|e| Error::TxFailure(e.to_string()))
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, key, val))]
	async fn put<K, V>(&mut self, key: K, val: V) -> Result<(), Error>
	where
		K: Into<Key>,
		V: Into<Val>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		if !self.write {
			return Err(Error::TxReadonly);
		}
		self.inner.put(key.into(), val.into()).map_err(|e| Error::TxFailure(e.to_string()))
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, key, val, chk))]
	async fn putc<K, V>(&mut self, key: K, val: V, chk: Option<V>) -> Result<(), Error>
	where
		K: Into<Key>,
		V: Into<Val>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		if !self.write {
			return Err(Error::TxReadonly);
		}
		self.inner.putc(key.into(), val.into(), chk.map(Into::into)).map_err(|_| Error::Condition)
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, key))]
	async fn del<K>(&mut self, key: K) -> Result<(), Error>
	where
		K: Into<Key>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		if !self.write {
			return Err(Error::TxReadonly);
		}
		self.inner.del(key.into()).map_err(|e| Error::TxFailure(e.to_string()))
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, key, chk))]
	async fn delc<K, V>(&mut self, key: K, chk: Option<V>) -> Result<(), Error>
	where
		K: Into<Key>,
		V: Into<Val>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		if !self.write {
			return Err(Error::TxReadonly);
		}
		self.inner.delc(key.into(), chk.map(Into::into)).map_err(|_| Error::Condition)
	}

	#[instrument(level = "trace", target = "surreal_core::kvs::mem", skip(self, rng))]
	async fn scan<K>(&mut self, rng: Range<K>, limit: u32) -> Result<Vec<(Key, Val)>, Error>
	where
		K: Into<Key>,
	{
		if self.done {
			return Err(Error::TxFinished);
		}
		let rng = Range {
			start: rng.start.into(),
			end: rng.end.into(),
		};
		self.inner.scan(rng, limit as usize).map_err(|e| Error::TxFailure(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::kvs::Transaction as _;

	#[tokio::test]
	async fn put_then_get() {
		let ds = Datastore::new().await.unwrap();
		let mut tx = ds.transaction(true).await.unwrap();
		tx.put(b"a".to_vec(), b"1".to_vec()).await.unwrap();
		tx.commit().await.unwrap();

		let mut tx = ds.transaction(false).await.unwrap();
		assert_eq!(tx.get(b"a".to_vec()).await.unwrap(), Some(b"1".to_vec()));
	}

	#[tokio::test]
	async fn put_twice_fails() {
		let ds = Datastore::new().await.unwrap();
		let mut tx = ds.transaction(true).await.unwrap();
		tx.put(b"a".to_vec(), b"1".to_vec()).await.unwrap();
		assert!(tx.put(b"a".to_vec(), b"2".to_vec()).await.is_err());
		tx.cancel().await.unwrap();
	}

	#[tokio::test]
	async fn conditional_delete_checks_value() {
		let ds = Datastore::new().await.unwrap();
		let mut tx = ds.transaction(true).await.unwrap();
		tx.set(b"a".to_vec(), b"1".to_vec()).await.unwrap();
		assert!(tx.delc(b"a".to_vec(), Some(b"2".to_vec())).await.is_err());
		tx.delc(b"a".to_vec(), Some(b"1".to_vec())).await.unwrap();
		tx.commit().await.unwrap();
	}
}
