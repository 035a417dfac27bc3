//! The top-level datastore: opens transactions against whichever backend is
//! compiled in. Only the in-memory `kv-mem` backend is carried forward here
//! (the teacher's RocksDB/TiKV/FoundationDB/SurrealKV backends are out of
//! scope for an embedded transactional core); the enum-dispatch shape is
//! kept so a second backend slots in the same way the teacher's does.
use crate::err::Error;
use crate::kvs::tx::Tx;

#[non_exhaustive]
pub enum Datastore {
	#[cfg(feature = "kv-mem")]
	Mem(super::mem::Datastore),
}

impl Datastore {
	/// Open a new datastore at `path`. Only `mem://` is currently
	/// implemented; see [`crate::cnf`] for how a connection string is
	/// parsed.
	pub async fn new(path: &str) -> Result<Datastore, Error> {
		match path {
			"memory" | "mem://" => {
				#[cfg(feature = "kv-mem")]
				{
					Ok(Datastore::Mem(super::mem::Datastore::new().await?))
				}
				#[cfg(not(feature = "kv-mem"))]
				Err(Error::StoreUnavailable("the kv-mem backend is not compiled in".into()))
			}
			_ => Err(Error::StoreUnavailable(format!("unsupported backend uri '{path}'"))),
		}
	}

	/// Start a new transaction. `write` opens it for writing; `lock`
	/// requests pessimistic locking where the backend supports it (the
	/// in-memory backend is always optimistic and ignores it).
	pub async fn transaction(&self, write: bool, _lock: bool) -> Result<Tx, Error> {
		match self {
			#[cfg(feature = "kv-mem")]
			Datastore::Mem(ds) => Ok(Tx::new(ds.transaction(write).await?)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn open_mem_and_transact() {
		let ds = Datastore::new("memory").await.unwrap();
		let mut tx = ds.transaction(true, false).await.unwrap();
		let ns = tx.add_ns("test").await.unwrap();
		assert_eq!(ns.name, "test");
		tx.commit().await.unwrap();
	}
}
