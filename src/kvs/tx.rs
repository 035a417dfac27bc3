//! The transaction façade (component 4) wraps a concrete KV transaction with
//! a per-transaction catalog cache (component 5). Every catalog kind gets the
//! same four operations: `all_*` lists a kind's family range, `get_*` looks
//! up one entry, `add_*` is an idempotent insert-only upsert, `del_*`
//! invalidates the cache slot (the caller does the actual cascading prefix
//! delete once it holds the definition).
use crate::catalog::{Database, Event, Field, Index, LiveQuery, Namespace, Scope, Table, Token, User};
use crate::err::Error;
use crate::key;
use crate::kvs::api::Transaction as _;
use crate::kvs::cache::{Cache, Entry};
use crate::kvs::mem;
use crate::kvs::{Check, Val};
use crate::types::Id;
use std::ops::Range;
use std::sync::Arc;
use uuid::Uuid;

fn encode<T: serde::Serialize>(val: &T) -> Result<Val, Error> {
	bincode::serialize(val).map_err(|e| Error::TxFailure(e.to_string()))
}

/// Exposed crate-wide so the document engine can decode the owner id stored
/// behind a unique-index entry without re-touching the KV store.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(val: &[u8]) -> Result<T, Error> {
	bincode::deserialize(val).map_err(|e| Error::TxFailure(e.to_string()))
}

#[non_exhaustive]
pub struct Tx {
	inner: mem::Transaction,
	cache: Cache,
}

impl Tx {
	pub(crate) fn new(inner: mem::Transaction) -> Self {
		Self {
			inner,
			cache: Cache::default(),
		}
	}

	pub fn check_level(&mut self, check: Check) {
		self.inner.check_level(check);
	}

	pub fn closed(&self) -> bool {
		self.inner.closed()
	}

	pub fn writeable(&self) -> bool {
		self.inner.writeable()
	}

	pub async fn cancel(&mut self) -> Result<(), Error> {
		self.inner.cancel().await
	}

	pub async fn commit(&mut self) -> Result<(), Error> {
		self.inner.commit().await
	}

	pub async fn get(&mut self, key: Vec<u8>) -> Result<Option<Val>, Error> {
		self.inner.get(key).await
	}

	pub async fn set(&mut self, key: Vec<u8>, val: Val) -> Result<(), Error> {
		self.inner.set(key, val).await
	}

	pub async fn put(&mut self, key: Vec<u8>, val: Val) -> Result<(), Error> {
		self.inner.put(key, val).await
	}

	pub async fn putc(&mut self, key: Vec<u8>, val: Val, chk: Option<Val>) -> Result<(), Error> {
		self.inner.putc(key, val, chk).await
	}

	pub async fn del(&mut self, key: Vec<u8>) -> Result<(), Error> {
		self.inner.del(key).await
	}

	pub async fn delc(&mut self, key: Vec<u8>, chk: Option<Val>) -> Result<(), Error> {
		self.inner.delc(key, chk).await
	}

	pub async fn scan(&mut self, rng: Range<Vec<u8>>, limit: u32) -> Result<Vec<(Vec<u8>, Val)>, Error> {
		self.inner.scan(rng, limit).await
	}

	async fn scan_all(&mut self, beg: Vec<u8>, end: Vec<u8>) -> Result<Vec<(Vec<u8>, Val)>, Error> {
		let mut out = Vec::new();
		let mut beg = beg;
		loop {
			let batch = self.scan(beg.clone()..end.clone(), 1000).await?;
			if batch.is_empty() {
				break;
			}
			beg = {
				let mut k = batch.last().unwrap().0.clone();
				k.push(0x00);
				k
			};
			out.extend(batch);
		}
		Ok(out)
	}
}

// -- Namespaces --

impl Tx {
	pub async fn all_ns(&mut self) -> Result<Arc<[Namespace]>, Error> {
		let key = key::namespace::ns_prefix();
		if let Some(Entry::Nss(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::namespace::ns_prefix(), key::namespace::ns_suffix()).await?;
		let out: Vec<Namespace> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[Namespace]> = Arc::from(out);
		self.cache.set(key, Entry::Nss(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_ns(&mut self, ns: &str) -> Result<Arc<Namespace>, Error> {
		let key = key::namespace::Ns::new(ns).encode()?;
		if let Some(Entry::Ns(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "namespace",
			name: ns.to_owned(),
		})?;
		let val: Arc<Namespace> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Ns(Arc::clone(&val)));
		Ok(val)
	}

	/// Idempotent insert-only upsert. `PutC(key, val, nil)` — a racing
	/// inserter that loses the CAS re-reads and returns what won instead of
	/// erroring.
	pub async fn add_ns(&mut self, ns: &str) -> Result<Arc<Namespace>, Error> {
		if let Ok(existing) = self.get_ns(ns).await {
			return Ok(existing);
		}
		let key = key::namespace::Ns::new(ns).encode()?;
		let def = Namespace {
			name: ns.to_owned(),
			comment: None,
		};
		match self.put(key.clone(), encode(&def)?).await {
			Ok(()) => {
				let val = Arc::new(def);
				self.cache.set(key, Entry::Ns(Arc::clone(&val)));
				Ok(val)
			}
			Err(_) => self.get_ns(ns).await,
		}
	}

	pub async fn del_ns(&mut self, ns: &str) -> Result<(), Error> {
		let key = key::namespace::Ns::new(ns).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::namespace::ns_prefix());
		Ok(())
	}
}

// -- Databases --

impl Tx {
	pub async fn all_db(&mut self, ns: &str) -> Result<Arc<[Database]>, Error> {
		let key = key::database::db_prefix(ns);
		if let Some(Entry::Dbs(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::database::db_prefix(ns), key::database::db_suffix(ns)).await?;
		let out: Vec<Database> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[Database]> = Arc::from(out);
		self.cache.set(key, Entry::Dbs(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_db(&mut self, ns: &str, db: &str) -> Result<Arc<Database>, Error> {
		let key = key::database::Db::new(ns, db).encode()?;
		if let Some(Entry::Db(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "database",
			name: db.to_owned(),
		})?;
		let val: Arc<Database> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Db(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_db(&mut self, ns: &str, db: &str) -> Result<Arc<Database>, Error> {
		self.add_ns(ns).await?;
		if let Ok(existing) = self.get_db(ns, db).await {
			return Ok(existing);
		}
		let key = key::database::Db::new(ns, db).encode()?;
		let def = Database {
			name: db.to_owned(),
			comment: None,
		};
		match self.put(key.clone(), encode(&def)?).await {
			Ok(()) => {
				let val = Arc::new(def);
				self.cache.set(key, Entry::Db(Arc::clone(&val)));
				Ok(val)
			}
			Err(_) => self.get_db(ns, db).await,
		}
	}

	pub async fn del_db(&mut self, ns: &str, db: &str) -> Result<(), Error> {
		let key = key::database::Db::new(ns, db).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::database::db_prefix(ns));
		Ok(())
	}
}

// -- Scopes --

impl Tx {
	pub async fn all_sc(&mut self, ns: &str, db: &str) -> Result<Arc<[Scope]>, Error> {
		let key = key::scope::sc_prefix(ns, db);
		if let Some(Entry::Scs(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::scope::sc_prefix(ns, db), key::scope::sc_suffix(ns, db)).await?;
		let out: Vec<Scope> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[Scope]> = Arc::from(out);
		self.cache.set(key, Entry::Scs(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_sc(&mut self, ns: &str, db: &str, sc: &str) -> Result<Arc<Scope>, Error> {
		let key = key::scope::Sc::new(ns, db, sc).encode()?;
		if let Some(Entry::Sc(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "scope",
			name: sc.to_owned(),
		})?;
		let val: Arc<Scope> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Sc(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_sc(&mut self, ns: &str, db: &str, def: Scope) -> Result<Arc<Scope>, Error> {
		self.add_db(ns, db).await?;
		if let Ok(existing) = self.get_sc(ns, db, &def.name).await {
			return Ok(existing);
		}
		let name = def.name.clone();
		let key = key::scope::Sc::new(ns, db, &name).encode()?;
		match self.put(key.clone(), encode(&def)?).await {
			Ok(()) => {
				let val = Arc::new(def);
				self.cache.set(key, Entry::Sc(Arc::clone(&val)));
				Ok(val)
			}
			Err(_) => self.get_sc(ns, db, &name).await,
		}
	}

	pub async fn del_sc(&mut self, ns: &str, db: &str, sc: &str) -> Result<(), Error> {
		let key = key::scope::Sc::new(ns, db, sc).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::scope::sc_prefix(ns, db));
		Ok(())
	}
}

// -- Tables --

impl Tx {
	pub async fn all_tb(&mut self, ns: &str, db: &str) -> Result<Arc<[Table]>, Error> {
		let key = key::table::tb_prefix(ns, db);
		if let Some(Entry::Tbs(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::table::tb_prefix(ns, db), key::table::tb_suffix(ns, db)).await?;
		let out: Vec<Table> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[Table]> = Arc::from(out);
		self.cache.set(key, Entry::Tbs(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_tb(&mut self, ns: &str, db: &str, tb: &str) -> Result<Arc<Table>, Error> {
		let key = key::table::Tb::new(ns, db, tb).encode()?;
		if let Some(Entry::Tb(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "table",
			name: tb.to_owned(),
		})?;
		let val: Arc<Table> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Tb(Arc::clone(&val)));
		Ok(val)
	}

	/// Adds the table if absent, using `def` as the definition to insert.
	/// Unlike the other `add_*` helpers this takes the full definition since
	/// a table's schemafull/permissions are meaningful on first creation.
	pub async fn add_tb(&mut self, ns: &str, db: &str, def: Table) -> Result<Arc<Table>, Error> {
		self.add_db(ns, db).await?;
		if let Ok(existing) = self.get_tb(ns, db, &def.name).await {
			return Ok(existing);
		}
		let key = key::table::Tb::new(ns, db, &def.name).encode()?;
		match self.put(key.clone(), encode(&def)?).await {
			Ok(()) => {
				let val = Arc::new(def);
				self.cache.set(key, Entry::Tb(Arc::clone(&val)));
				Ok(val)
			}
			Err(_) => {
				let name = def.name.clone();
				self.get_tb(ns, db, &name).await
			}
		}
	}

	pub async fn del_tb(&mut self, ns: &str, db: &str, tb: &str) -> Result<(), Error> {
		let key = key::table::Tb::new(ns, db, tb).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::table::tb_prefix(ns, db));
		Ok(())
	}
}

// -- Fields, indexes, events, views, live queries --

impl Tx {
	pub async fn all_fd(&mut self, ns: &str, db: &str, tb: &str) -> Result<Arc<[Field]>, Error> {
		let key = key::table::Fd::prefix(ns, db, tb);
		if let Some(Entry::Fds(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::table::Fd::prefix(ns, db, tb), key::table::Fd::suffix(ns, db, tb)).await?;
		let out: Vec<Field> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[Field]> = Arc::from(out);
		self.cache.set(key, Entry::Fds(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_fd(&mut self, ns: &str, db: &str, tb: &str, fd: &str) -> Result<Arc<Field>, Error> {
		let key = key::table::Fd::new(ns, db, tb, fd).encode()?;
		if let Some(Entry::Fd(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "field",
			name: fd.to_owned(),
		})?;
		let val: Arc<Field> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Fd(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_fd(&mut self, ns: &str, db: &str, tb: &str, def: Field) -> Result<Arc<Field>, Error> {
		let key = key::table::Fd::new(ns, db, tb, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Fd(Arc::clone(&val)));
		self.cache.del(&key::table::Fd::prefix(ns, db, tb));
		Ok(val)
	}

	pub async fn del_fd(&mut self, ns: &str, db: &str, tb: &str, fd: &str) -> Result<(), Error> {
		let key = key::table::Fd::new(ns, db, tb, fd).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::table::Fd::prefix(ns, db, tb));
		Ok(())
	}

	pub async fn all_ix(&mut self, ns: &str, db: &str, tb: &str) -> Result<Arc<[Index]>, Error> {
		let key = key::table::Ix::prefix(ns, db, tb);
		if let Some(Entry::Ixs(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::table::Ix::prefix(ns, db, tb), key::table::Ix::suffix(ns, db, tb)).await?;
		let out: Vec<Index> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[Index]> = Arc::from(out);
		self.cache.set(key, Entry::Ixs(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_ix(&mut self, ns: &str, db: &str, tb: &str, ix: &str) -> Result<Arc<Index>, Error> {
		let key = key::table::Ix::new(ns, db, tb, ix).encode()?;
		if let Some(Entry::Ix(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "index",
			name: ix.to_owned(),
		})?;
		let val: Arc<Index> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Ix(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_ix(&mut self, ns: &str, db: &str, tb: &str, def: Index) -> Result<Arc<Index>, Error> {
		let key = key::table::Ix::new(ns, db, tb, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Ix(Arc::clone(&val)));
		self.cache.del(&key::table::Ix::prefix(ns, db, tb));
		Ok(val)
	}

	pub async fn del_ix(&mut self, ns: &str, db: &str, tb: &str, ix: &str) -> Result<(), Error> {
		let key = key::table::Ix::new(ns, db, tb, ix).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::table::Ix::prefix(ns, db, tb));
		Ok(())
	}

	pub async fn all_ev(&mut self, ns: &str, db: &str, tb: &str) -> Result<Arc<[Event]>, Error> {
		let key = key::table::Ev::prefix(ns, db, tb);
		if let Some(Entry::Evs(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::table::Ev::prefix(ns, db, tb), key::table::Ev::suffix(ns, db, tb)).await?;
		let out: Vec<Event> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[Event]> = Arc::from(out);
		self.cache.set(key, Entry::Evs(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_ev(&mut self, ns: &str, db: &str, tb: &str, ev: &str) -> Result<Arc<Event>, Error> {
		let key = key::table::Ev::new(ns, db, tb, ev).encode()?;
		if let Some(Entry::Ev(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "event",
			name: ev.to_owned(),
		})?;
		let val: Arc<Event> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Ev(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_ev(&mut self, ns: &str, db: &str, tb: &str, def: Event) -> Result<Arc<Event>, Error> {
		let key = key::table::Ev::new(ns, db, tb, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Ev(Arc::clone(&val)));
		self.cache.del(&key::table::Ev::prefix(ns, db, tb));
		Ok(val)
	}

	pub async fn del_ev(&mut self, ns: &str, db: &str, tb: &str, ev: &str) -> Result<(), Error> {
		let key = key::table::Ev::new(ns, db, tb, ev).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::table::Ev::prefix(ns, db, tb));
		Ok(())
	}

	pub async fn all_lv(&mut self, ns: &str, db: &str, tb: &str) -> Result<Arc<[LiveQuery]>, Error> {
		let key = key::table::lv_prefix(ns, db, tb);
		if let Some(Entry::Lvs(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let rows = self.scan_all(key::table::lv_prefix(ns, db, tb), key::table::lv_suffix(ns, db, tb)).await?;
		let out: Vec<LiveQuery> = rows.iter().map(|(_, v)| decode(v)).collect::<Result<_, _>>()?;
		let out: Arc<[LiveQuery]> = Arc::from(out);
		self.cache.set(key, Entry::Lvs(Arc::clone(&out)));
		Ok(out)
	}

	pub async fn get_lv(&mut self, ns: &str, db: &str, tb: &str, lv: Uuid) -> Result<Arc<LiveQuery>, Error> {
		let key = key::table::Lv::new(ns, db, tb, lv).encode()?;
		if let Some(Entry::Lv(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "live query",
			name: lv.to_string(),
		})?;
		let val: Arc<LiveQuery> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Lv(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_lv(&mut self, ns: &str, db: &str, tb: &str, def: LiveQuery) -> Result<Arc<LiveQuery>, Error> {
		let key = key::table::Lv::new(ns, db, tb, def.id).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Lv(Arc::clone(&val)));
		self.cache.del(&key::table::lv_prefix(ns, db, tb));
		Ok(val)
	}

	pub async fn del_lv(&mut self, ns: &str, db: &str, tb: &str, lv: Uuid) -> Result<(), Error> {
		let key = key::table::Lv::new(ns, db, tb, lv).encode()?;
		self.cache.del(&key);
		self.cache.del(&key::table::lv_prefix(ns, db, tb));
		Ok(())
	}
}

// -- Users and tokens --

impl Tx {
	pub async fn get_nu(&mut self, ns: &str, us: &str) -> Result<Arc<User>, Error> {
		let key = key::namespace::Nu::new(ns, us).encode()?;
		if let Some(Entry::Nu(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "user",
			name: us.to_owned(),
		})?;
		let val: Arc<User> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Nu(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_nu(&mut self, ns: &str, def: User) -> Result<Arc<User>, Error> {
		let key = key::namespace::Nu::new(ns, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Nu(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn get_du(&mut self, ns: &str, db: &str, us: &str) -> Result<Arc<User>, Error> {
		let key = key::database::Du::new(ns, db, us).encode()?;
		if let Some(Entry::Du(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "user",
			name: us.to_owned(),
		})?;
		let val: Arc<User> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Du(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_du(&mut self, ns: &str, db: &str, def: User) -> Result<Arc<User>, Error> {
		let key = key::database::Du::new(ns, db, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Du(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn get_nt(&mut self, ns: &str, tk: &str) -> Result<Arc<Token>, Error> {
		let key = key::namespace::Nt::new(ns, tk).encode()?;
		if let Some(Entry::Nt(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "token",
			name: tk.to_owned(),
		})?;
		let val: Arc<Token> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Nt(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_nt(&mut self, ns: &str, def: Token) -> Result<Arc<Token>, Error> {
		let key = key::namespace::Nt::new(ns, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Nt(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn get_dt(&mut self, ns: &str, db: &str, tk: &str) -> Result<Arc<Token>, Error> {
		let key = key::database::Dt::new(ns, db, tk).encode()?;
		if let Some(Entry::Dt(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "token",
			name: tk.to_owned(),
		})?;
		let val: Arc<Token> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::Dt(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_dt(&mut self, ns: &str, db: &str, def: Token) -> Result<Arc<Token>, Error> {
		let key = key::database::Dt::new(ns, db, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::Dt(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn get_st(&mut self, ns: &str, db: &str, sc: &str, tk: &str) -> Result<Arc<Token>, Error> {
		let key = key::scope::St::new(ns, db, sc, tk).encode()?;
		if let Some(Entry::St(v)) = self.cache.get(&key) {
			return Ok(v);
		}
		let val = self.get(key.clone()).await?.ok_or_else(|| Error::NotFound {
			kind: "token",
			name: tk.to_owned(),
		})?;
		let val: Arc<Token> = Arc::new(decode(&val)?);
		self.cache.set(key, Entry::St(Arc::clone(&val)));
		Ok(val)
	}

	pub async fn add_st(&mut self, ns: &str, db: &str, sc: &str, def: Token) -> Result<Arc<Token>, Error> {
		let key = key::scope::St::new(ns, db, sc, &def.name).encode()?;
		self.put(key.clone(), encode(&def)?).await?;
		let val = Arc::new(def);
		self.cache.set(key, Entry::St(Arc::clone(&val)));
		Ok(val)
	}
}

// -- Records, index entries, and patch history --
//
// These don't go through the cache: a document engine reads and writes a
// record at most once or twice per transaction, so memoising it buys
// nothing and would only risk staleness against the engine's own writes.

impl Tx {
	pub async fn get_record(&mut self, ns: &str, db: &str, tb: &str, id: Id) -> Result<Option<Val>, Error> {
		let key = key::thing::Thing::new(ns, db, tb, id).encode()?;
		self.get(key).await
	}

	pub async fn set_record(&mut self, ns: &str, db: &str, tb: &str, id: Id, val: Val) -> Result<(), Error> {
		let key = key::thing::Thing::new(ns, db, tb, id).encode()?;
		self.set(key, val).await
	}

	pub async fn del_record(&mut self, ns: &str, db: &str, tb: &str, id: Id) -> Result<(), Error> {
		let key = key::thing::Thing::new(ns, db, tb, id).encode()?;
		self.del(key).await
	}

	pub async fn scan_records(&mut self, ns: &str, db: &str, tb: &str, limit: u32) -> Result<Vec<(Vec<u8>, Val)>, Error> {
		let rng = key::thing::Thing::prefix(ns, db, tb)..key::thing::Thing::suffix(ns, db, tb);
		self.scan(rng, limit).await
	}

	/// Inserts a unique-index entry for `fd` pointing at `id`, failing with
	/// [`Error::Duplicate`] if the tuple is already claimed by another row.
	pub async fn put_unique_index(
		&mut self,
		ns: &str,
		db: &str,
		tb: &str,
		ix: &str,
		fd: &crate::types::Array,
		id: &Id,
	) -> Result<(), Error> {
		let key = key::index::Unique::new(ns, db, tb, ix, fd).encode()?;
		let val = encode(id)?;
		self.put(key, val).await.map_err(|e| match e {
			Error::TxFailure(_) => Error::Duplicate {
				index: ix.to_owned(),
				value: format!("{fd}"),
			},
			other => other,
		})
	}

	pub async fn del_unique_index(&mut self, ns: &str, db: &str, tb: &str, ix: &str, fd: &crate::types::Array) -> Result<(), Error> {
		let key = key::index::Unique::new(ns, db, tb, ix, fd).encode()?;
		self.del(key).await
	}

	pub async fn put_point_index(
		&mut self,
		ns: &str,
		db: &str,
		tb: &str,
		ix: &str,
		fd: &crate::types::Array,
		id: Id,
	) -> Result<(), Error> {
		let key = key::index::Point::new(ns, db, tb, ix, fd, id).encode()?;
		self.set(key, Vec::new()).await
	}

	pub async fn del_point_index(&mut self, ns: &str, db: &str, tb: &str, ix: &str, fd: &crate::types::Array, id: Id) -> Result<(), Error> {
		let key = key::index::Point::new(ns, db, tb, ix, fd, id).encode()?;
		self.del(key).await
	}

	pub async fn put_patch(&mut self, ns: &str, db: &str, tb: &str, id: Id, version: u64, ops: Val) -> Result<(), Error> {
		let key = key::patch::Patch::new(ns, db, tb, id, version).encode()?;
		self.set(key, ops).await
	}

	pub async fn scan_patches(&mut self, ns: &str, db: &str, tb: &str, id: Id) -> Result<Vec<(Vec<u8>, Val)>, Error> {
		let rng = key::patch::Patch::prefix(ns, db, tb, id.clone())..key::patch::Patch::suffix(ns, db, tb, id);
		self.scan(rng, u32::MAX).await
	}

	/// `DelR(Patch.startOfTime, Patch.endOfTime)` (spec §4.4.5): drop a
	/// thing's whole patch history. No backend range-delete primitive exists
	/// (component 2's `Transaction` trait is scan/get/set/del only), so this
	/// scans the range and deletes each entry in turn.
	pub async fn del_patches(&mut self, ns: &str, db: &str, tb: &str, id: Id) -> Result<(), Error> {
		let rng = key::patch::Patch::prefix(ns, db, tb, id.clone())..key::patch::Patch::suffix(ns, db, tb, id);
		let entries = self.scan(rng, u32::MAX).await?;
		for (key, _) in entries {
			self.del(key).await?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod patch_tests {
	use super::*;
	use crate::kvs::mem;

	async fn tx() -> Tx {
		let ds = mem::Datastore::new().await.unwrap();
		Tx::new(ds.transaction(true).await.unwrap())
	}

	#[tokio::test]
	async fn del_patches_removes_the_whole_range() {
		let mut tx = tx().await;
		tx.put_patch("n", "d", "t", Id::from("r"), 1, b"a".to_vec()).await.unwrap();
		tx.put_patch("n", "d", "t", Id::from("r"), 2, b"b".to_vec()).await.unwrap();
		tx.put_patch("n", "d", "t", Id::from("other"), 1, b"c".to_vec()).await.unwrap();

		tx.del_patches("n", "d", "t", Id::from("r")).await.unwrap();

		assert!(tx.scan_patches("n", "d", "t", Id::from("r")).await.unwrap().is_empty());
		assert_eq!(tx.scan_patches("n", "d", "t", Id::from("other")).await.unwrap().len(), 1);
	}
}
