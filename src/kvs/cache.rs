//! The catalog cache (component 5): avoids re-decoding a namespace, database,
//! table or field definition on every document operation within a
//! transaction. Entries are cheap to clone (`Arc`) so a cached lookup can be
//! handed out without re-touching the KV store.
use crate::catalog::{Database, Event, Field, Index, LiveQuery, Namespace, Scope, Table, Token, User};
use crate::kvs::Key;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
#[non_exhaustive]
pub enum Entry {
	// Single definitions
	Ns(Arc<Namespace>),
	Db(Arc<Database>),
	Sc(Arc<Scope>),
	Tb(Arc<Table>),
	Fd(Arc<Field>),
	Ix(Arc<Index>),
	Ev(Arc<Event>),
	Lv(Arc<LiveQuery>),
	Nu(Arc<User>),
	Du(Arc<User>),
	Nt(Arc<Token>),
	Dt(Arc<Token>),
	St(Arc<Token>),
	// Multi definitions, for listing all children of a key prefix
	Nss(Arc<[Namespace]>),
	Dbs(Arc<[Database]>),
	Scs(Arc<[Scope]>),
	Tbs(Arc<[Table]>),
	Fds(Arc<[Field]>),
	Ixs(Arc<[Index]>),
	Evs(Arc<[Event]>),
	Lvs(Arc<[LiveQuery]>),
}

#[derive(Default)]
#[non_exhaustive]
pub struct Cache(pub HashMap<Key, Entry>);

impl Cache {
	pub fn set(&mut self, key: Key, val: Entry) {
		self.0.insert(key, val);
	}

	pub fn get(&mut self, key: &Key) -> Option<Entry> {
		self.0.get(key).cloned()
	}

	pub fn del(&mut self, key: &Key) -> Option<Entry> {
		self.0.remove(key)
	}

	pub fn clear(&mut self) {
		self.0.clear()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_get_del() {
		let mut cache = Cache::default();
		let ns = Arc::new(Namespace {
			name: "test".into(),
			comment: None,
		});
		cache.set(b"k".to_vec(), Entry::Ns(ns));
		assert!(matches!(cache.get(&b"k".to_vec()), Some(Entry::Ns(_))));
		assert!(cache.del(&b"k".to_vec()).is_some());
		assert!(cache.get(&b"k".to_vec()).is_none());
	}
}
