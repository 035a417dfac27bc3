//! The key-value abstraction (component 2), the catalog cache (component 5)
//! and the per-transaction façade that ties them together (component 4).

pub mod api;
pub mod cache;
pub mod ds;
pub mod mem;
pub mod tx;

pub use api::Transaction;
pub use ds::Datastore;
pub use tx::Tx;

/// A raw, already key-codec-encoded key.
pub type Key = Vec<u8>;
/// A raw, already record-codec-encoded value.
pub type Val = Vec<u8>;

/// What to do if a write transaction is dropped without being committed or
/// cancelled. Debug builds panic loudly; release builds only warn, since a
/// caller forgetting to close a transaction is a bug worth surfacing during
/// development but not worth crashing a server over.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Check {
	None,
	Warn,
	Panic,
}

impl Default for Check {
	fn default() -> Self {
		if cfg!(debug_assertions) {
			Check::Panic
		} else {
			Check::Warn
		}
	}
}
