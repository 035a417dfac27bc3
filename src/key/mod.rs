//! How keys are structured in the key value store (component 1/5's byte-order
//! encoding, spec §3.2). Each family is a fixed-shape struct tagged with
//! single-byte markers between its fields so that lexicographic byte order on
//! the encoded key matches the logical nesting order — `echodb`'s range scans
//! rely on that to enumerate "everything under this table" as one contiguous
//! slice.
//!
//! ```text
//! key::namespace::Ns                /!ns{ns}
//! key::namespace::all                /*{ns}
//! key::namespace::Nt                /*{ns}!tk{tk}
//! key::namespace::Nu                /*{ns}!us{us}
//! key::database::Db                 /*{ns}!db{db}
//! key::database::all                /*{ns}*{db}
//! key::database::Dt                 /*{ns}*{db}!tk{tk}
//! key::database::Du                 /*{ns}*{db}!us{us}
//! key::scope::Sc                    /*{ns}*{db}!sc{sc}
//! key::scope::all                   /*{ns}*{db}\xb1{sc}
//! key::scope::St                    /*{ns}*{db}\xb1{sc}!tk{tk}
//! key::table::Tb                    /*{ns}*{db}!tb{tb}
//! key::table::all                   /*{ns}*{db}*{tb}
//! key::table::Fd                    /*{ns}*{db}*{tb}!fd{fd}
//! key::table::Ix                    /*{ns}*{db}*{tb}!ix{ix}
//! key::table::Ev                    /*{ns}*{db}*{tb}!ev{ev}
//! key::table::Ft                    /*{ns}*{db}*{tb}!ft{ft}
//! key::table::Lv                    /*{ns}*{db}*{tb}!lv{lv}
//! key::thing::Thing                 /*{ns}*{db}*{tb}*{id}
//! key::index::Unique                /*{ns}*{db}*{tb}+{ix}*{fd}
//! key::index::Point                 /*{ns}*{db}*{tb}+{ix}*{fd}{id}
//! key::patch::Patch                 /*{ns}*{db}*{tb}*{id}#{version}
//! ```

pub mod category;
pub mod database;
pub mod index;
pub mod namespace;
pub mod patch;
pub mod scope;
pub mod table;
pub mod thing;

/// Byte appended after a tag to open a half-open range's lower bound.
pub(crate) const MIN: u8 = 0x00;
/// Byte appended after a tag to close a half-open range's upper bound.
pub(crate) const MAX: u8 = 0xff;
/// Sigil separating a database from its scopes, matching the teacher's own
/// choice of a non-ASCII byte so a scope key can never collide with a table
/// key under the same database.
pub(crate) const SCOPE_SIGIL: u8 = 0xb1;
