//! The transactional core behind a multi-model document database: a
//! key-value abstraction, a catalog cache, a document engine with field
//! coercion/validation/indexing/permissions and diff-patch history, auth
//! state, and live subscriptions. The query-language surface (parser,
//! planner, SQL/ML function library) is out of scope — this crate is the
//! engine a query layer would sit on top of.
#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

#[doc(hidden)]
pub mod cnf;
#[doc(hidden)]
pub mod err;

pub mod types;

pub mod path;

pub mod expr;

pub mod catalog;

#[doc(hidden)]
pub mod cipher;

#[doc(hidden)]
pub mod key;

#[doc(hidden)]
pub mod kvs;

pub mod diff;

pub mod doc;

pub mod iam;

pub mod live;
