//! Catalog entity types (component 5): the definitions `DEFINE ...`
//! statements would produce, stored as the values behind the [`crate::key`]
//! families of the same name. The statement parser that builds these is out
//! of scope (spec Non-goals); callers construct them directly.
use crate::expr::Expr;
use crate::types::{Kind, Number, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Namespace {
	pub name: String,
	pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Database {
	pub name: String,
	pub comment: Option<String>,
}

/// A `DEFINE TABLE` entry (spec §4.2). `schemafull` gates whether fields
/// outside the defined set are rejected by the document engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Table {
	pub name: String,
	pub schemafull: bool,
	/// Whether a commit on this table writes patch history (spec §4.4.5:
	/// "if history is enabled for the table"). `false` skips `put_patch`
	/// entirely rather than writing and immediately orphaning it.
	pub changefeed: bool,
	pub permissions: Permissions,
	pub comment: Option<String>,
}

/// The four CRUD rules a table or field can carry (spec §4.4.7). `None`
/// means "always allowed"; `Some(expr)` is evaluated against the auth/doc
/// bindings and must be truthy.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Permissions {
	#[serde(skip)]
	pub select: Option<Expr>,
	#[serde(skip)]
	pub create: Option<Expr>,
	#[serde(skip)]
	pub update: Option<Expr>,
	#[serde(skip)]
	pub delete: Option<Expr>,
}

/// A `DEFINE FIELD` entry (spec §4.4.3's nine-step enforcement pipeline).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Field {
	pub name: String,
	pub what: String,
	pub kind: Option<Kind>,
	#[serde(skip)]
	pub default: Option<Expr>,
	#[serde(skip)]
	pub assert: Option<Expr>,
	pub readonly: bool,
	pub mandatory: bool,
	pub notnull: bool,
	/// Embedded-script body (spec §4.4.3 step 2). No script evaluator is
	/// implemented here (spec §9 models it as an opaque capability a native
	/// engine may refuse); a field carrying one always fails enforcement
	/// with [`crate::err::Error::ScriptingDisabled`].
	pub code: Option<String>,
	/// A regex the stringified value must match (spec §4.4.3 step 7).
	pub match_regex: Option<String>,
	/// Range bounds checked against numbers, string length and array item
	/// count alike (spec §4.4.3 step 8).
	pub min: Option<Number>,
	pub max: Option<Number>,
	/// Whether a coercion or match failure (steps 6-7) aborts the write.
	/// `true` errors as usual; `false` restores the field's pre-merge value
	/// instead, letting the rest of the document commit.
	pub validate: bool,
	pub permissions: Permissions,
	pub comment: Option<String>,
}

/// A `DEFINE INDEX` entry (spec §4.4.4).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Index {
	pub name: String,
	pub what: String,
	/// The field paths, in order, whose values form the indexed tuple.
	pub cols: Vec<String>,
	pub unique: bool,
	pub comment: Option<String>,
}

/// A `DEFINE EVENT` entry: runs `then` whenever `when` is truthy after a
/// write.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Event {
	pub name: String,
	pub what: String,
	#[serde(skip)]
	pub when: Option<Expr>,
	#[serde(skip)]
	pub then: Vec<Expr>,
	pub comment: Option<String>,
}

/// A `LIVE SELECT` subscription (component 10).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct LiveQuery {
	pub id: uuid::Uuid,
	pub ns: String,
	pub db: String,
	pub tb: String,
	pub session_id: uuid::Uuid,
	#[serde(skip)]
	pub cond: Option<Expr>,
}

/// A `DEFINE SCOPE` entry (spec §6): SIGNIN/SIGNUP are evaluated against the
/// variables bound at login time and must resolve to a `Thing` to succeed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Scope {
	pub name: String,
	#[serde(skip)]
	pub signin: Option<Expr>,
	#[serde(skip)]
	pub signup: Option<Expr>,
	pub session_duration_secs: u64,
}

/// A `DEFINE TOKEN` entry: verifies inbound JWTs at the namespace, database
/// or scope level.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Token {
	pub name: String,
	pub algorithm: String,
	pub secret: Vec<u8>,
}

/// A `DEFINE USER` entry: a root/namespace/database login with a bcrypt
/// password hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct User {
	pub name: String,
	pub hash: String,
	pub roles: Vec<String>,
}

/// The merged set of field definitions addressable from a table, keyed by
/// field path (`DEFINE FIELD name ON TABLE` uses dotted/bracketed paths,
/// e.g. `address.city` or `tags[*]`).
pub type FieldMap = BTreeMap<String, Field>;

impl Permissions {
	pub fn full() -> Self {
		Self::default()
	}

	pub fn none() -> Self {
		let deny = Some(Expr::Literal(Value::Bool(false)));
		Self {
			select: deny.clone(),
			create: deny.clone(),
			update: deny.clone(),
			delete: deny,
		}
	}
}
