//! The document engine (component 6): the pipeline a single record write
//! runs through, from the caller's merge directives to a committed record
//! plus its index entries and patch history.
pub mod field;
pub mod index;
pub mod merge;
pub mod permissions;

use crate::catalog::Table;
use crate::diff;
use crate::err::Error;
use crate::expr::Bindings;
use crate::iam::Level;
use crate::kvs::tx::Tx;
use crate::live::{self, registry::Registry};
use crate::types::{Id, Thing, Value};
use permissions::Action;
use tracing::trace;

/// A single record as it moves through a write: `initial` is what was
/// stored before this transaction touched it (`Value::None` for a create),
/// `current` is the in-flight result of merge directives and field
/// enforcement.
#[non_exhaustive]
pub struct Document {
	pub thing: Thing,
	pub initial: Value,
	pub current: Value,
}

impl Document {
	pub fn new(thing: Thing, initial: Value) -> Self {
		let current = initial.clone();
		Self {
			thing,
			initial,
			current,
		}
	}

	/// Expose `id`/`meta.*`/`time.*` the way merge/field expressions see them
	/// (spec §4.4.1): the record's own identity layered on top of its data.
	fn bindings(&self, auth: &Value) -> Bindings {
		Bindings {
			value: self.current.clone(),
			auth: auth.clone(),
			before: self.initial.clone(),
			after: self.current.clone(),
			..Default::default()
		}
	}
}

/// Run one document through the whole pipeline and commit it: apply the
/// caller's merge directives, enforce every defined field, check
/// permissions, maintain indexes, and persist (spec §4.4.1-§4.4.7).
///
/// `action` distinguishes CREATE from UPDATE for permission evaluation
/// (a create with no prior record checks the `create` rule, otherwise
/// `update`); `bypass_permissions_above_db` mirrors the spec's "MAY be
/// bypassed" wording for table/field permissions.
pub async fn upsert(
	tx: &mut Tx,
	ns: &str,
	db: &str,
	table: &Table,
	thing: Thing,
	directives: &[merge::Merge],
	auth_level: Level,
	auth_payload: &Value,
	bypass_permissions_above_db: bool,
	live: Option<&Registry>,
) -> Result<Value, Error> {
	let id = thing.id.clone();
	let tb = thing.tb.clone();
	let stored = tx.get_record(ns, db, &tb, id.clone()).await?;
	let existed = stored.is_some();
	let initial = match stored {
		Some(bytes) => bincode::deserialize(&bytes).map_err(|e| Error::TxFailure(e.to_string()))?,
		None => Value::None,
	};

	let mut doc = Document::new(thing, initial);
	merge::apply(&mut doc.current, directives)?;

	let fields = tx.all_fd(ns, db, &tb).await?;
	let field_map: crate::catalog::FieldMap = fields.iter().map(|f| (f.name.clone(), f.clone())).collect();
	let thing_str = doc.thing.to_string();
	field::enforce(&field_map, &doc.initial, &mut doc.current, &thing_str)?;
	if table.schemafull {
		field::enforce_schemafull(&field_map, &doc.current, &table.name)?;
	}

	let action = if existed {
		Action::Update
	} else {
		Action::Create
	};
	let bindings = doc.bindings(auth_payload);
	permissions::check(&table.permissions, action, &bindings, auth_level, bypass_permissions_above_db, &thing_str)?;
	for field in field_map.values() {
		permissions::check(&field.permissions, action, &bindings, auth_level, bypass_permissions_above_db, &thing_str)?;
	}

	commit(tx, ns, db, table, &id, &doc).await?;

	if let Some(registry) = live {
		let notify_action = if existed {
			live::notification::Action::Update
		} else {
			live::notification::Action::Create
		};
		live::notify(tx, registry, ns, db, &doc.thing, notify_action, &doc.current).await?;
	}

	Ok(doc.current)
}

/// Spec §4.4.6's five-step commit order. `doc.current` being `Value::None`
/// after merge directives (a `DELETE`) is handled by [`delete`] instead.
async fn commit(tx: &mut Tx, ns: &str, db: &str, table: &Table, id: &Id, doc: &Document) -> Result<(), Error> {
	let tb = table.name.as_str();

	// Step 1: ensure the parent namespace/database exist.
	tx.add_db(ns, db).await?;

	// Steps 2-3: drop stale index entries, then insert the new ones. A
	// duplicate on a unique index aborts the whole commit (spec §4.4.4).
	let indexes = tx.all_ix(ns, db, tb).await?;
	index::maintain(tx, ns, db, tb, id, &indexes, &doc.initial, &doc.current).await?;

	// Step 4: the linearisation point. The expected prior value is whatever
	// this transaction itself last observed for this key.
	let expected = match &doc.initial {
		Value::None => None,
		initial => Some(bincode::serialize(initial).map_err(|e| Error::TxFailure(e.to_string()))?),
	};
	let new_bytes = bincode::serialize(&doc.current).map_err(|e| Error::TxFailure(e.to_string()))?;
	let key = crate::key::thing::Thing::new(ns, db, tb, id.clone()).encode()?;
	tx.putc(key, new_bytes, expected).await?;

	// Step 5: patch history, keyed by this write's timestamp — only if
	// history is enabled for the table (spec §4.4.5).
	if table.changefeed {
		let ops = diff::diff(&doc.initial, &doc.current);
		let version = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
		let ops_bytes = bincode::serialize(&ops).map_err(|e| Error::TxFailure(e.to_string()))?;
		tx.put_patch(ns, db, tb, id.clone(), version, ops_bytes).await?;
		trace!("committed {}:{} with {} patch ops", tb, id, ops.len());
	} else {
		trace!("committed {}:{} (no history: table's changefeed is off)", tb, id);
	}

	Ok(())
}

/// Delete a record: drop its index entries, the record itself, and (spec
/// §4.4.5) its whole patch history.
pub async fn delete(
	tx: &mut Tx,
	ns: &str,
	db: &str,
	table: &Table,
	thing: Thing,
	auth_level: Level,
	auth_payload: &Value,
	bypass_permissions_above_db: bool,
	live: Option<&Registry>,
) -> Result<(), Error> {
	let tb = thing.tb.clone();
	let id = thing.id.clone();
	let initial = match tx.get_record(ns, db, &tb, id.clone()).await? {
		Some(bytes) => bincode::deserialize(&bytes).map_err(|e| Error::TxFailure(e.to_string()))?,
		None => return Ok(()),
	};

	let doc = Document::new(thing, initial);
	let bindings = doc.bindings(auth_payload);
	let thing_str = doc.thing.to_string();
	permissions::check(
		&table.permissions,
		Action::Delete,
		&bindings,
		auth_level,
		bypass_permissions_above_db,
		&thing_str,
	)?;

	let indexes = tx.all_ix(ns, db, &tb).await?;
	index::maintain(tx, ns, db, &tb, &id, &indexes, &doc.initial, &Value::None).await?;

	let expected = Some(bincode::serialize(&doc.initial).map_err(|e| Error::TxFailure(e.to_string()))?);
	let key = crate::key::thing::Thing::new(ns, db, &tb, id.clone()).encode()?;
	tx.delc(key, expected).await?;

	// Spec §4.4.5: "deleting the thing triggers DelR(Patch.startOfTime,
	// Patch.endOfTime)" — the whole history goes with the record, it isn't
	// extended with one more "now it's gone" entry.
	tx.del_patches(ns, db, &tb, id).await?;

	if let Some(registry) = live {
		live::notify(tx, registry, ns, db, &doc.thing, live::notification::Action::Delete, &Value::None).await?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Object;

	#[test]
	fn document_bindings_expose_before_and_after() {
		let thing = Thing::new("person", "1");
		let initial = Value::Object(Object(vec![("name".to_owned(), Value::from("alice"))].into_iter().collect()));
		let doc = Document::new(thing, initial.clone());
		let bindings = doc.bindings(&Value::None);
		assert_eq!(bindings.before, initial);
		assert_eq!(bindings.after, initial);
	}
}
