//! Live subscriptions (component 10, spec §4.8): `LIVE SELECT` registers a
//! standing predicate against a table; every committed mutation on that
//! table is checked against each registered predicate and, if it matches,
//! delivered to the owning session.
pub mod notification;
pub mod registry;

use crate::catalog::LiveQuery;
use crate::err::Error;
use crate::expr::Bindings;
use crate::kvs::tx::Tx;
use crate::types::{Thing, Value};
use notification::{Action, Notification};
use registry::Registry;
use tracing::trace;

/// Evaluate every `LIVE` query on `thing.tb` against this mutation and
/// deliver a [`Notification`] to each one whose predicate matches (no
/// predicate means "matches everything").
pub async fn notify(
	tx: &mut Tx,
	registry: &Registry,
	ns: &str,
	db: &str,
	thing: &Thing,
	action: Action,
	value: &Value,
) -> Result<(), Error> {
	let lvs = tx.all_lv(ns, db, &thing.tb).await?;
	for lv in lvs.iter() {
		if matches(lv, value)? {
			trace!("sending live notification for {} to session {}", lv.id, lv.session_id);
			registry
				.send(
					lv.session_id,
					Notification {
						live_id: lv.id,
						action,
						thing: thing.clone(),
						value: value.clone(),
					},
				)
				.await;
		} else {
			trace!("live query {} did not match, skipping", lv.id);
		}
	}
	Ok(())
}

fn matches(lv: &LiveQuery, value: &Value) -> Result<bool, Error> {
	match &lv.cond {
		None => Ok(true),
		Some(cond) => {
			let bindings = Bindings {
				value: value.clone(),
				after: value.clone(),
				..Default::default()
			};
			Ok(cond.compute(&bindings)?.is_truthy())
		}
	}
}

/// Remove a `LIVE` subscription (spec: "`KILL` removes a subscription").
pub async fn kill(tx: &mut Tx, ns: &str, db: &str, tb: &str, lv: uuid::Uuid) -> Result<(), Error> {
	tx.del_lv(ns, db, tb, lv).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::Expr;

	#[test]
	fn no_predicate_always_matches() {
		let lv = LiveQuery {
			id: uuid::Uuid::new_v4(),
			ns: "n".into(),
			db: "d".into(),
			tb: "t".into(),
			session_id: uuid::Uuid::new_v4(),
			cond: None,
		};
		assert!(matches(&lv, &Value::None).unwrap());
	}

	#[test]
	fn falsy_predicate_excludes() {
		let lv = LiveQuery {
			id: uuid::Uuid::new_v4(),
			ns: "n".into(),
			db: "d".into(),
			tb: "t".into(),
			session_id: uuid::Uuid::new_v4(),
			cond: Some(Expr::Literal(Value::Bool(false))),
		};
		assert!(!matches(&lv, &Value::None).unwrap());
	}
}
