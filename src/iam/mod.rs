//! Authentication state (component 9, spec §3.5/§4.7): the auth context
//! every transaction carries, and the signin/signup/bearer flows that
//! produce or refresh one.
pub mod signin;
pub mod signup;
pub mod token;
pub mod verify;

use crate::types::Value;

/// The auth ladder. Declaration order is the subsumption order the spec
/// calls "monotonic: higher subsumes lower" — `derive(Ord)` gives exactly
/// that for free.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Level {
	#[default]
	No,
	Sc,
	Db,
	Ns,
	Kv,
}

/// What a transaction is authenticated as. `Reset` returns to `No` and
/// clears everything else (spec §3.5).
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct Auth {
	pub level: Level,
	pub ns: Option<String>,
	pub db: Option<String>,
	pub sc: Option<String>,
	/// The authenticated thing (scope signin) or the raw claim set (bearer).
	pub payload: Value,
}

impl Auth {
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn is_anon(&self) -> bool {
		self.level == Level::No
	}
}

/// Root credentials (spec §4.7: "a configured (user, pass) tuple on a
/// configured CIDR allow-list"). Unlike NS/DB/scope logins this isn't a
/// catalog entry read through a transaction — it's part of the server's own
/// startup configuration, so callers build one from whatever they parsed
/// their options out of and hand it to [`signin::root`].
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct RootAuth {
	pub user: String,
	pub hash: String,
	/// CIDR prefixes (e.g. `"10.0.0.0/8"`, `"127.0.0.1/32"`) a login's
	/// remote address must fall within. Empty means no address is allowed.
	pub allow: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn level_ordering_is_monotonic() {
		assert!(Level::No < Level::Sc);
		assert!(Level::Sc < Level::Db);
		assert!(Level::Db < Level::Ns);
		assert!(Level::Ns < Level::Kv);
	}

	#[test]
	fn reset_clears_everything() {
		let mut auth = Auth {
			level: Level::Kv,
			ns: Some("n".into()),
			db: Some("d".into()),
			sc: Some("s".into()),
			payload: Value::from(1i64),
		};
		auth.reset();
		assert_eq!(auth.level, Level::No);
		assert!(auth.ns.is_none());
		assert!(auth.payload.is_none());
	}
}
