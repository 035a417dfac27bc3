//! Signin flows (spec §4.7): namespace/database password logins, and scope
//! SIGNIN expressions that resolve to a record.
use crate::catalog::Scope;
use crate::err::Error;
use crate::expr::Bindings;
use crate::iam::token::{self, Claims};
use crate::iam::{Auth, Level, RootAuth};
use crate::kvs::tx::Tx;
use crate::types::Value;
use std::net::Ipv4Addr;

/// Verify the root login (spec §4.7's first bullet): a configured
/// `(user, pass)` tuple gated by a CIDR allow-list, independent of any
/// namespace/database catalog. There's nothing to look up in a transaction —
/// the whole check is synchronous against `cfg`.
pub fn root(cfg: &RootAuth, user: &str, pass: &str, remote_ip: &str) -> Result<Auth, Error> {
	if !cidr_allows(&cfg.allow, remote_ip) {
		return Err(Error::AuthnFailed);
	}
	if cfg.user != user || !bcrypt::verify(pass, &cfg.hash).unwrap_or(false) {
		return Err(Error::AuthnFailed);
	}
	Ok(Auth {
		level: Level::Kv,
		ns: None,
		db: None,
		sc: None,
		payload: Value::from(user),
	})
}

/// Plain prefix-string CIDR matching (IPv4 only) — deliberately hand-rolled
/// on `std::net` rather than pulling in a geo/network crate for a check this
/// small.
fn cidr_allows(allow: &[String], remote_ip: &str) -> bool {
	let Ok(ip) = remote_ip.parse::<Ipv4Addr>() else {
		return false;
	};
	allow.iter().any(|cidr| cidr_contains(cidr, ip))
}

fn cidr_contains(cidr: &str, ip: Ipv4Addr) -> bool {
	let (net, bits) = match cidr.split_once('/') {
		Some((net, bits)) => (net, bits),
		None => (cidr, "32"),
	};
	let Ok(net) = net.parse::<Ipv4Addr>() else {
		return false;
	};
	let Ok(bits) = bits.parse::<u32>() else {
		return false;
	};
	if bits > 32 {
		return false;
	}
	let mask = if bits == 0 {
		0
	} else {
		u32::MAX << (32 - bits)
	};
	u32::from(net) & mask == u32::from(ip) & mask
}

/// Verify a namespace-level login and return the resulting [`Auth`].
pub async fn ns_user(tx: &mut Tx, ns: &str, user: &str, pass: &str) -> Result<Auth, Error> {
	let def = tx.get_nu(ns, user).await?;
	if !bcrypt::verify(pass, &def.hash).unwrap_or(false) {
		return Err(Error::AuthnFailed);
	}
	Ok(Auth {
		level: Level::Ns,
		ns: Some(ns.to_owned()),
		db: None,
		sc: None,
		payload: Value::from(user),
	})
}

/// Verify a database-level login and return the resulting [`Auth`].
pub async fn db_user(tx: &mut Tx, ns: &str, db: &str, user: &str, pass: &str) -> Result<Auth, Error> {
	let def = tx.get_du(ns, db, user).await?;
	if !bcrypt::verify(pass, &def.hash).unwrap_or(false) {
		return Err(Error::AuthnFailed);
	}
	Ok(Auth {
		level: Level::Db,
		ns: Some(ns.to_owned()),
		db: Some(db.to_owned()),
		sc: None,
		payload: Value::from(user),
	})
}

/// Run a scope's SIGNIN expression against `vars` (the fields supplied at
/// login). The expression must resolve to a [`Value::Thing`]; on success a
/// bearer token is minted and returned alongside the new [`Auth`].
pub async fn scope_signin(tx: &mut Tx, ns: &str, db: &str, sc: &str, vars: Value) -> Result<(Auth, String), Error> {
	let def = tx.get_sc(ns, db, sc).await?;
	let thing = resolve(&def, vars)?;

	let (claims, secret) = scope_signin_claims(tx, ns, db, sc, &thing, def.session_duration_secs).await?;
	let token = token::mint(&claims, &secret)?;

	let auth = Auth {
		level: Level::Sc,
		ns: Some(ns.to_owned()),
		db: Some(db.to_owned()),
		sc: Some(sc.to_owned()),
		payload: thing,
	};
	Ok((auth, token))
}

/// Build the claim set and signing secret for a scope session authenticated
/// as `thing`. Shared by [`scope_signin`] and [`super::signup::scope_signup`]
/// so both mint tokens the same way.
pub(crate) async fn scope_signin_claims(
	tx: &mut Tx,
	ns: &str,
	db: &str,
	sc: &str,
	thing: &Value,
	session_duration_secs: u64,
) -> Result<(Claims, Vec<u8>), Error> {
	let claims = Claims {
		ns: Some(ns.to_owned()),
		db: Some(db.to_owned()),
		sc: Some(sc.to_owned()),
		id: Some(thing.to_string()),
		exp: expiry(session_duration_secs),
		..Default::default()
	};
	let secret = scope_secret(tx, ns, db, sc).await?;
	Ok((claims, secret))
}

fn resolve(def: &Scope, vars: Value) -> Result<Value, Error> {
	let signin = def.signin.as_ref().ok_or(Error::InvalidSigninTarget)?;
	let bindings = Bindings {
		input: vars,
		..Default::default()
	};
	match signin.compute(&bindings)? {
		thing @ Value::Thing(_) => Ok(thing),
		_ => Err(Error::InvalidSigninTarget),
	}
}

/// Every scope is issued tokens under an implicit `DEFINE TOKEN` named after
/// the scope itself (falls back to the scope name as an HMAC secret when no
/// such token definition exists, matching the "NS+TK=default" bootstrap case
/// in the verification table).
async fn scope_secret(tx: &mut Tx, ns: &str, db: &str, sc: &str) -> Result<Vec<u8>, Error> {
	match tx.get_st(ns, db, sc, sc).await {
		Ok(def) => Ok(def.secret.clone()),
		Err(Error::NotFound {
			..
		}) => Ok(sc.as_bytes().to_vec()),
		Err(e) => Err(e),
	}
}

fn expiry(duration_secs: u64) -> Option<i64> {
	if duration_secs == 0 {
		None
	} else {
		Some(chrono::Utc::now().timestamp() + duration_secs as i64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::{Expr, Var};
	use crate::types::{Object, Thing};

	fn obj(pairs: &[(&str, Value)]) -> Value {
		Value::Object(Object(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()))
	}

	fn root_cfg() -> RootAuth {
		RootAuth {
			user: "root".into(),
			hash: bcrypt::hash("hunter2", bcrypt::DEFAULT_COST).unwrap(),
			allow: vec!["10.0.0.0/8".into(), "127.0.0.1/32".into()],
		}
	}

	#[test]
	fn root_login_succeeds_from_allowed_address() {
		let auth = root(&root_cfg(), "root", "hunter2", "10.1.2.3").unwrap();
		assert_eq!(auth.level, Level::Kv);
		assert!(auth.ns.is_none());
	}

	#[test]
	fn root_login_rejects_address_outside_allow_list() {
		assert!(matches!(root(&root_cfg(), "root", "hunter2", "8.8.8.8"), Err(Error::AuthnFailed)));
	}

	#[test]
	fn root_login_rejects_wrong_password() {
		assert!(matches!(root(&root_cfg(), "root", "wrong", "127.0.0.1"), Err(Error::AuthnFailed)));
	}

	#[test]
	fn cidr_allows_exact_host_match() {
		assert!(cidr_allows(&["127.0.0.1/32".to_owned()], "127.0.0.1"));
		assert!(!cidr_allows(&["127.0.0.1/32".to_owned()], "127.0.0.2"));
	}

	#[test]
	fn resolve_requires_thing_result() {
		let def = Scope {
			name: "user".into(),
			signin: Some(Expr::Literal(Value::from(1i64))),
			signup: None,
			session_duration_secs: 0,
		};
		assert!(matches!(resolve(&def, Value::None), Err(Error::InvalidSigninTarget)));
	}

	#[test]
	fn resolve_accepts_thing() {
		let def = Scope {
			name: "user".into(),
			signin: Some(Expr::Literal(Value::Thing(Thing::new("user", "1")))),
			signup: None,
			session_duration_secs: 0,
		};
		let out = resolve(&def, Value::None).unwrap();
		assert_eq!(out, Value::Thing(Thing::new("user", "1")));
	}

	#[test]
	fn resolve_reads_input_bindings() {
		let def = Scope {
			name: "user".into(),
			signin: Some(Expr::path(Var::Input, "id").unwrap()),
			signup: None,
			session_duration_secs: 0,
		};
		let vars = obj(&[("id", Value::Thing(Thing::new("user", "42")))]);
		let out = resolve(&def, vars).unwrap();
		assert_eq!(out, Value::Thing(Thing::new("user", "42")));
	}
}
