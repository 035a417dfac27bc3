//! Signup (spec §4.7): a scope's SIGNUP expression creates the record a
//! subsequent SIGNIN would authenticate as. Record creation itself goes
//! through the document engine (component 6); this module only runs the
//! expression and mints the resulting session, mirroring [`super::signin`].
use crate::err::Error;
use crate::expr::Bindings;
use crate::iam::signin::scope_signin_claims;
use crate::iam::token;
use crate::iam::{Auth, Level};
use crate::kvs::tx::Tx;
use crate::types::Value;

/// Run a scope's SIGNUP expression against `vars`. Like
/// [`super::signin::scope_signin`], the expression must resolve to a
/// [`Value::Thing`].
pub async fn scope_signup(tx: &mut Tx, ns: &str, db: &str, sc: &str, vars: Value) -> Result<(Auth, String), Error> {
	let def = tx.get_sc(ns, db, sc).await?;
	let signup = def.signup.as_ref().ok_or(Error::InvalidSigninTarget)?;
	let bindings = Bindings {
		input: vars,
		..Default::default()
	};
	let thing = match signup.compute(&bindings)? {
		thing @ Value::Thing(_) => thing,
		_ => return Err(Error::InvalidSigninTarget),
	};

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
