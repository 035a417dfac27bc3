//! JWT issuance and verification (spec §4.7). A minted token carries enough
//! claims to reconstruct the [`super::Auth`] it was issued for without a
//! round-trip to the catalog.
use crate::err::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The claim set this crate issues and accepts. `NS`/`DB`/`SC` identify which
/// level the token authenticates at; `ID` is the authenticated thing for a
/// scope token, `US` the user name for a namespace/database login.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Claims {
	pub ns: Option<String>,
	pub db: Option<String>,
	pub sc: Option<String>,
	pub tk: Option<String>,
	pub us: Option<String>,
	pub id: Option<String>,
	pub exp: Option<i64>,
}

/// Sign `claims` with an HS256 key. `session_duration_secs` of `0` means no
/// expiry claim is set.
pub fn mint(claims: &Claims, secret: &[u8]) -> Result<String, Error> {
	encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret))
		.map_err(|e| Error::InvalidAuth(e.to_string()))
}

/// Verify `token` against `secret` and return its claims. Expiry is checked
/// by the underlying library whenever `exp` is present.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, Error> {
	let mut validation = Validation::new(Algorithm::HS256);
	validation.required_spec_claims.clear();
	decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
		.map(|data| data.claims)
		.map_err(|e| match e.kind() {
			jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::AuthnExpired,
			_ => Error::InvalidAuth(e.to_string()),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mint_and_verify_roundtrip() {
		let claims = Claims {
			ns: Some("n".into()),
			db: Some("d".into()),
			sc: Some("user".into()),
			id: Some("user:1".into()),
			..Default::default()
		};
		let token = mint(&claims, b"secret").unwrap();
		let back = verify(&token, b"secret").unwrap();
		assert_eq!(back.ns.as_deref(), Some("n"));
		assert_eq!(back.id.as_deref(), Some("user:1"));
	}

	#[test]
	fn wrong_secret_fails() {
		let claims = Claims::default();
		let token = mint(&claims, b"secret").unwrap();
		assert!(matches!(verify(&token, b"other"), Err(Error::InvalidAuth(_))));
	}

	#[test]
	fn expired_token_reports_authn_expired() {
		let claims = Claims {
			exp: Some(1),
			..Default::default()
		};
		let token = mint(&claims, b"secret").unwrap();
		assert!(matches!(verify(&token, b"secret"), Err(Error::AuthnExpired)));
	}
}
