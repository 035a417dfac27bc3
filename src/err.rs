use thiserror::Error;

/// The single error type that crosses every component boundary in this crate.
///
/// Variants are grouped to match the taxonomy in the design: store/txn/cipher
/// failures from the KV layer, catalog lookups, document-engine validation,
/// and auth. Nothing downstream of a `Transaction` should ever see a panic;
/// everything bottoms out here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	// -- KV store (component 2) --
	#[error("the key-value store is unavailable: {0}")]
	StoreUnavailable(String),

	#[error("the transaction has been terminated")]
	TxFinished,

	#[error("the transaction is read-only")]
	TxReadonly,

	#[error("the transaction failed: {0}")]
	TxFailure(String),

	#[error("unable to process conditional update: the current value did not match")]
	Condition,

	// -- Cipher (component 3) --
	#[error("failed to decrypt or verify a stored record")]
	Cipher,

	#[error("invalid encryption key: {0}")]
	InvalidCipherKey(String),

	// -- Key codec (component 1) --
	#[error("failed to encode a key: {0}")]
	KeyEncode(String),

	#[error("failed to decode a key: {0}")]
	KeyDecode(String),

	// -- Catalog cache (components 4-5) --
	#[error("the {kind} '{name}' does not exist")]
	NotFound {
		kind: &'static str,
		name: String,
	},

	#[error("the {kind} '{name}' already exists")]
	AlreadyExists {
		kind: &'static str,
		name: String,
	},

	// -- Document engine (component 6) --
	#[error("found field '{field}' which is not defined on table '{table}'")]
	UndefinedField {
		table: String,
		field: String,
	},

	#[error("field '{field}' on '{thing}' is readonly")]
	FieldReadonly {
		field: String,
		thing: String,
	},

	#[error("field '{field}' is NULL on '{thing}' but is declared NOT NULL")]
	FieldValueNone {
		field: String,
		thing: String,
	},

	#[error("field '{field}' is mandatory but was not supplied on '{thing}'")]
	FieldMandatory {
		field: String,
		thing: String,
	},

	#[error("field '{field}' has value '{value}' which does not conform to type '{kind}' on '{thing}'")]
	FieldCoerce {
		thing: String,
		field: String,
		kind: String,
		value: String,
	},

	#[error("field '{field}' has value '{value}' which does not match the regex '{check}' on '{thing}'")]
	FieldMatch {
		thing: String,
		field: String,
		check: String,
		value: String,
	},

	#[error("field '{field}' has value '{value}' which does not satisfy its bounds on '{thing}'")]
	FieldRange {
		thing: String,
		field: String,
		value: String,
	},

	#[error("a unique index '{index}' already contains the value {value}")]
	Duplicate {
		index: String,
		value: String,
	},

	#[error("more than one record claims the same id within index '{index}'")]
	MultipleItemsSameId {
		index: String,
	},

	#[error("you don't have permission to perform this {action} on '{thing}'")]
	PermissionDenied {
		action: String,
		thing: String,
	},

	#[error("a script returned an error: {0}")]
	ScriptFailed(String),

	#[error("scripting is not enabled on this instance")]
	ScriptingDisabled,

	// -- Diff / patch (component 7) --
	#[error("invalid patch: {message}")]
	InvalidPatch {
		message: String,
	},

	#[error("patch test failed: expected '{expected}' but found '{got}'")]
	PatchTest {
		expected: String,
		got: String,
	},

	// -- Doc path addressing (component 8) --
	#[error("invalid path: {0}")]
	InvalidPath(String),

	// -- Auth (component 9) --
	#[error("authentication failed")]
	AuthnFailed,

	#[error("authentication expired")]
	AuthnExpired,

	#[error("this operation requires a higher authentication level")]
	AuthnInsufficient,

	#[error("invalid JWT: {0}")]
	InvalidAuth(String),

	#[error("SIGNIN/SIGNUP expression did not resolve to exactly one record")]
	InvalidSigninTarget,

	// -- Misc --
	#[error("this operation is not implemented: {0}")]
	Unimplemented(String),

	#[error("computation depth exceeded")]
	ComputationDepthExceeded,
}

impl Error {
	/// The conventional HTTP-ish status a transport would surface this as.
	/// The core never performs the surfacing itself (component boundary),
	/// but callers building a transport need a stable mapping.
	pub fn status_code(&self) -> u16 {
		match self {
			Error::StoreUnavailable(_) => 503,
			Error::TxFinished | Error::TxReadonly | Error::TxFailure(_) => 500,
			Error::Condition => 409,
			Error::Cipher | Error::InvalidCipherKey(_) => 403,
			Error::NotFound {
				..
			} => 404,
			Error::AlreadyExists {
				..
			} => 409,
			Error::UndefinedField {
				..
			}
			| Error::FieldReadonly {
				..
			}
			| Error::FieldValueNone {
				..
			}
			| Error::FieldMandatory {
				..
			}
			| Error::FieldCoerce {
				..
			}
			| Error::FieldMatch {
				..
			}
			| Error::FieldRange {
				..
			} => 422,
			Error::Duplicate {
				..
			}
			| Error::MultipleItemsSameId {
				..
			} => 409,
			Error::PermissionDenied {
				..
			} => 403,
			Error::ScriptFailed(_) | Error::ScriptingDisabled => 422,
			Error::InvalidPatch {
				..
			}
			| Error::PatchTest {
				..
			} => 422,
			Error::InvalidPath(_) => 400,
			Error::AuthnFailed | Error::AuthnExpired | Error::InvalidAuth(_) => 401,
			Error::AuthnInsufficient => 403,
			Error::InvalidSigninTarget => 401,
			Error::Unimplemented(_) => 501,
			Error::ComputationDepthExceeded => 500,
		}
	}
}
