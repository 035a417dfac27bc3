//! Process-wide tunables, each overridable through an environment variable.
//!
//! This is the ambient configuration surface the document engine, KV layer
//! and auth module read from; it is not a CLI argument parser (that, along
//! with server cert/key, log output format and cluster peer discovery, is
//! owned by the transport binary and out of scope here).
use crate::mac::lazy_env_parse;
use once_cell::sync::Lazy;

/// How deep path/diff recursion is allowed to go before a computation is
/// aborted with [`crate::err::Error::ComputationDepthExceeded`].
pub static MAX_COMPUTATION_DEPTH: Lazy<u32> = lazy_env_parse!("SURREAL_MAX_COMPUTATION_DEPTH", u32, 120);

/// The characters permitted in a server-generated record id.
pub const ID_CHARS: [char; 36] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Batch size used by range scans when a caller passes `max = 0` ("no cap")
/// but the backend still wants to page internally.
pub const SCAN_BATCH_SIZE: u32 = 1000;

/// Forward signup/signin query errors verbatim to the caller performing
/// record access. Never enable in production: it leaks whether a username
/// exists. Mirrors the teacher's `INSECURE_FORWARD_RECORD_ACCESS_ERRORS`.
pub static INSECURE_FORWARD_RECORD_ACCESS_ERRORS: Lazy<bool> =
	lazy_env_parse!("SURREAL_INSECURE_FORWARD_RECORD_ACCESS_ERRORS", bool, false);

/// The bcrypt work factor used for `DEFINE USER ... PASSWORD` hashing.
pub static BCRYPT_COST: Lazy<u32> = lazy_env_parse!("SURREAL_BCRYPT_COST", u32, bcrypt::DEFAULT_COST);

/// Default lifetime, in seconds, of a scope-issued JWT when the scope
/// definition does not specify its own `SESSION` duration.
pub static DEFAULT_SCOPE_TOKEN_DURATION_SECS: Lazy<i64> =
	lazy_env_parse!("SURREAL_SCOPE_TOKEN_DURATION_SECS", i64, 3600);

/// Names that cannot be used as catalog identifiers because they would
/// collide with reserved top-level protocol parameters.
pub const PROTECTED_PARAM_NAMES: &[&str] = &["access", "auth", "token", "session"];
