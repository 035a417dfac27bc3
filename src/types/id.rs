use crate::cnf::ID_CHARS;
use crate::types::{Array, Number, Object};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Strategy for server-generated ids, used when a `thing` is created without
/// an explicit id.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Gen {
	Rand,
	Ulid,
	Uuid,
}

/// The id half of a `thing`. Spec §3.1: "any primitive (string, integer,
/// object)" — arrays are included too, since a composite index's natural key
/// is an array of column values and the document engine needs to be able to
/// address it as an id (see `doc::index`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Id {
	Number(i64),
	String(String),
	Array(Array),
	Object(Object),
}

impl From<i64> for Id {
	fn from(v: i64) -> Self {
		Self::Number(v)
	}
}

impl From<String> for Id {
	fn from(v: String) -> Self {
		Self::String(v)
	}
}

impl From<&str> for Id {
	fn from(v: &str) -> Self {
		Self::String(v.to_owned())
	}
}

impl From<Array> for Id {
	fn from(v: Array) -> Self {
		Self::Array(v)
	}
}

impl From<Object> for Id {
	fn from(v: Object) -> Self {
		Self::Object(v)
	}
}

impl From<Number> for Id {
	fn from(v: Number) -> Self {
		Self::Number(v.as_int())
	}
}

impl Id {
	/// Materialise a fresh id according to a generation strategy.
	pub fn generate(gen: Gen) -> Self {
		match gen {
			Gen::Rand => Self::String(nanoid!(20, &ID_CHARS)),
			Gen::Ulid => Self::String(ulid::Ulid::new().to_string()),
			Gen::Uuid => Self::String(Uuid::new_v4().to_string()),
		}
	}
}

impl Display for Id {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Id::Number(v) => write!(f, "{v}"),
			Id::String(v) => write!(f, "{v}"),
			Id::Array(v) => write!(f, "{v}"),
			Id::Object(v) => write!(f, "{v}"),
		}
	}
}
