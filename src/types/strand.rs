use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

/// A UTF-8 string value. Kept as a distinct newtype (rather than a bare
/// `String`) so that `Value::Strand` carries the same display/escaping
/// behaviour everywhere it is formatted, mirroring the teacher's
/// `sql::strand::Strand`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Strand(pub String);

impl From<String> for Strand {
	fn from(v: String) -> Self {
		Self(v)
	}
}

impl From<&str> for Strand {
	fn from(v: &str) -> Self {
		Self(v.to_owned())
	}
}

impl Deref for Strand {
	type Target = String;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Display for Strand {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl Strand {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}
