use crate::types::Id;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A globally addressable record, identified by `(table, id)` (glossary:
/// "Thing"). Exposed to SQL-level access as `@table:id`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Thing {
	pub tb: String,
	pub id: Id,
}

impl Thing {
	pub fn new<T: Into<String>, I: Into<Id>>(tb: T, id: I) -> Self {
		Self {
			tb: tb.into(),
			id: id.into(),
		}
	}
}

impl Display for Thing {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.tb, self.id)
	}
}

impl From<(&str, &str)> for Thing {
	fn from((tb, id): (&str, &str)) -> Self {
		Self::new(tb, id)
	}
}
