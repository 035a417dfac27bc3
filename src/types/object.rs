use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, DerefMut};

/// A string-keyed map of values. `BTreeMap` rather than a hash map so that
/// encoding and diffing see a stable key order (the document engine's
/// coercion loop and the diff generator both rely on deterministic
/// iteration).
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Object(pub BTreeMap<String, Value>);

impl Deref for Object {
	type Target = BTreeMap<String, Value>;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Object {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl FromIterator<(String, Value)> for Object {
	fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl Display for Object {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{{ ")?;
		for (i, (k, v)) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{k}: {v}")?;
		}
		write!(f, " }}")
	}
}
