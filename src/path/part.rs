use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One segment of a doc path (spec §4.5). `Slice` bounds are resolved
/// against the actual array length by the caller (`$`/`last` both mean "one
/// past the end", matching the half-open convention); a descending slice is
/// represented by the caller reversing the two bounds before constructing
/// `Slice`, per the spec note that descending-ness is "represented by the
/// caller".
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Part {
	Name(String),
	Index(usize),
	First,
	Last,
	Wildcard,
	Slice {
		start: usize,
		end: usize,
	},
}

impl Display for Part {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Part::Name(n) => write!(f, "{n}"),
			Part::Index(i) => write!(f, "[{i}]"),
			Part::First => write!(f, "[first]"),
			Part::Last => write!(f, "[last]"),
			Part::Wildcard => write!(f, "[*]"),
			Part::Slice {
				start,
				end,
			} => write!(f, "[{start}:{end}]"),
		}
	}
}

impl From<&str> for Part {
	fn from(v: &str) -> Self {
		Part::Name(v.to_owned())
	}
}

impl From<usize> for Part {
	fn from(v: usize) -> Self {
		Part::Index(v)
	}
}

/// A doc path: an ordered sequence of parts, e.g. `meta.tags[0]` ->
/// `[Name("meta"), Name("tags"), Index(0)]`.
pub type Path = Vec<Part>;
