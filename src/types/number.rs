use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Sub};

/// A numeric value. Ints and floats are kept distinct so that `Inc`/`Dec`
/// (spec §4.4.2) can widen int -> float only when the other operand forces
/// it, rather than always paying float rounding.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Number {
	Int(i64),
	Float(f64),
}

impl Default for Number {
	fn default() -> Self {
		Self::Int(0)
	}
}

impl From<i64> for Number {
	fn from(v: i64) -> Self {
		Self::Int(v)
	}
}

impl From<i32> for Number {
	fn from(v: i32) -> Self {
		Self::Int(v as i64)
	}
}

impl From<usize> for Number {
	fn from(v: usize) -> Self {
		Self::Int(v as i64)
	}
}

impl From<f64> for Number {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl Number {
	pub fn as_int(&self) -> i64 {
		match self {
			Number::Int(v) => *v,
			Number::Float(v) => *v as i64,
		}
	}

	pub fn as_float(&self) -> f64 {
		match self {
			Number::Int(v) => *v as f64,
			Number::Float(v) => *v,
		}
	}

	pub fn as_usize(&self) -> usize {
		self.as_int().max(0) as usize
	}

	pub fn is_float(&self) -> bool {
		matches!(self, Number::Float(_))
	}
}

impl Display for Number {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Number::Int(v) => write!(f, "{v}"),
			Number::Float(v) => write!(f, "{v}"),
		}
	}
}

impl PartialEq for Number {
	fn eq(&self, other: &Self) -> bool {
		self.as_float() == other.as_float()
	}
}

impl Eq for Number {}

impl PartialOrd for Number {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Number {
	fn cmp(&self, other: &Self) -> Ordering {
		self.as_float().partial_cmp(&other.as_float()).unwrap_or(Ordering::Equal)
	}
}

impl std::hash::Hash for Number {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		// Normalise through the float representation so Int(1) and Float(1.0)
		// (which compare equal) also hash equal.
		self.as_float().to_bits().hash(state)
	}
}

/// Widening addition: if either side is a float, the result is a float.
impl Add for Number {
	type Output = Number;
	fn add(self, rhs: Self) -> Self::Output {
		match (self, rhs) {
			(Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_add(b)),
			(a, b) => Number::Float(a.as_float() + b.as_float()),
		}
	}
}

impl Sub for Number {
	type Output = Number;
	fn sub(self, rhs: Self) -> Self::Output {
		match (self, rhs) {
			(Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_sub(b)),
			(a, b) => Number::Float(a.as_float() - b.as_float()),
		}
	}
}
