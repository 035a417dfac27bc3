use crate::types::{Array, Number, Object, Strand, Thing};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The dynamic value sum type every record, index tuple and path target is
/// built from (design notes §9: "Dynamic typing of stored values").
///
/// `Regex` does not implement `Eq`/`Hash`/`Serialize` itself, so it is kept
/// alongside its source pattern and all derived traits are implemented by
/// hand in terms of the pattern string.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub enum Value {
	#[default]
	None,
	Null,
	Bool(bool),
	Number(Number),
	Strand(Strand),
	Datetime(DateTime<Utc>),
	Thing(Thing),
	Array(Array),
	Object(Object),
	Regex(String, Regex),
}

impl Value {
	pub fn is_none(&self) -> bool {
		matches!(self, Value::None)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// `None` and `Null` are both treated as "absent" for the purposes of
	/// mandatory/notnull/default checks; only `Null` is a user-visible value.
	pub fn is_nullish(&self) -> bool {
		matches!(self, Value::None | Value::Null)
	}

	/// Truthiness used by permission predicates and `Where` parts.
	pub fn is_truthy(&self) -> bool {
		match self {
			Value::None | Value::Null => false,
			Value::Bool(v) => *v,
			Value::Number(n) => n.as_float() != 0.0,
			Value::Strand(s) => !s.is_empty(),
			Value::Array(a) => !a.is_empty(),
			Value::Object(o) => !o.is_empty(),
			Value::Thing(_) | Value::Datetime(_) | Value::Regex(..) => true,
		}
	}

	pub fn as_string(&self) -> String {
		match self {
			Value::Strand(s) => s.to_string(),
			other => other.to_string(),
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Value::Object(o) => Some(o),
			_ => None,
		}
	}

	pub fn as_object_mut(&mut self) -> Option<&mut Object> {
		match self {
			Value::Object(o) => Some(o),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&Array> {
		match self {
			Value::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn into_array(self) -> Option<Array> {
		match self {
			Value::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::None => "none",
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Number(_) => "number",
			Value::Strand(_) => "string",
			Value::Datetime(_) => "datetime",
			Value::Thing(_) => "thing",
			Value::Array(_) => "array",
			Value::Object(_) => "object",
			Value::Regex(..) => "regex",
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::None, Value::None) => true,
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Number(a), Value::Number(b)) => a == b,
			(Value::Strand(a), Value::Strand(b)) => a == b,
			(Value::Datetime(a), Value::Datetime(b)) => a == b,
			(Value::Thing(a), Value::Thing(b)) => a == b,
			(Value::Array(a), Value::Array(b)) => a == b,
			(Value::Object(a), Value::Object(b)) => a == b,
			(Value::Regex(a, _), Value::Regex(b, _)) => a == b,
			_ => false,
		}
	}
}

impl Eq for Value {}

/// A total order over the discriminant first, then the payload. Needed
/// because index tuples (`doc::index`) and id arrays are sorted, and the key
/// codec relies on `Value`'s ordering matching its own byte-order encoding.
impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

fn discriminant_rank(v: &Value) -> u8 {
	match v {
		Value::None => 0,
		Value::Null => 1,
		Value::Bool(_) => 2,
		Value::Number(_) => 3,
		Value::Strand(_) => 4,
		Value::Datetime(_) => 5,
		Value::Thing(_) => 6,
		Value::Array(_) => 7,
		Value::Object(_) => 8,
		Value::Regex(..) => 9,
	}
}

impl Ord for Value {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		use std::cmp::Ordering;
		match (self, other) {
			(Value::None, Value::None) => Ordering::Equal,
			(Value::Null, Value::Null) => Ordering::Equal,
			(Value::Bool(a), Value::Bool(b)) => a.cmp(b),
			(Value::Number(a), Value::Number(b)) => a.cmp(b),
			(Value::Strand(a), Value::Strand(b)) => a.as_str().cmp(b.as_str()),
			(Value::Datetime(a), Value::Datetime(b)) => a.cmp(b),
			(Value::Thing(a), Value::Thing(b)) => (a.tb.as_str(), &a.id).cmp(&(b.tb.as_str(), &b.id)),
			(Value::Array(a), Value::Array(b)) => a.0.cmp(&b.0),
			(Value::Object(a), Value::Object(b)) => a.0.cmp(&b.0),
			(Value::Regex(a, _), Value::Regex(b, _)) => a.cmp(b),
			_ => discriminant_rank(self).cmp(&discriminant_rank(other)),
		}
	}
}

impl std::hash::Hash for Value {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Value::Bool(v) => v.hash(state),
			Value::Number(v) => v.hash(state),
			Value::Strand(v) => v.hash(state),
			Value::Datetime(v) => v.hash(state),
			Value::Thing(v) => v.hash(state),
			Value::Array(v) => v.hash(state),
			Value::Object(v) => v.hash(state),
			Value::Regex(p, _) => p.hash(state),
			Value::None | Value::Null => {}
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::None => write!(f, "NONE"),
			Value::Null => write!(f, "NULL"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Number(v) => write!(f, "{v}"),
			Value::Strand(v) => write!(f, "'{v}'"),
			Value::Datetime(v) => write!(f, "d'{}'", v.to_rfc3339()),
			Value::Thing(v) => write!(f, "{v}"),
			Value::Array(v) => write!(f, "{v}"),
			Value::Object(v) => write!(f, "{v}"),
			Value::Regex(p, _) => write!(f, "/{p}/"),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Number(Number::Int(v))
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Number(Number::Float(v))
	}
}

impl From<Number> for Value {
	fn from(v: Number) -> Self {
		Value::Number(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Strand(Strand(v))
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Strand(Strand(v.to_owned()))
	}
}

impl From<Strand> for Value {
	fn from(v: Strand) -> Self {
		Value::Strand(v)
	}
}

impl From<Thing> for Value {
	fn from(v: Thing) -> Self {
		Value::Thing(v)
	}
}

impl From<Array> for Value {
	fn from(v: Array) -> Self {
		Value::Array(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::Array(Array(v))
	}
}

impl From<Object> for Value {
	fn from(v: Object) -> Self {
		Value::Object(v)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(v: DateTime<Utc>) -> Self {
		Value::Datetime(v)
	}
}

/// Serde is only used for the on-disk/wire record codec (component 2/3's
/// `bincode` envelope); regexes serialise through their source pattern and
/// are recompiled on load.
impl Serialize for Value {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		use serde::ser::SerializeTupleVariant;
		match self {
			Value::None => serializer.serialize_unit_variant("Value", 0, "None"),
			Value::Null => serializer.serialize_unit_variant("Value", 1, "Null"),
			Value::Bool(v) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 2, "Bool", 1)?;
				tv.serialize_field(v)?;
				tv.end()
			}
			Value::Number(v) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 3, "Number", 1)?;
				tv.serialize_field(v)?;
				tv.end()
			}
			Value::Strand(v) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 4, "Strand", 1)?;
				tv.serialize_field(v)?;
				tv.end()
			}
			Value::Datetime(v) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 5, "Datetime", 1)?;
				tv.serialize_field(&v.to_rfc3339())?;
				tv.end()
			}
			Value::Thing(v) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 6, "Thing", 1)?;
				tv.serialize_field(v)?;
				tv.end()
			}
			Value::Array(v) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 7, "Array", 1)?;
				tv.serialize_field(v)?;
				tv.end()
			}
			Value::Object(v) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 8, "Object", 1)?;
				tv.serialize_field(v)?;
				tv.end()
			}
			Value::Regex(p, _) => {
				let mut tv = serializer.serialize_tuple_variant("Value", 9, "Regex", 1)?;
				tv.serialize_field(p)?;
				tv.end()
			}
		}
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(Deserialize)]
		enum Repr {
			None,
			Null,
			Bool(bool),
			Number(Number),
			Strand(Strand),
			Datetime(String),
			Thing(Thing),
			Array(Array),
			Object(Object),
			Regex(String),
		}
		Ok(match Repr::deserialize(deserializer)? {
			Repr::None => Value::None,
			Repr::Null => Value::Null,
			Repr::Bool(v) => Value::Bool(v),
			Repr::Number(v) => Value::Number(v),
			Repr::Strand(v) => Value::Strand(v),
			Repr::Datetime(v) => {
				let dt = DateTime::parse_from_rfc3339(&v)
					.map_err(serde::de::Error::custom)?
					.with_timezone(&Utc);
				Value::Datetime(dt)
			}
			Repr::Thing(v) => Value::Thing(v),
			Repr::Array(v) => Value::Array(v),
			Repr::Object(v) => Value::Object(v),
			Repr::Regex(p) => {
				let re = Regex::new(&p).map_err(serde::de::Error::custom)?;
				Value::Regex(p, re)
			}
		})
	}
}
