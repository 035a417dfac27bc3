use crate::types::{Number, Value};
use base64_lib::Engine;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// The field type a `DEFINE FIELD ... TYPE <kind>` clause can declare (spec
/// §4.4.3 step 6). `Custom` covers `TYPE <a> | <b> | ...` enum-of-literals
/// fields, where `current` must equal one of the listed values verbatim
/// rather than being coerced.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Kind {
	Url,
	Uuid,
	Email,
	Phone,
	Color,
	Domain,
	Base64,
	String,
	Number,
	Boolean,
	Datetime,
	Latitude,
	Longitude,
	Array,
	Object,
	Custom(Vec<Value>),
}

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9][0-9()\-. ]{6,18}[0-9]$").unwrap());
static COLOR_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"(?i)^#([0-9a-f]{3}|[0-9a-f]{6}|[0-9a-f]{8})$").unwrap());

/// Attempt to coerce `val` into `kind`, returning the coerced value on
/// success. Failure is reported as `None`; the caller (field enforcement,
/// §4.4.3) decides whether that means "error" (`validate`) or "restore the
/// initial value".
pub fn coerce(val: &Value, kind: &Kind) -> Option<Value> {
	match kind {
		Kind::String => Some(Value::from(val.as_string())),
		Kind::Number => match val {
			Value::Number(_) => Some(val.clone()),
			Value::Strand(s) => s.parse::<f64>().ok().map(|f| {
				if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
					Value::from(f as i64)
				} else {
					Value::from(f)
				}
			}),
			_ => None,
		},
		Kind::Boolean => match val {
			Value::Bool(_) => Some(val.clone()),
			Value::Strand(s) => match s.as_str() {
				"true" => Some(Value::Bool(true)),
				"false" => Some(Value::Bool(false)),
				_ => None,
			},
			_ => None,
		},
		Kind::Datetime => match val {
			Value::Datetime(_) => Some(val.clone()),
			Value::Strand(s) => DateTime::parse_from_rfc3339(s.as_str())
				.map(|d| Value::Datetime(d.with_timezone(&Utc)))
				.ok(),
			_ => None,
		},
		Kind::Array => match val {
			Value::Array(_) => Some(val.clone()),
			_ => None,
		},
		Kind::Object => match val {
			Value::Object(_) => Some(val.clone()),
			_ => None,
		},
		Kind::Uuid => {
			let s = strand_of(val)?;
			uuid::Uuid::parse_str(s).ok()?;
			Some(Value::from(s.to_owned()))
		}
		Kind::Url => {
			let s = strand_of(val)?;
			url::Url::parse(s).ok()?;
			Some(Value::from(s.to_owned()))
		}
		Kind::Domain => {
			let s = strand_of(val)?;
			addr::parse_domain_name(s).ok()?;
			Some(Value::from(s.to_owned()))
		}
		Kind::Email => {
			let s = strand_of(val)?;
			let (_, domain) = s.rsplit_once('@')?;
			if domain.is_empty() {
				return None;
			}
			addr::parse_domain_name(domain).ok()?;
			Some(Value::from(s.to_owned()))
		}
		Kind::Phone => {
			let s = strand_of(val)?;
			PHONE_RE.is_match(s).then(|| Value::from(s.to_owned()))
		}
		Kind::Color => {
			let s = strand_of(val)?;
			COLOR_RE.is_match(s).then(|| Value::from(s.to_owned()))
		}
		Kind::Base64 => {
			let s = strand_of(val)?;
			base64_lib::engine::general_purpose::STANDARD.decode(s).ok()?;
			Some(Value::from(s.to_owned()))
		}
		Kind::Latitude => {
			let n = number_of(val)?;
			(-90.0..=90.0).contains(&n.as_float()).then(|| Value::Number(n))
		}
		Kind::Longitude => {
			let n = number_of(val)?;
			(-180.0..=180.0).contains(&n.as_float()).then(|| Value::Number(n))
		}
		Kind::Custom(allowed) => allowed.iter().find(|v| *v == val).cloned(),
	}
}

fn strand_of(val: &Value) -> Option<&str> {
	match val {
		Value::Strand(s) => Some(s.as_str()),
		_ => None,
	}
}

fn number_of(val: &Value) -> Option<Number> {
	match val {
		Value::Number(n) => Some(*n),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coerce_email() {
		let v = Value::from("person@example.com");
		assert_eq!(coerce(&v, &Kind::Email), Some(v));
		let bad = Value::from("not-an-email");
		assert_eq!(coerce(&bad, &Kind::Email), None);
	}

	#[test]
	fn coerce_number_widening() {
		let v = Value::from("3.5");
		assert_eq!(coerce(&v, &Kind::Number), Some(Value::from(3.5)));
		let v = Value::from("3");
		assert_eq!(coerce(&v, &Kind::Number), Some(Value::from(3i64)));
	}

	#[test]
	fn coerce_color() {
		assert!(coerce(&Value::from("#fff"), &Kind::Color).is_some());
		assert!(coerce(&Value::from("not-a-color"), &Kind::Color).is_none());
	}

	#[test]
	fn coerce_latitude_bounds() {
		assert!(coerce(&Value::from(45.0), &Kind::Latitude).is_some());
		assert!(coerce(&Value::from(120.0), &Kind::Latitude).is_none());
	}
}
