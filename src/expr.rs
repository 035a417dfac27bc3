//! A minimal computable expression (design notes §9: "embedded scripts ...
//! model as an opaque evaluator capability"). The full query-language
//! grammar is out of scope; this is just enough to represent the things the
//! catalog actually stores as computed values — `DEFINE FIELD ... DEFAULT`,
//! `DEFINE FIELD ... ASSERT`, `PERMISSIONS FOR ... WHERE`, and scope
//! SIGNIN/SIGNUP queries.
use crate::err::Error;
use crate::path::{self, Path};
use crate::types::Value;
use std::sync::Arc;

/// A side-effect-free expression over the current document (`$value`),
/// the input being written (`$input`), and the authenticated session
/// (`$auth`/`$session`).
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Expr {
	Literal(Value),
	/// A dotted path off one of the bound variables below.
	Path {
		var: Var,
		path: Path,
	},
	Not(Box<Expr>),
	And(Box<Expr>, Box<Expr>),
	Or(Box<Expr>, Box<Expr>),
	Eq(Box<Expr>, Box<Expr>),
	Neq(Box<Expr>, Box<Expr>),
	Lt(Box<Expr>, Box<Expr>),
	Lte(Box<Expr>, Box<Expr>),
	Gt(Box<Expr>, Box<Expr>),
	Gte(Box<Expr>, Box<Expr>),
	/// A named function call, e.g. `time::now()`, `crypto::argon2::compare(...)`.
	Call(Arc<str>, Vec<Expr>),
}

/// The variables an [`Expr`] can dereference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Var {
	Value,
	Input,
	Auth,
	Session,
	Before,
	After,
}

/// The variable bindings an [`Expr`] is evaluated against.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
	pub value: Value,
	pub input: Value,
	pub auth: Value,
	pub session: Value,
	pub before: Value,
	pub after: Value,
}

impl Bindings {
	fn get(&self, var: Var) -> &Value {
		match var {
			Var::Value => &self.value,
			Var::Input => &self.input,
			Var::Auth => &self.auth,
			Var::Session => &self.session,
			Var::Before => &self.before,
			Var::After => &self.after,
		}
	}
}

impl Expr {
	pub fn path(var: Var, raw: &str) -> Result<Self, Error> {
		Ok(Expr::Path {
			var,
			path: path::parse(raw)?,
		})
	}

	/// Evaluate against `bindings`. Function calls are dispatched through a
	/// small fixed table (§4.7's "embedded scripts" are out of scope; this
	/// covers the handful of builtins permission/default/assert clauses
	/// actually need).
	pub fn compute(&self, bindings: &Bindings) -> Result<Value, Error> {
		use Expr::*;
		Ok(match self {
			Literal(v) => v.clone(),
			Path {
				var,
				path,
			} => path::get(bindings.get(*var), path),
			Not(e) => Value::Bool(!e.compute(bindings)?.is_truthy()),
			And(a, b) => {
				let a = a.compute(bindings)?;
				if !a.is_truthy() {
					a
				} else {
					b.compute(bindings)?
				}
			}
			Or(a, b) => {
				let a = a.compute(bindings)?;
				if a.is_truthy() {
					a
				} else {
					b.compute(bindings)?
				}
			}
			Eq(a, b) => Value::Bool(a.compute(bindings)? == b.compute(bindings)?),
			Neq(a, b) => Value::Bool(a.compute(bindings)? != b.compute(bindings)?),
			Lt(a, b) => Value::Bool(a.compute(bindings)? < b.compute(bindings)?),
			Lte(a, b) => Value::Bool(a.compute(bindings)? <= b.compute(bindings)?),
			Gt(a, b) => Value::Bool(a.compute(bindings)? > b.compute(bindings)?),
			Gte(a, b) => Value::Bool(a.compute(bindings)? >= b.compute(bindings)?),
			Call(name, args) => {
				let args =
					args.iter().map(|a| a.compute(bindings)).collect::<Result<Vec<_>, _>>()?;
				call_builtin(name, args)?
			}
		})
	}
}

fn call_builtin(name: &str, args: Vec<Value>) -> Result<Value, Error> {
	match name {
		"time::now" => Ok(Value::Datetime(chrono::Utc::now())),
		"rand::uuid" => Ok(Value::from(uuid::Uuid::new_v4().to_string())),
		"string::lowercase" => {
			Ok(Value::from(args.first().map(|v| v.as_string().to_lowercase()).unwrap_or_default()))
		}
		"string::uppercase" => {
			Ok(Value::from(args.first().map(|v| v.as_string().to_uppercase()).unwrap_or_default()))
		}
		"crypto::argon2::compare" | "crypto::bcrypt::compare" => {
			let (hash, candidate) = match (args.first(), args.get(1)) {
				(Some(h), Some(c)) => (h.as_string(), c.as_string()),
				_ => return Ok(Value::Bool(false)),
			};
			Ok(Value::Bool(bcrypt::verify(candidate, &hash).unwrap_or(false)))
		}
		other => Err(Error::Unimplemented(format!("function '{other}' is not available"))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn path_expr_reads_value() {
		let mut bindings = Bindings::default();
		bindings.value = Value::from(42i64);
		let expr = Expr::path(Var::Value, "").unwrap();
		assert_eq!(expr.compute(&bindings).unwrap(), Value::from(42i64));
	}

	#[test]
	fn comparison() {
		let bindings = Bindings::default();
		let expr = Expr::Gt(Box::new(Expr::Literal(Value::from(5i64))), Box::new(Expr::Literal(Value::from(3i64))));
		assert_eq!(expr.compute(&bindings).unwrap(), Value::Bool(true));
	}
}
