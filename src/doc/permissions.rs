//! Permission rule evaluation (spec §4.4.7): each table (and, per-field,
//! each field) carries four predicate rules — `select`, `create`, `update`,
//! `delete`. `None` means always-allowed; `Some(expr)` must compute truthy.
use crate::catalog::Permissions;
use crate::err::Error;
use crate::expr::{Bindings, Expr};
use crate::iam::Level;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Action {
	Select,
	Create,
	Update,
	Delete,
}

impl Action {
	fn rule<'a>(self, perms: &'a Permissions) -> &'a Option<Expr> {
		match self {
			Action::Select => &perms.select,
			Action::Create => &perms.create,
			Action::Update => &perms.update,
			Action::Delete => &perms.delete,
		}
	}

	fn name(self) -> &'static str {
		match self {
			Action::Select => "select",
			Action::Create => "create",
			Action::Update => "update",
			Action::Delete => "delete",
		}
	}
}

/// Evaluate `action`'s rule on `perms` against `bindings`. Auth kinds at or
/// above `Level::Db` may bypass rule checks entirely (spec: "MAY be
/// bypassed, configurable"); `bypass_above_db` is the caller's choice of
/// whether this instance actually does.
pub fn check(
	perms: &Permissions,
	action: Action,
	bindings: &Bindings,
	auth: Level,
	bypass_above_db: bool,
	thing: &str,
) -> Result<(), Error> {
	if bypass_above_db && auth >= Level::Db {
		return Ok(());
	}
	match action.rule(perms) {
		None => Ok(()),
		Some(expr) => {
			if expr.compute(bindings)?.is_truthy() {
				Ok(())
			} else {
				Err(Error::PermissionDenied {
					action: action.name().to_owned(),
					thing: thing.to_owned(),
				})
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Value;

	#[test]
	fn none_rule_always_allows() {
		let perms = Permissions::full();
		let bindings = Bindings::default();
		assert!(check(&perms, Action::Select, &bindings, Level::No, false, "t:1").is_ok());
	}

	#[test]
	fn false_rule_denies() {
		let perms = Permissions::none();
		let bindings = Bindings::default();
		assert!(matches!(
			check(&perms, Action::Update, &bindings, Level::No, false, "t:1"),
			Err(Error::PermissionDenied { .. })
		));
	}

	#[test]
	fn db_level_bypasses_when_enabled() {
		let perms = Permissions::none();
		let bindings = Bindings::default();
		assert!(check(&perms, Action::Update, &bindings, Level::Db, true, "t:1").is_ok());
	}

	#[test]
	fn truthy_expr_allows() {
		let mut perms = Permissions::full();
		perms.select = Some(Expr::Literal(Value::Bool(true)));
		let bindings = Bindings::default();
		assert!(check(&perms, Action::Select, &bindings, Level::No, false, "t:1").is_ok());
	}
}
