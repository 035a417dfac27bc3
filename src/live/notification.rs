//! The message a live subscriber receives (spec §4.8).
use crate::types::{Thing, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Action {
	Create,
	Update,
	Delete,
}

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Notification {
	pub live_id: uuid::Uuid,
	pub action: Action,
	pub thing: Thing,
	pub value: Value,
}
