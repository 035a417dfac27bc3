//! Live-subscription session registry (spec §4.8): maps a connected
//! session to the channel its notifications go out on. Sharded via
//! `dashmap` so concurrent commits touching different sessions never
//! contend on the same lock.
use crate::live::notification::Notification;
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct Registry {
	sessions: DashMap<Uuid, channel::Sender<Notification>>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a session, returning the receiving half of its channel.
	pub fn connect(&self, session_id: Uuid) -> channel::Receiver<Notification> {
		let (tx, rx) = channel::unbounded();
		self.sessions.insert(session_id, tx);
		rx
	}

	/// Drop a session's channel. Any `LIVE` entries it owns are left for the
	/// caller to clean up via the catalog (spec: "disconnect removes the
	/// session", not the subscription rows themselves).
	pub fn disconnect(&self, session_id: Uuid) {
		self.sessions.remove(&session_id);
	}

	/// Best-effort delivery: a full or closed channel silently drops the
	/// notification rather than failing the write that triggered it.
	pub async fn send(&self, session_id: Uuid, notification: Notification) {
		if let Some(sender) = self.sessions.get(&session_id) {
			let _ = sender.send(notification).await;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::live::notification::Action;
	use crate::types::Thing;

	#[tokio::test]
	async fn connect_then_send_is_received() {
		let registry = Registry::new();
		let session = Uuid::new_v4();
		let rx = registry.connect(session);
		registry
			.send(
				session,
				Notification {
					live_id: Uuid::new_v4(),
					action: Action::Create,
					thing: Thing::new("t", "1"),
					value: crate::types::Value::None,
				},
			)
			.await;
		assert!(rx.recv().await.is_ok());
	}

	#[tokio::test]
	async fn send_after_disconnect_is_a_noop() {
		let registry = Registry::new();
		let session = Uuid::new_v4();
		let _rx = registry.connect(session);
		registry.disconnect(session);
		registry
			.send(
				session,
				Notification {
					live_id: Uuid::new_v4(),
					action: Action::Delete,
					thing: Thing::new("t", "1"),
					value: crate::types::Value::None,
				},
			)
			.await;
	}
}
