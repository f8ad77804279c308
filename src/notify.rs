//! Partner notification over WebSocket.
//!
//! A process-wide [`ConnectionRegistry`] maps each user to the outbound
//! channel of their live notification socket. The registry is created once
//! at startup and injected into both the WebSocket route (which registers
//! and deregisters connections) and the [`WebSocketNotifier`] adapter
//! (which pushes match payloads). Delivery is at-most-once: a user without
//! a live connection is silently skipped.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::NotifyError;
use crate::ports::MatchNotifier;
use crate::types::MatchResult;

/// Registry of live notification connections, keyed by user id.
///
/// A user reconnecting replaces their previous sender; the stale socket
/// task observes its channel closing and tears itself down.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<String, mpsc::UnboundedSender<String>>,
}

impl ConnectionRegistry {
    /// Create the process-wide registry.
    pub fn init() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a user's outbound channel. Returns the replaced sender, if
    /// the user was already connected.
    pub fn register(
        &self,
        user_id: &str,
        sender: mpsc::UnboundedSender<String>,
    ) -> Option<mpsc::UnboundedSender<String>> {
        tracing::debug!(user_id = %user_id, "notification socket connected");
        self.connections.insert(user_id.to_string(), sender)
    }

    /// Detach a user. A no-op if a newer connection already replaced the
    /// one being torn down.
    pub fn unregister(&self, user_id: &str, sender: &mpsc::UnboundedSender<String>) {
        let removed = self
            .connections
            .remove_if(user_id, |_, current| current.same_channel(sender));
        if removed.is_some() {
            tracing::debug!(user_id = %user_id, "notification socket disconnected");
        }
    }

    pub fn is_connected(&self, user_id: &str) -> bool {
        self.connections.contains_key(user_id)
    }

    /// Send a text frame to the user's live connection. `Ok(false)` when
    /// the user is not connected.
    pub fn send_to_user(&self, user_id: &str, text: String) -> Result<bool, NotifyError> {
        let Some(sender) = self.connections.get(user_id) else {
            return Ok(false);
        };
        sender
            .send(text)
            .map_err(|_| NotifyError::Send(format!("connection for {user_id} closed")))?;
        Ok(true)
    }

    /// Drop every connection; the socket tasks drain and close.
    pub fn shutdown(&self) {
        let open = self.connections.len();
        if open > 0 {
            tracing::info!(connections = open, "closing notification sockets");
        }
        self.connections.clear();
    }
}

/// [`MatchNotifier`] adapter that pushes JSON payloads through the
/// connection registry.
pub struct WebSocketNotifier {
    registry: Arc<ConnectionRegistry>,
}

impl WebSocketNotifier {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MatchNotifier for WebSocketNotifier {
    async fn notify_match_success(
        &self,
        user_id: &str,
        payload: &MatchResult,
    ) -> Result<(), NotifyError> {
        let message = serde_json::to_string(payload)
            .map_err(|e| NotifyError::Send(format!("payload encode: {e}")))?;

        if self.registry.send_to_user(user_id, message)? {
            tracing::debug!(user_id = %user_id, "match notification delivered");
        } else {
            tracing::debug!(user_id = %user_id, "user not connected, notification skipped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbti::Mbti;
    use crate::types::MatchTicket;

    #[tokio::test]
    async fn notifier_delivers_json_to_a_connected_user() {
        let registry = ConnectionRegistry::init();
        let notifier = WebSocketNotifier::new(registry.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register("partner", tx);

        let me = MatchTicket::new("requester", Mbti::INFP).unwrap();
        let payload = MatchResult::matched("r1", Mbti::ENFJ, &me);
        notifier
            .notify_match_success("partner", &payload)
            .await
            .unwrap();

        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["status"], "matched");
        assert_eq!(value["roomId"], "r1");
        assert_eq!(value["partner"]["user_id"], "requester");
    }

    #[tokio::test]
    async fn notifying_a_disconnected_user_is_a_no_op() {
        let registry = ConnectionRegistry::init();
        let notifier = WebSocketNotifier::new(registry);

        let me = MatchTicket::new("requester", Mbti::INFP).unwrap();
        let payload = MatchResult::matched("r1", Mbti::ENFJ, &me);
        notifier
            .notify_match_success("nobody", &payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reconnecting_replaces_the_previous_sender() {
        let registry = ConnectionRegistry::init();

        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        registry.register("u1", old_tx.clone());
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();
        registry.register("u1", new_tx);

        // Tearing down the old socket must not detach the new one.
        registry.unregister("u1", &old_tx);
        assert!(registry.is_connected("u1"));

        registry.send_to_user("u1", "hello".into()).unwrap();
        assert_eq!(new_rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn shutdown_closes_all_connections() {
        let registry = ConnectionRegistry::init();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register("u1", tx);

        registry.shutdown();
        assert!(!registry.is_connected("u1"));
        assert!(rx.recv().await.is_none());
    }
}
