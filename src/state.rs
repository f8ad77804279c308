use std::sync::Arc;

use crate::chat::InMemoryChatRooms;
use crate::config::MatchServerConfig;
use crate::coordinator::MatchCoordinator;
use crate::notify::{ConnectionRegistry, WebSocketNotifier};
use crate::queue::InMemoryMatchQueue;
use crate::state_store::InMemoryMatchState;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<MatchServerConfig>,

    /// Match orchestration (shared across requests)
    pub coordinator: Arc<MatchCoordinator>,

    /// Live notification sockets, shared with the WebSocket route
    pub registry: Arc<ConnectionRegistry>,

    /// Created chat rooms (in-memory backend for now)
    pub chat_rooms: Arc<InMemoryChatRooms>,
}

impl AppState {
    /// Create new application state with the in-process adapters wired in
    pub fn new(config: MatchServerConfig) -> Self {
        let registry = ConnectionRegistry::init();
        let chat_rooms = Arc::new(InMemoryChatRooms::new());

        let coordinator = Arc::new(MatchCoordinator::new(
            Arc::new(InMemoryMatchQueue::new()),
            Arc::new(InMemoryMatchState::new()),
            chat_rooms.clone(),
            Arc::new(WebSocketNotifier::new(registry.clone())),
            config.match_ttl(),
        ));

        Self {
            config: Arc::new(config),
            coordinator,
            registry,
            chat_rooms,
        }
    }
}
