//! Default adapter for the chat-room creation port.
//!
//! Chat persistence proper belongs to the chat domain; the match core only
//! needs the hand-off to succeed and to stay idempotent on the room id, so
//! this adapter records rooms in a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::ChatRoomError;
use crate::ports::ChatRoomCreator;
use crate::types::ChatRoomSpec;

/// In-process chat-room sink, idempotent on `room_id`.
#[derive(Default)]
pub struct InMemoryChatRooms {
    rooms: DashMap<String, ChatRoomSpec>,
}

impl InMemoryChatRooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a created room, mainly for diagnostics and tests.
    pub fn room(&self, room_id: &str) -> Option<ChatRoomSpec> {
        self.rooms.get(room_id).map(|entry| entry.value().clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[async_trait]
impl ChatRoomCreator for InMemoryChatRooms {
    async fn create_room(&self, spec: &ChatRoomSpec) -> Result<(), ChatRoomError> {
        if self.rooms.contains_key(&spec.room_id) {
            tracing::debug!(room_id = %spec.room_id, "duplicate room create ignored");
            return Ok(());
        }
        self.rooms.insert(spec.room_id.clone(), spec.clone());
        tracing::info!(
            room_id = %spec.room_id,
            users = spec.users.len(),
            "chat room created"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbti::Mbti;
    use crate::types::ChatUser;
    use chrono::Utc;

    fn spec(room_id: &str) -> ChatRoomSpec {
        ChatRoomSpec {
            room_id: room_id.to_string(),
            users: vec![
                ChatUser {
                    user_id: "a".into(),
                    mbti: Mbti::INFP,
                },
                ChatUser {
                    user_id: "b".into(),
                    mbti: Mbti::ENFJ,
                },
            ],
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_is_idempotent_on_room_id() {
        let rooms = InMemoryChatRooms::new();
        rooms.create_room(&spec("r1")).await.unwrap();
        rooms.create_room(&spec("r1")).await.unwrap();

        assert_eq!(rooms.room_count(), 1);
        assert_eq!(rooms.room("r1").unwrap().users.len(), 2);
    }
}
