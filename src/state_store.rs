//! In-process implementation of the per-user match state.
//!
//! Records live in a concurrent map; `Matched` expiry is lazy, checked on
//! every read the way a TTL-capable key-value store would age the record
//! out. A `Matched` record without a usable room id is an invariant
//! violation: it is logged and read as absent.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use dashmap::DashMap;

use crate::error::MatchStateError;
use crate::mbti::Mbti;
use crate::ports::MatchState;
use crate::types::UserMatchState;

/// Concurrent map of `user_id` to match state with lazy TTL expiry.
#[derive(Default)]
pub struct InMemoryMatchState {
    records: DashMap<String, UserMatchState>,
}

impl InMemoryMatchState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchState for InMemoryMatchState {
    async fn get(&self, user_id: &str) -> Result<Option<UserMatchState>, MatchStateError> {
        let now = Utc::now();
        let state = match self.records.get(user_id) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };

        if state.is_expired(now) {
            self.records.remove(user_id);
            return Ok(None);
        }

        if let UserMatchState::Matched { room_id, .. } = &state {
            if room_id.is_empty() {
                tracing::warn!(user_id = %user_id, "matched state without room id, treating as absent");
                self.records.remove(user_id);
                return Ok(None);
            }
        }

        Ok(Some(state))
    }

    async fn set_queued(&self, user_id: &str, mbti: Mbti) -> Result<(), MatchStateError> {
        self.records
            .insert(user_id.to_string(), UserMatchState::Queued { mbti });
        Ok(())
    }

    async fn set_matched(
        &self,
        user_id: &str,
        mbti: Mbti,
        room_id: &str,
        partner_id: &str,
        ttl: Duration,
    ) -> Result<(), MatchStateError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|e| MatchStateError::Store(format!("ttl out of range: {e}")))?;
        self.records.insert(
            user_id.to_string(),
            UserMatchState::Matched {
                mbti,
                room_id: room_id.to_string(),
                partner_id: partner_id.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<(), MatchStateError> {
        self.records.remove(user_id);
        Ok(())
    }

    async fn is_available_for_match(&self, user_id: &str) -> Result<bool, MatchStateError> {
        match self.get(user_id).await? {
            None | Some(UserMatchState::Queued { .. }) => Ok(true),
            Some(UserMatchState::Matched { .. }) => Ok(false),
        }
    }
}
