//! Top-level orchestration of match requests and cancellations.
//!
//! One `request_match` call runs: re-entry check, self-cleanup from the
//! user's own partition, partner discovery, the partner availability gate,
//! then either the pair-success path (room creation, state writes, partner
//! notification) or queue fallback. Every port call is a suspension point;
//! idempotent calls that fail transiently are retried exactly once.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{MatchError, MatchQueueError};
use crate::finder::MatchFinder;
use crate::mbti::Mbti;
use crate::ports::{ChatRoomCreator, MatchNotifier, MatchQueue, MatchState};
use crate::types::{CancelResult, ChatRoomSpec, ChatUser, MatchResult, MatchTicket, UserMatchState};

/// Retry an idempotent port call once before giving up.
async fn retry_once<T, E, F, Fut>(mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(first) => {
            tracing::warn!(error = %first, "port call failed, retrying once");
            op().await
        }
    }
}

/// Entry point for the match domain: pairs a requester with a waiting
/// partner or parks them in the queue.
pub struct MatchCoordinator {
    queue: Arc<dyn MatchQueue>,
    state: Arc<dyn MatchState>,
    chat: Arc<dyn ChatRoomCreator>,
    notifier: Arc<dyn MatchNotifier>,
    finder: MatchFinder,
    match_ttl: Duration,
}

impl MatchCoordinator {
    pub fn new(
        queue: Arc<dyn MatchQueue>,
        state: Arc<dyn MatchState>,
        chat: Arc<dyn ChatRoomCreator>,
        notifier: Arc<dyn MatchNotifier>,
        match_ttl: Duration,
    ) -> Self {
        let finder = MatchFinder::new(queue.clone());
        Self {
            queue,
            state,
            chat,
            notifier,
            finder,
            match_ttl,
        }
    }

    /// Handle a match request for `user_id` at the given expansion level.
    pub async fn request_match(
        &self,
        user_id: &str,
        mbti: Mbti,
        level: u8,
    ) -> Result<MatchResult, MatchError> {
        // Re-entry: a freshly matched user should join their room first.
        if let Some(UserMatchState::Matched {
            room_id,
            partner_id,
            ..
        }) = retry_once(|| self.state.get(user_id)).await?
        {
            return Ok(MatchResult::already_matched(room_id, mbti, partner_id));
        }

        // Self-cleanup: a queued user re-requesting (possibly with another
        // level) leaves their old entry behind as a ghost and searches
        // fresh.
        if retry_once(|| self.queue.is_user_in_queue(user_id, mbti)).await? {
            retry_once(|| self.queue.cancel(user_id, mbti)).await?;
        }

        let my_ticket = MatchTicket::new(user_id, mbti)?;

        let partner = self.finder.find_partner(&my_ticket, level).await?;

        let Some(partner) = partner else {
            return self.park(&my_ticket).await;
        };

        // Availability gate: the partner may have been matched elsewhere
        // between their enqueue and this dequeue. Their ticket is discarded;
        // they will re-request.
        if !retry_once(|| self.state.is_available_for_match(&partner.user_id)).await? {
            tracing::info!(
                user_id = %user_id,
                partner_id = %partner.user_id,
                "dequeued partner no longer available, queueing requester"
            );
            return self.park(&my_ticket).await;
        }

        self.pair(&my_ticket, &partner).await
    }

    /// Pair-success path: create the room, record both states, notify the
    /// partner. Room creation is fatal to the request; the rest is
    /// best-effort once the room exists.
    async fn pair(
        &self,
        my_ticket: &MatchTicket,
        partner: &MatchTicket,
    ) -> Result<MatchResult, MatchError> {
        let room_id = Uuid::new_v4().to_string();
        let spec = ChatRoomSpec {
            room_id: room_id.clone(),
            users: vec![
                ChatUser {
                    user_id: my_ticket.user_id.clone(),
                    mbti: my_ticket.mbti,
                },
                ChatUser {
                    user_id: partner.user_id.clone(),
                    mbti: partner.mbti,
                },
            ],
            timestamp: Utc::now(),
        };
        retry_once(|| self.chat.create_room(&spec)).await?;

        for (user, other) in [(my_ticket, partner), (partner, my_ticket)] {
            if let Err(e) = retry_once(|| {
                self.state.set_matched(
                    &user.user_id,
                    user.mbti,
                    &room_id,
                    &other.user_id,
                    self.match_ttl,
                )
            })
            .await
            {
                tracing::error!(user_id = %user.user_id, error = %e, "failed to record matched state");
            }
        }

        // The partner sees the same result shape from their perspective.
        // Notification is at-most-once: never retried, never fatal.
        let partner_payload = MatchResult::matched(&room_id, partner.mbti, my_ticket);
        if let Err(e) = self
            .notifier
            .notify_match_success(&partner.user_id, &partner_payload)
            .await
        {
            tracing::error!(partner_id = %partner.user_id, error = %e, "partner notification failed");
        }

        tracing::info!(
            room_id = %room_id,
            user_id = %my_ticket.user_id,
            partner_id = %partner.user_id,
            "match formed"
        );
        Ok(MatchResult::matched(room_id, my_ticket.mbti, partner))
    }

    /// Queue fallback: enqueue the requester and record the queued state.
    async fn park(&self, ticket: &MatchTicket) -> Result<MatchResult, MatchError> {
        match self.queue.enqueue(ticket).await {
            Ok(()) => {
                retry_once(|| self.state.set_queued(&ticket.user_id, ticket.mbti)).await?;
                let wait_count = self.waiting_count(ticket.mbti).await?;
                Ok(MatchResult::waiting(ticket.mbti, wait_count))
            }
            Err(MatchQueueError::AlreadyQueued(_)) => {
                let wait_count = self.waiting_count(ticket.mbti).await?;
                Ok(MatchResult::already_waiting(ticket.mbti, wait_count))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cancel a waiting request. The state record is cleared regardless of
    /// whether the queue still held the user.
    pub async fn cancel_match(
        &self,
        user_id: &str,
        mbti: Mbti,
    ) -> Result<CancelResult, MatchError> {
        let removed = retry_once(|| self.queue.cancel(user_id, mbti)).await?;
        retry_once(|| self.state.clear(user_id)).await?;

        if removed {
            tracing::info!(user_id = %user_id, mbti = %mbti, "match request cancelled");
            Ok(CancelResult::cancelled())
        } else {
            Ok(CancelResult::fail())
        }
    }

    /// Current number of valid waiters in one partition.
    pub async fn waiting_count(&self, mbti: Mbti) -> Result<usize, MatchError> {
        Ok(retry_once(|| self.queue.size(mbti)).await?)
    }
}
