//! Outbound contracts consumed by the match core.
//!
//! The coordinator and finder only ever see these traits; the in-process
//! adapters live in [`crate::queue`], [`crate::state_store`],
//! [`crate::chat`], and [`crate::notify`]. Any backing store with atomic
//! per-key set/list operations can implement [`MatchQueue`].

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ChatRoomError, MatchQueueError, MatchStateError, NotifyError};
use crate::mbti::Mbti;
use crate::types::{ChatRoomSpec, MatchResult, MatchTicket, UserMatchState};

/// The 16-way partitioned waiting queue.
///
/// Each partition pairs an ordered sequence (FIFO of first-enqueue) with an
/// authoritative membership set. Cancelled users leave the set only; their
/// stale sequence entries ("ghosts") are discarded by a later
/// `dequeue_head`.
#[async_trait]
pub trait MatchQueue: Send + Sync {
    /// Atomically add a ticket to its partition. Fails with
    /// [`MatchQueueError::AlreadyQueued`] if the user is already a member.
    async fn enqueue(&self, ticket: &MatchTicket) -> Result<(), MatchQueueError>;

    /// Pop the oldest currently-valid ticket, discarding ghosts along the
    /// way. `None` when the partition holds no valid entries.
    async fn dequeue_head(&self, mbti: Mbti) -> Result<Option<MatchTicket>, MatchQueueError>;

    /// Remove the user from the membership set only. Returns whether the
    /// set actually contained them.
    async fn cancel(&self, user_id: &str, mbti: Mbti) -> Result<bool, MatchQueueError>;

    /// Count of currently-valid waiters (set size, never sequence length).
    async fn size(&self, mbti: Mbti) -> Result<usize, MatchQueueError>;

    /// Sizes of all target partitions in one round trip, sorted descending
    /// by size. Ordering among equal sizes is unspecified.
    async fn sorted_targets_by_size(
        &self,
        targets: &[Mbti],
    ) -> Result<Vec<(Mbti, usize)>, MatchQueueError>;

    /// Membership check against the set.
    async fn is_user_in_queue(&self, user_id: &str, mbti: Mbti) -> Result<bool, MatchQueueError>;
}

/// Per-user match state with a TTL on `Matched` records.
///
/// Exists to keep a just-paired user from being re-paired before they join
/// their room; it is not a registry of active chat rooms.
#[async_trait]
pub trait MatchState: Send + Sync {
    /// Current state, or `None` when absent or expired.
    async fn get(&self, user_id: &str) -> Result<Option<UserMatchState>, MatchStateError>;

    async fn set_queued(&self, user_id: &str, mbti: Mbti) -> Result<(), MatchStateError>;

    /// Record a fresh pairing for one user; the record reads as absent once
    /// `ttl` has elapsed.
    async fn set_matched(
        &self,
        user_id: &str,
        mbti: Mbti,
        room_id: &str,
        partner_id: &str,
        ttl: Duration,
    ) -> Result<(), MatchStateError>;

    async fn clear(&self, user_id: &str) -> Result<(), MatchStateError>;

    /// True iff the user is absent or merely queued; false while a
    /// `Matched` record is unexpired.
    async fn is_available_for_match(&self, user_id: &str) -> Result<bool, MatchStateError>;
}

/// Hand-off to the chat domain. Creation must be idempotent on `room_id`.
#[async_trait]
pub trait ChatRoomCreator: Send + Sync {
    async fn create_room(&self, spec: &ChatRoomSpec) -> Result<(), ChatRoomError>;
}

/// Push notification to the matched partner. At-most-once to the currently
/// connected session; a silent no-op when the user is not connected.
#[async_trait]
pub trait MatchNotifier: Send + Sync {
    async fn notify_match_success(
        &self,
        user_id: &str,
        payload: &MatchResult,
    ) -> Result<(), NotifyError>;
}
