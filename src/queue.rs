//! In-process implementation of the waiting queue.
//!
//! Each MBTI code owns one partition: a sequence of serialized tickets plus
//! a membership set, mutated together under a single lock so enqueue stays
//! atomic against concurrent enqueue/cancel for the same user. Cancel only
//! touches the set; the dangling sequence entry is collected lazily by the
//! next `dequeue_head`. Sequence entries carry the same JSON payload a
//! list-capable key-value store would hold.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::MatchQueueError;
use crate::mbti::Mbti;
use crate::ports::MatchQueue;
use crate::types::MatchTicket;

#[derive(Default)]
struct Partition {
    seq: VecDeque<String>,
    members: HashSet<String>,
}

/// 16-way partitioned in-memory queue with lazy ghost collection.
pub struct InMemoryMatchQueue {
    partitions: [Mutex<Partition>; Mbti::COUNT],
}

impl InMemoryMatchQueue {
    pub fn new() -> Self {
        Self {
            partitions: std::array::from_fn(|_| Mutex::new(Partition::default())),
        }
    }

    fn partition(&self, mbti: Mbti) -> &Mutex<Partition> {
        &self.partitions[mbti.index()]
    }
}

impl Default for InMemoryMatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchQueue for InMemoryMatchQueue {
    async fn enqueue(&self, ticket: &MatchTicket) -> Result<(), MatchQueueError> {
        let payload = serde_json::to_string(ticket)
            .map_err(|e| MatchQueueError::Store(format!("ticket encode: {e}")))?;

        let mut partition = self
            .partition(ticket.mbti)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if partition.members.contains(&ticket.user_id) {
            return Err(MatchQueueError::AlreadyQueued(ticket.mbti));
        }
        partition.members.insert(ticket.user_id.clone());
        partition.seq.push_back(payload);

        tracing::debug!(user_id = %ticket.user_id, mbti = %ticket.mbti, "enqueued");
        Ok(())
    }

    async fn dequeue_head(&self, mbti: Mbti) -> Result<Option<MatchTicket>, MatchQueueError> {
        let mut partition = self
            .partition(mbti)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Pop until a sequence entry is still backed by the set.
        while let Some(payload) = partition.seq.pop_front() {
            let ticket: MatchTicket = match serde_json::from_str(&payload) {
                Ok(ticket) => ticket,
                Err(e) => {
                    // Invariant violation: undecodable sequence entry.
                    // Treated as a ghost, never fatal.
                    tracing::warn!(mbti = %mbti, error = %e, "discarding corrupt queue entry");
                    continue;
                }
            };

            if partition.members.remove(&ticket.user_id) {
                tracing::debug!(user_id = %ticket.user_id, mbti = %mbti, "dequeued");
                return Ok(Some(ticket));
            }
            // Ghost: the user cancelled after this entry was appended.
            tracing::debug!(user_id = %ticket.user_id, mbti = %mbti, "skipped ghost ticket");
        }
        Ok(None)
    }

    async fn cancel(&self, user_id: &str, mbti: Mbti) -> Result<bool, MatchQueueError> {
        let mut partition = self
            .partition(mbti)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let removed = partition.members.remove(user_id);
        if removed {
            tracing::debug!(user_id = %user_id, mbti = %mbti, "cancelled, ghost left in sequence");
        }
        Ok(removed)
    }

    async fn size(&self, mbti: Mbti) -> Result<usize, MatchQueueError> {
        let partition = self
            .partition(mbti)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(partition.members.len())
    }

    async fn sorted_targets_by_size(
        &self,
        targets: &[Mbti],
    ) -> Result<Vec<(Mbti, usize)>, MatchQueueError> {
        let mut sizes: Vec<(Mbti, usize)> = Vec::with_capacity(targets.len());
        for &mbti in targets {
            let partition = self
                .partition(mbti)
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            sizes.push((mbti, partition.members.len()));
        }
        sizes.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(sizes)
    }

    async fn is_user_in_queue(&self, user_id: &str, mbti: Mbti) -> Result<bool, MatchQueueError> {
        let partition = self
            .partition(mbti)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(partition.members.contains(user_id))
    }
}
