//! Partner discovery across compatibility tiers.

use std::sync::Arc;

use crate::compatibility;
use crate::error::MatchQueueError;
use crate::ports::MatchQueue;
use crate::types::MatchTicket;

/// Searches the waiting queues for a compatible partner.
///
/// Candidate partitions are visited in descending order of current size,
/// regardless of tier: a larger queue is drained before a smaller one even
/// when the smaller queue holds a higher-tier match. This is deliberate
/// system-wide congestion relief.
pub struct MatchFinder {
    queue: Arc<dyn MatchQueue>,
}

impl MatchFinder {
    pub fn new(queue: Arc<dyn MatchQueue>) -> Self {
        Self { queue }
    }

    /// Return the oldest valid ticket from the fullest compatible
    /// partition, or `None` when every candidate queue is empty.
    pub async fn find_partner(
        &self,
        my_ticket: &MatchTicket,
        level: u8,
    ) -> Result<Option<MatchTicket>, MatchQueueError> {
        let targets = compatibility::targets(my_ticket.mbti, level);
        if targets.is_empty() {
            return Ok(None);
        }

        let sorted = self.queue.sorted_targets_by_size(&targets).await?;

        for (mbti, size) in sorted {
            if size == 0 {
                continue;
            }
            // Size can go stale between the bulk read and this pop; an
            // emptied partition just yields None and the scan moves on.
            if let Some(partner) = self.queue.dequeue_head(mbti).await? {
                return Ok(Some(partner));
            }
        }

        Ok(None)
    }
}
