//! Domain types for the match engine: waiting tickets, per-user match
//! state, and the result shapes returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mbti::Mbti;

/// Error returned when a ticket is built from invalid parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketError {
    #[error("user id must not be empty")]
    EmptyUserId,
}

/// A user's intent to be matched in one MBTI partition.
///
/// Immutable after creation; two tickets are equal iff their `user_id` is
/// equal. Serialized into queue sequences as `{userId, mbti, createdAt}`
/// with an ISO-8601 timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTicket {
    pub user_id: String,
    pub mbti: Mbti,
    pub created_at: DateTime<Utc>,
}

impl MatchTicket {
    pub fn new(user_id: impl Into<String>, mbti: Mbti) -> Result<Self, TicketError> {
        let user_id = user_id.into();
        if user_id.is_empty() {
            return Err(TicketError::EmptyUserId);
        }
        Ok(Self {
            user_id,
            mbti,
            created_at: Utc::now(),
        })
    }
}

impl PartialEq for MatchTicket {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}

impl Eq for MatchTicket {}

/// Per-user match state held between a pairing and the user joining the
/// chat room. Stored as a small JSON object with `state` as discriminant.
///
/// `Matched` carries an absolute expiry; a record past it reads as absent.
/// There is no `Chatting` state: once the room is handed off, the user is
/// free to request further, independent matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UserMatchState {
    Queued {
        mbti: Mbti,
    },
    Matched {
        mbti: Mbti,
        room_id: String,
        partner_id: String,
        expires_at: DateTime<Utc>,
    },
}

impl UserMatchState {
    /// True for `Matched` records whose expiry has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            UserMatchState::Queued { .. } => false,
            UserMatchState::Matched { expires_at, .. } => *expires_at <= now,
        }
    }
}

/// The partner half of a match response. `mbti` is `None` on re-entry
/// responses: partner MBTI is not retained in the state record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerInfo {
    pub user_id: String,
    pub mbti: Option<Mbti>,
}

/// Outcome of a match request, in the wire shape returned to clients and
/// pushed to partners over the notification socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    Waiting {
        message: String,
        my_mbti: Mbti,
        wait_count: usize,
    },
    AlreadyWaiting {
        message: String,
        my_mbti: Mbti,
        wait_count: usize,
    },
    Matched {
        message: String,
        #[serde(rename = "roomId")]
        room_id: String,
        my_mbti: Mbti,
        partner: PartnerInfo,
    },
    AlreadyMatched {
        message: String,
        #[serde(rename = "roomId")]
        room_id: String,
        my_mbti: Mbti,
        partner: PartnerInfo,
    },
}

impl MatchResult {
    pub fn waiting(my_mbti: Mbti, wait_count: usize) -> Self {
        MatchResult::Waiting {
            message: "registered in the match queue".to_string(),
            my_mbti,
            wait_count,
        }
    }

    pub fn already_waiting(my_mbti: Mbti, wait_count: usize) -> Self {
        MatchResult::AlreadyWaiting {
            message: "already waiting in the match queue".to_string(),
            my_mbti,
            wait_count,
        }
    }

    pub fn matched(room_id: impl Into<String>, my_mbti: Mbti, partner: &MatchTicket) -> Self {
        MatchResult::Matched {
            message: "match found".to_string(),
            room_id: room_id.into(),
            my_mbti,
            partner: PartnerInfo {
                user_id: partner.user_id.clone(),
                mbti: Some(partner.mbti),
            },
        }
    }

    pub fn already_matched(
        room_id: impl Into<String>,
        my_mbti: Mbti,
        partner_id: impl Into<String>,
    ) -> Self {
        MatchResult::AlreadyMatched {
            message: "already matched, join your chat room".to_string(),
            room_id: room_id.into(),
            my_mbti,
            partner: PartnerInfo {
                user_id: partner_id.into(),
                mbti: None,
            },
        }
    }
}

/// Outcome of a cancel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CancelResult {
    Cancelled { message: String },
    Fail { message: String },
}

impl CancelResult {
    pub fn cancelled() -> Self {
        CancelResult::Cancelled {
            message: "match request cancelled".to_string(),
        }
    }

    pub fn fail() -> Self {
        CancelResult::Fail {
            message: "user not found in the match queue".to_string(),
        }
    }
}

/// One participant of a freshly created chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    pub user_id: String,
    pub mbti: Mbti,
}

/// Payload handed to the chat domain when a pair is formed. Creation is
/// idempotent on `room_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRoomSpec {
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub users: Vec<ChatUser>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_compare_by_user_id_only() {
        let a = MatchTicket::new("u1", Mbti::INFP).unwrap();
        let b = MatchTicket::new("u1", Mbti::ESTJ).unwrap();
        let c = MatchTicket::new("u2", Mbti::INFP).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ticket_requires_a_user_id() {
        assert_eq!(
            MatchTicket::new("", Mbti::INFP).unwrap_err(),
            TicketError::EmptyUserId
        );
    }

    #[test]
    fn ticket_wire_shape_uses_camel_case_keys() {
        let ticket = MatchTicket::new("u1", Mbti::ENTP).unwrap();
        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["mbti"], "ENTP");
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn state_union_round_trips_with_discriminant() {
        let state = UserMatchState::Matched {
            mbti: Mbti::INFJ,
            room_id: "r1".into(),
            partner_id: "p1".into(),
            expires_at: Utc::now(),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["state"], "matched");
        let back: UserMatchState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn match_result_statuses_follow_the_wire_contract() {
        let waiting = serde_json::to_value(MatchResult::waiting(Mbti::INFP, 3)).unwrap();
        assert_eq!(waiting["status"], "waiting");
        assert_eq!(waiting["wait_count"], 3);

        let partner = MatchTicket::new("p1", Mbti::ENFJ).unwrap();
        let matched = serde_json::to_value(MatchResult::matched("r1", Mbti::INFP, &partner)).unwrap();
        assert_eq!(matched["status"], "matched");
        assert_eq!(matched["roomId"], "r1");
        assert_eq!(matched["partner"]["user_id"], "p1");
        assert_eq!(matched["partner"]["mbti"], "ENFJ");

        let reentry =
            serde_json::to_value(MatchResult::already_matched("r1", Mbti::INFP, "p1")).unwrap();
        assert_eq!(reentry["status"], "already_matched");
        assert!(reentry["partner"]["mbti"].is_null());
    }
}
