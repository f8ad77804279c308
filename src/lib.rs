//! MBTI Match Server - compatibility match-making over HTTP and WebSocket
//!
//! This crate implements a concurrent, multi-queue pairing engine. A match
//! request tagged with an MBTI code and an expansion `level` is either
//! paired with a compatible waiting user (creating a chat room and
//! notifying the partner) or parked in one of 16 per-MBTI waiting queues.
//!
//! # Architecture
//!
//! The core is driven by two operations, `request_match` and
//! `cancel_match`, and consumes four outbound ports:
//!
//! - [`ports::MatchQueue`]: 16-way partitioned waiting queue with O(1)
//!   enqueue/dequeue/cancel and lazy removal of cancelled "ghost" tickets
//! - [`ports::MatchState`]: per-user state record with a TTL on `matched`
//! - [`ports::ChatRoomCreator`]: chat-room hand-off, idempotent on room id
//! - [`ports::MatchNotifier`]: at-most-once partner notification
//!
//! [`coordinator::MatchCoordinator`] orchestrates the ports;
//! [`finder::MatchFinder`] selects the candidate queue, draining larger
//! queues first across compatibility tiers. In-process adapters back all
//! four ports, and the HTTP/WebSocket surface lives under [`routes`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mbti_match::MatchServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MatchServerConfig::load()?;
//!     mbti_match::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `POST /match/request` - Request a match (`{user_id, mbti, level}`)
//! - `POST /match/cancel` - Cancel a waiting request
//! - `GET /match/queue/{mbti}` - Waiting count for one queue (diagnostic)
//! - `GET /ws/match/{user_id}` - Match notification socket

pub mod chat;
pub mod compatibility;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod finder;
pub mod mbti;
pub mod middleware;
pub mod notify;
pub mod ports;
pub mod queue;
pub mod routes;
pub mod server;
pub mod state;
pub mod state_store;
pub mod types;

pub use config::MatchServerConfig;
pub use coordinator::MatchCoordinator;
pub use error::{MatchError, ServerError, ServerResult};
pub use finder::MatchFinder;
pub use mbti::Mbti;
pub use server::{build_router, start_server};
pub use state::AppState;
pub use types::{CancelResult, MatchResult, MatchTicket, UserMatchState};
