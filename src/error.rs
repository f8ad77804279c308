use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::mbti::{InvalidMbti, Mbti};
use crate::types::TicketError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Errors from the waiting-queue port.
///
/// `AlreadyQueued` is the only domain error; everything else is a
/// retriable transport failure.
#[derive(Debug, thiserror::Error)]
pub enum MatchQueueError {
    #[error("user is already waiting in the {0} queue")]
    AlreadyQueued(Mbti),

    #[error("queue store error: {0}")]
    Store(String),
}

/// Errors from the per-user state port.
#[derive(Debug, thiserror::Error)]
pub enum MatchStateError {
    #[error("state store error: {0}")]
    Store(String),
}

/// Errors from the chat-room creation port.
#[derive(Debug, thiserror::Error)]
pub enum ChatRoomError {
    #[error("chat room creation failed: {0}")]
    Create(String),
}

/// Errors from the partner-notification port. Never retried and never
/// fatal to the enclosing request.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification send failed: {0}")]
    Send(String),
}

/// Coordinator-level error: whatever survives the single retry of an
/// idempotent port call surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("invalid match ticket: {0}")]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    Queue(#[from] MatchQueueError),

    #[error(transparent)]
    State(#[from] MatchStateError),

    #[error(transparent)]
    ChatRoom(#[from] ChatRoomError),
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Match(MatchError::Ticket(_)) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Match(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Match(MatchError::Ticket(_)) => "BAD_REQUEST",
            ServerError::Match(_) => "MATCH_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<InvalidMbti> for ServerError {
    fn from(err: InvalidMbti) -> Self {
        ServerError::BadRequest(err.to_string())
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
