use serde::{Deserialize, Serialize};

use crate::models::{Message, MessageCreate};

// ==================== Client -> Server Frames ====================

/// Frames a client may send over a chat socket. The tag closes the set:
/// unknown types or missing fields fail deserialization and are rejected
/// as validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Present a bearer token to bind a user to this session
    Auth { token: String },
    /// Submit a message to the room the session is bound to
    Message { message: MessageCreate },
}

// ==================== Server -> Client Frames ====================

/// Frames the server sends to chat clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// A stored message, fanned out to every subscriber of its room
    Message { message: Message },
    /// Session-scoped error, mirroring the HTTP status taxonomy
    Error { error: ErrorFrame },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub code: u16,
    pub message: String,
}

impl ServerFrame {
    pub fn message(message: Message) -> Self {
        ServerFrame::Message { message }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        ServerFrame::Error {
            error: ErrorFrame {
                code,
                message: message.into(),
            },
        }
    }
}
