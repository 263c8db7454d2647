use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::User;
use crate::ws::ServerFrame;

/// Lifecycle of a chat socket. A session starts out connected but
/// anonymous; presenting a valid auth frame binds a user to it. The
/// session ends when its connection task returns.
#[derive(Debug)]
enum SessionState {
    Connected,
    Authenticated(User),
}

/// Per-connection session, owned by the connection task
#[derive(Debug)]
pub struct WsSession {
    pub conn_id: Uuid,
    pub chat_room_id: i64,
    state: SessionState,
}

impl WsSession {
    pub fn new(conn_id: Uuid, chat_room_id: i64) -> Self {
        Self {
            conn_id,
            chat_room_id,
            state: SessionState::Connected,
        }
    }

    /// Bind an authenticated user to this session
    pub fn authenticate(&mut self, user: User) {
        self.state = SessionState::Authenticated(user);
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Connected => None,
        }
    }
}

/// Client connection handle held by the registry for fan-out
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub conn_id: Uuid,
    pub sender: mpsc::Sender<ServerFrame>,
}

impl ClientHandle {
    pub fn new(conn_id: Uuid, sender: mpsc::Sender<ServerFrame>) -> Self {
        Self { conn_id, sender }
    }
}
