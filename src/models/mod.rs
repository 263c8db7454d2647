pub mod message;
pub mod room;
pub mod user;

// -----------------------------
// Room module re-exports
// -----------------------------
pub use room::{ChatRoom, ChatRoomResponse, ChatRoomsListResponse, DirectRoomRequest};

// -----------------------------
// Message module re-exports
// -----------------------------
pub use message::{Message, MessageCreate, MessageListResponse};

// -----------------------------
// User module re-exports
// -----------------------------
pub use user::{
    AvatarUploadResponse, Claims, DisplayNameUpdate, LoginRequest, MeResponse, RegisterRequest,
    RegisterResponse, TokenResponse, User, UserDisplayResponse,
};
