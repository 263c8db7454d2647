pub mod handler;
pub mod messages;
pub mod registry;
pub mod session;

pub use handler::ws_routes;
pub use messages::{ClientFrame, ErrorFrame, ServerFrame};
pub use registry::ChannelRegistry;
pub use session::{ClientHandle, WsSession};
