//! Wire boundary for voxelamming - JSON command protocol, TCP command server,
//! and the room-addressed snapshot transport.
//!
//! Accept commands from a host block layer:
//! ```ignore
//! let handler = Arc::new(Mutex::new(MySession::new()));
//! let _server = CommandServer::bind(handler, DEFAULT_PORT).await?;
//! ```
//!
//! Deliver a serialized snapshot to a renderer relay:
//! ```ignore
//! RoomClient::new(DEFAULT_RELAY_ADDR).deliver("1000", &payload).await?;
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;

pub use client::RoomClient;
pub use error::LinkError;
pub use protocol::*;
pub use server::{CommandHandler, CommandServer};

/// Default command server port
pub const DEFAULT_PORT: u16 = 9743;

/// Default renderer relay address
pub const DEFAULT_RELAY_ADDR: &str = "127.0.0.1:9744";
