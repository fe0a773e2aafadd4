//! Sends DNS queries over UDP and decodes the header of the reply.

mod config;
mod error;
mod session;

pub use config::{SessionConfig, DEFAULT_PORT, DEFAULT_RECV_BUFFER_SIZE, DEFAULT_TIMEOUT};
pub use error::QueryError;
pub use session::QuerySession;
