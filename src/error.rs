use dns_message::MessageError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Message(#[from] MessageError),

    /// Socket level failure: bind, send, receive or name lookup.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("no address found for nameserver {0}")]
    Resolve(String),

    #[error("no reply within {0:?}")]
    Timeout(Duration),
}
