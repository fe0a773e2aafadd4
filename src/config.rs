use dns_message::HEADER_LEN;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 53;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// RFC1035 - UDP messages are limited to 512 bytes, so just double it.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 1024;

/// Where and how a [`crate::QuerySession`] talks to its nameserver.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Host name or IP literal of the nameserver.
    pub nameserver: String,

    pub port: u16,

    /// Deadline for a whole exchange. `None` waits for a reply forever.
    pub timeout: Option<Duration>,

    /// Size of the receive buffer. Longer replies are cut to this length.
    pub recv_buffer_size: usize,
}

impl SessionConfig {
    pub fn new(nameserver: impl Into<String>) -> Self {
        Self {
            nameserver: nameserver.into(),
            port: DEFAULT_PORT,
            timeout: Some(DEFAULT_TIMEOUT),
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Never smaller than a header, anything less could not be decoded.
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size.max(HEADER_LEN);
        self
    }
}
