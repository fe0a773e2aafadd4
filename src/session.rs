use crate::{QueryError, SessionConfig};
use bytes::Bytes;
use dns_message::{Query, Response};
use std::future::Future;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info, instrument, warn};

type Result<T> = std::result::Result<T, QueryError>;

/// One query, one socket, one reply.
///
/// Every exchange opens its own socket, so independent sessions (or calls on
/// the same session) can run concurrently without sharing any state.
#[derive(Debug, Clone)]
pub struct QuerySession {
    config: SessionConfig,
}

impl QuerySession {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sends an already encoded message and returns the first datagram the
    /// nameserver sends back, cut to the receive buffer size.
    #[instrument(skip(self, message), fields(server = %self.config.nameserver))]
    pub async fn send_query(&self, message: &[u8]) -> Result<Bytes> {
        self.bounded(async {
            let socket = self.open().await?;
            self.send(&socket, message).await?;
            self.recv(&socket).await
        })
        .await
    }

    /// Sends `query` and waits for the response carrying the same ID.
    ///
    /// Datagrams that are not responses, or answer some other ID, are
    /// dropped and the wait continues until the deadline.
    #[instrument(skip(self, query), fields(server = %self.config.nameserver, id = query.header.id))]
    pub async fn query(&self, query: &Query) -> Result<Response> {
        let mut buf = Vec::with_capacity(512);
        query.to_bytes(&mut buf)?;
        let id = query.header.id;

        self.bounded(async {
            let socket = self.open().await?;
            self.send(&socket, &buf).await?;

            loop {
                let bytes = self.recv(&socket).await?;
                let response = Response::from_bytes(&bytes)?;
                if response.header.qr && response.header.id == id {
                    info!("Got back: id {} rcode {}", id, response.header.rcode);
                    return Ok(response);
                }
                warn!(
                    expected = id,
                    received = response.header.id,
                    qr = response.header.qr,
                    "Discarding unrelated datagram"
                );
            }
        })
        .await
    }

    /// Runs `exchange` under the configured deadline, if any.
    async fn bounded<F, T>(&self, exchange: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .map_err(|_| QueryError::Timeout(timeout))?,
            None => exchange.await,
        }
    }

    /// Resolves the nameserver and connects a fresh socket to it. Being
    /// connected, the socket only ever sees datagrams from that address.
    async fn open(&self) -> Result<UdpSocket> {
        let host = self.config.nameserver.as_str();
        let remote_addr = lookup_host((host, self.config.port))
            .await?
            .next()
            .ok_or_else(|| QueryError::Resolve(host.to_string()))?;

        // New socket on an ephemeral port in the nameserver's address family.
        let local_addr: SocketAddr = if remote_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local_addr).await?;
        socket.connect(remote_addr).await?;

        debug!(local = %socket.local_addr()?, remote = %remote_addr, "Socket ready");

        Ok(socket)
    }

    async fn send(&self, socket: &UdpSocket, message: &[u8]) -> Result<()> {
        let bytes_sent = socket.send(message).await?;
        info!("Sent {} of {} bytes", bytes_sent, message.len());
        Ok(())
    }

    async fn recv(&self, socket: &UdpSocket) -> Result<Bytes> {
        let mut buf = vec![0u8; self.config.recv_buffer_size];
        let len = socket.recv(&mut buf).await?;
        buf.truncate(len);

        debug!(bytes_received = len, "UDP response received");

        Ok(Bytes::from(buf))
    }
}
