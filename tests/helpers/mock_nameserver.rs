#![allow(dead_code)]
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock answers each datagram it receives.
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// A NOERROR response with one A record for the question.
    Answer,
    /// Never replies.
    Silent,
    /// A response for a different ID and a copy of the query, then the answer.
    UnrelatedFirst,
    /// A response whose body is padded out to this many bytes.
    Oversized(usize),
    /// A datagram shorter than a header.
    Short,
}

pub struct MockNameserver {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockNameserver {
    pub async fn start(behaviour: Behaviour) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            for reply in Self::replies(behaviour, &buf[..len]) {
                                let _ = socket.send_to(&reply, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn replies(behaviour: Behaviour, query: &[u8]) -> Vec<Vec<u8>> {
        match behaviour {
            Behaviour::Answer => vec![Self::answer(query)],
            Behaviour::Silent => vec![],
            Behaviour::UnrelatedFirst => {
                let mut other = Self::answer(query);
                other[0] ^= 0xff;
                other[1] ^= 0xff;
                vec![other, query.to_vec(), Self::answer(query)]
            }
            Behaviour::Oversized(size) => {
                let mut reply = Self::answer(query);
                reply.resize(size, 0xaa);
                vec![reply]
            }
            Behaviour::Short => vec![vec![0x00, 0x01, 0x81, 0x80, 0x00]],
        }
    }

    fn answer(query: &[u8]) -> Vec<u8> {
        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&query[0..2]);

        // QR, RD copied, RA.
        response.push(0x80 | (query[2] & 0x01));
        response.push(0x80);

        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        response.extend_from_slice(&[
            0xc0, 0x0c, // name pointer to the question
            0x00, 0x01, // type A
            0x00, 0x01, // class IN
            0x00, 0x00, 0x00, 0x3c, // ttl 60
            0x00, 0x04, // rdlength
            127, 0, 0, 1,
        ]);

        response
    }
}

impl Drop for MockNameserver {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
