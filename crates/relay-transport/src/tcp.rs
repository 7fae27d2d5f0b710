//! TCP transport implementation.

use async_trait::async_trait;
use bytes::Bytes;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use crate::traits::{Connection, Listener, RecvHalf, SendHalf, TransportError};

/// TCP listener transport.
pub struct TcpTransport {
    listener: TcpListener,
    read_buffer_size: usize,
}

impl TcpTransport {
    /// Bind to the given address.
    ///
    /// `read_buffer_size` caps the chunk returned by each `recv` call on
    /// accepted connections.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails; this is the fatal startup path.
    pub async fn bind(addr: SocketAddr, read_buffer_size: usize) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await.map_err(TransportError::Io)?;
        info!("TCP transport listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            read_buffer_size,
        })
    }
}

#[async_trait]
impl Listener for TcpTransport {
    async fn accept(&self) -> Result<Box<dyn Connection>, TransportError> {
        let (stream, addr) = self.listener.accept().await.map_err(TransportError::Io)?;
        debug!("Accepted connection from {}", addr);
        Ok(Box::new(TcpConnection::new(
            stream,
            addr,
            self.read_buffer_size,
        )))
    }

    fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener.local_addr().map_err(TransportError::Io)
    }
}

/// One accepted TCP connection.
pub struct TcpConnection {
    stream: TcpStream,
    remote_addr: SocketAddr,
    read_buffer_size: usize,
}

impl TcpConnection {
    fn new(stream: TcpStream, remote_addr: SocketAddr, read_buffer_size: usize) -> Self {
        Self {
            stream,
            remote_addr,
            read_buffer_size,
        }
    }
}

impl Connection for TcpConnection {
    fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    fn into_split(self: Box<Self>) -> (Box<dyn RecvHalf>, Box<dyn SendHalf>) {
        let (read, write) = self.stream.into_split();
        (
            Box::new(TcpRecvHalf {
                read,
                buffer_size: self.read_buffer_size,
            }),
            Box::new(TcpSendHalf { write }),
        )
    }
}

struct TcpRecvHalf {
    read: OwnedReadHalf,
    buffer_size: usize,
}

#[async_trait]
impl RecvHalf for TcpRecvHalf {
    async fn recv(&mut self) -> Result<Option<Bytes>, TransportError> {
        let mut buf = vec![0u8; self.buffer_size];
        let n = self.read.read(&mut buf).await.map_err(TransportError::Io)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(Bytes::from(buf)))
    }
}

struct TcpSendHalf {
    write: OwnedWriteHalf,
}

#[async_trait]
impl SendHalf for TcpSendHalf {
    async fn send(&mut self, payload: Bytes) -> Result<(), TransportError> {
        self.write
            .write_all(&payload)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.write.shutdown().await.map_err(TransportError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bound_transport() -> (TcpTransport, SocketAddr) {
        let transport = TcpTransport::bind("127.0.0.1:0".parse().unwrap(), 1024)
            .await
            .unwrap();
        let addr = transport.local_addr().unwrap();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_accept_and_recv_chunk() {
        let (transport, addr) = bound_transport().await;

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"hello relay").await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let conn = transport.accept().await.unwrap();
        let (mut recv, _send) = conn.into_split();

        let chunk = recv.recv().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"hello relay");

        // Clean close surfaces as None, not an error.
        assert!(recv.recv().await.unwrap().is_none());
        client.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_half_writes_through() {
        let (transport, addr) = bound_transport().await;

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let conn = transport.accept().await.unwrap();
        assert!(conn.remote_addr().ip().is_loopback());
        let (_recv, mut send) = conn.into_split();
        send.send(Bytes::from_static(b"welcome")).await.unwrap();
        send.close().await.unwrap();

        assert_eq!(client.await.unwrap(), b"welcome");
    }

    #[tokio::test]
    async fn test_recv_respects_buffer_cap() {
        let transport = TcpTransport::bind("127.0.0.1:0".parse().unwrap(), 4)
            .await
            .unwrap();
        let addr = transport.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"abcdefgh").await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let conn = transport.accept().await.unwrap();
        let (mut recv, _send) = conn.into_split();

        // Oversized payloads arrive as multiple chunks, never reassembled.
        let mut total = Vec::new();
        while let Some(chunk) = recv.recv().await.unwrap() {
            assert!(chunk.len() <= 4);
            total.extend_from_slice(&chunk);
        }
        assert_eq!(total, b"abcdefgh");
        client.await.unwrap();
    }
}
