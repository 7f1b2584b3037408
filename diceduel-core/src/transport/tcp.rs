use super::{Received, Transport};
use crate::error::{DuelError, Result};
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

/// Newline-framed transport over a single TCP connection.
pub struct TcpTransport {
    peer: SocketAddr,
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: Option<OwnedWriteHalf>,
}

impl TcpTransport {
    /// Waits for exactly one peer on `port`.
    pub async fn listen(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|e| DuelError::transport(format!("Failed to bind port {}: {}", port, e)))?;
        tracing::info!("Listening on port {}", port);
        Self::accept(&listener).await
    }

    pub async fn accept(listener: &TcpListener) -> Result<Self> {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| DuelError::transport(format!("Failed to accept peer: {}", e)))?;
        tracing::info!("Peer connected from {}", peer);
        Self::from_stream(stream)
    }

    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| DuelError::transport(format!("Connection failed: {}", e)))?;
        Self::from_stream(stream)
    }

    fn from_stream(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        let (reader, writer) = stream.into_split();

        Ok(Self {
            peer,
            lines: BufReader::new(reader).lines(),
            writer: Some(writer),
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, line: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| DuelError::transport("connection closed"))?;

        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');

        writer
            .write_all(framed.as_bytes())
            .await
            .map_err(|e| DuelError::transport(format!("Send to {} failed: {}", self.peer, e)))?;
        writer
            .flush()
            .await
            .map_err(|e| DuelError::transport(format!("Send to {} failed: {}", self.peer, e)))
    }

    async fn receive(&mut self) -> Result<Received> {
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(Received::Line(line.trim_end_matches('\r').to_string())),
            Ok(None) => Err(DuelError::transport(format!(
                "connection closed by {}",
                self.peer
            ))),
            Err(e) => Err(DuelError::transport(format!(
                "Receive from {} failed: {}",
                self.peer, e
            ))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            // peer may already be gone
            if let Err(e) = writer.shutdown().await {
                tracing::debug!("Shutdown of {} failed: {}", self.peer, e);
            }
        }
        Ok(())
    }
}
