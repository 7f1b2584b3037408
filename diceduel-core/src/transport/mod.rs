//! Message transport between the two peers.
//!
//! A [`Transport`] moves single framed lines and may report [`Received::Wait`]
//! when nothing is available yet. [`Connection`] sits on top of it: it encodes
//! and decodes [`Message`]s, absorbs WAIT with a bounded backoff and applies the
//! optional receive timeout.

pub mod memory;
pub mod tcp;

pub use memory::MemoryTransport;
pub use tcp::TcpTransport;

use crate::config::{GameConfig, WaitBackoff};
use crate::error::{DuelError, Result};
use crate::message::Message;
use async_trait::async_trait;
use std::time::Duration;

/// Result of a single read from the underlying channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Line(String),
    /// Nothing to read yet. Never carries data.
    Wait,
}

#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, line: &str) -> Result<()>;

    async fn receive(&mut self) -> Result<Received>;

    /// Releases the connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}

pub struct Connection {
    transport: Box<dyn Transport>,
    backoff: WaitBackoff,
    receive_timeout: Option<Duration>,
    closed: bool,
}

impl Connection {
    pub fn new(transport: Box<dyn Transport>, config: &GameConfig) -> Self {
        Self {
            transport,
            backoff: config.wait_backoff,
            receive_timeout: config.receive_timeout,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub async fn send(&mut self, message: &Message) -> Result<()> {
        if self.closed {
            return Err(DuelError::transport("connection already closed"));
        }

        let line = message.encode();
        tracing::debug!("Sending: {}", line);
        self.transport.send(&line).await
    }

    /// Blocks until a substantive message arrives. WAIT reads are discarded.
    pub async fn recv(&mut self) -> Result<Message> {
        if self.closed {
            return Err(DuelError::transport("connection already closed"));
        }

        let line = match self.receive_timeout {
            Some(limit) => tokio::time::timeout(limit, self.next_line())
                .await
                .map_err(|_| {
                    DuelError::timeout(format!("no message from peer within {:?}", limit))
                })??,
            None => self.next_line().await?,
        };

        tracing::debug!("Received: {}", line);
        Message::decode(&line)
    }

    async fn next_line(&mut self) -> Result<String> {
        let mut delay = self.backoff.initial;
        loop {
            match self.transport.receive().await? {
                Received::Line(line) => return Ok(line),
                Received::Wait => {
                    tokio::time::sleep(delay).await;
                    delay = self.backoff.next(delay);
                }
            }
        }
    }

    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!("Closing connection");
        self.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct Scripted {
        inbound: VecDeque<Received>,
        closes: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn send(&mut self, _line: &str) -> Result<()> {
            Ok(())
        }

        async fn receive(&mut self) -> Result<Received> {
            self.inbound
                .pop_front()
                .ok_or_else(|| DuelError::transport("script exhausted"))
        }

        async fn close(&mut self) -> Result<()> {
            *self.closes.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn scripted(inbound: Vec<Received>) -> (Connection, Arc<Mutex<usize>>) {
        let closes = Arc::new(Mutex::new(0));
        let transport = Scripted {
            inbound: inbound.into(),
            closes: closes.clone(),
        };
        let config = GameConfig {
            wait_backoff: WaitBackoff {
                initial: Duration::from_millis(1),
                max: Duration::from_millis(2),
            },
            ..Default::default()
        };
        (Connection::new(Box::new(transport), &config), closes)
    }

    #[tokio::test]
    async fn test_wait_reads_are_absorbed() {
        let mut inbound = vec![Received::Wait; 25];
        inbound.push(Received::Line("STAKE|10".to_string()));
        inbound.push(Received::Wait);
        inbound.push(Received::Line("ROLL|4".to_string()));
        let (mut conn, _) = scripted(inbound);

        assert_eq!(conn.recv().await.unwrap(), Message::Stake(10));
        assert_eq!(conn.recv().await.unwrap(), Message::Roll(4));
    }

    #[tokio::test]
    async fn test_malformed_line_surfaces_as_error() {
        let (mut conn, _) = scripted(vec![Received::Line("GUESS|x".to_string())]);
        assert!(matches!(conn.recv().await, Err(DuelError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (mut conn, closes) = scripted(vec![]);
        conn.close().await.unwrap();
        conn.close().await.unwrap();
        assert_eq!(*closes.lock().unwrap(), 1);
        assert!(conn.send(&Message::Guess(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_receive_timeout() {
        let (a, _b) = MemoryTransport::pair();
        let config = GameConfig {
            receive_timeout: Some(Duration::from_millis(30)),
            ..Default::default()
        };
        let mut conn = Connection::new(Box::new(a), &config);
        assert!(matches!(conn.recv().await, Err(DuelError::Timeout(_))));
    }
}
