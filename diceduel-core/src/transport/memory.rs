use super::{Received, Transport};
use crate::error::{DuelError, Result};
use async_trait::async_trait;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// In-process transport. Reads never block: an empty queue is reported as
/// [`Received::Wait`].
pub struct MemoryTransport {
    tx: Option<UnboundedSender<String>>,
    rx: UnboundedReceiver<String>,
}

impl MemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = unbounded_channel();
        let (b_tx, a_rx) = unbounded_channel();

        (
            Self {
                tx: Some(a_tx),
                rx: a_rx,
            },
            Self {
                tx: Some(b_tx),
                rx: b_rx,
            },
        )
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&mut self, line: &str) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| DuelError::transport("connection closed"))?;
        tx.send(line.to_string())
            .map_err(|_| DuelError::transport("peer hung up"))
    }

    async fn receive(&mut self) -> Result<Received> {
        match self.rx.try_recv() {
            Ok(line) => Ok(Received::Line(line)),
            Err(TryRecvError::Empty) => Ok(Received::Wait),
            Err(TryRecvError::Disconnected) => Err(DuelError::transport("peer hung up")),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.tx = None;
        self.rx.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_queue_reports_wait() {
        let (mut a, mut b) = MemoryTransport::pair();
        assert_eq!(b.receive().await.unwrap(), Received::Wait);

        a.send("GUESS|2").await.unwrap();
        assert_eq!(
            b.receive().await.unwrap(),
            Received::Line("GUESS|2".to_string())
        );
    }

    #[tokio::test]
    async fn test_queued_lines_survive_hangup() {
        let (mut a, mut b) = MemoryTransport::pair();
        a.send("EXIT|bye").await.unwrap();
        a.close().await.unwrap();

        assert_eq!(
            b.receive().await.unwrap(),
            Received::Line("EXIT|bye".to_string())
        );
        assert!(b.receive().await.is_err());
        assert!(b.send("GUESS|1").await.is_err());
    }
}
