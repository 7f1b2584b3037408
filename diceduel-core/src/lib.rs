//! Dice Duel core - wire codec, transports and configuration shared by both
//! peers of a two-player dice wagering session.

pub mod config;
pub mod error;
pub mod message;
pub mod transport;

pub use config::{GameConfig, WaitBackoff, DEFAULT_PORT, DEFAULT_STARTING_BALANCE};
pub use error::{DuelError, Result};
pub use message::{Kind, Message};
pub use transport::{Connection, MemoryTransport, Received, TcpTransport, Transport};
