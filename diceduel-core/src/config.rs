use crate::error::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STARTING_BALANCE: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub port: u16,
    pub starting_balance: i64,
    /// `None` waits on the peer forever.
    pub receive_timeout: Option<Duration>,
    pub wait_backoff: WaitBackoff,
    /// Seed for the host's dice, for reproducible sessions.
    pub seed: Option<u64>,
    pub validate_peer_input: bool,
}

/// Delay schedule applied while the transport reports nothing to read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaitBackoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Default for WaitBackoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(5),
            max: Duration::from_millis(200),
        }
    }
}

impl WaitBackoff {
    /// Next delay after `current`, doubling up to the cap.
    pub fn next(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            starting_balance: DEFAULT_STARTING_BALANCE,
            receive_timeout: None,
            wait_backoff: WaitBackoff::default(),
            seed: None,
            validate_peer_input: true,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(DuelError::config("Port must be greater than 0"));
        }

        if self.starting_balance <= 0 {
            return Err(DuelError::config("Starting balance must be positive"));
        }

        if self.receive_timeout == Some(Duration::ZERO) {
            return Err(DuelError::config("Receive timeout must be non-zero"));
        }

        if self.wait_backoff.initial.is_zero() || self.wait_backoff.initial > self.wait_backoff.max {
            return Err(DuelError::config(
                "Wait backoff must start above zero and not exceed its cap",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 5000);
        assert_eq!(config.starting_balance, 100);
        assert!(config.receive_timeout.is_none());
    }

    #[test]
    fn test_rejects_non_positive_balance() {
        let config = GameConfig {
            starting_balance: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DuelError::Config(_))));
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let backoff = WaitBackoff::default();
        assert_eq!(backoff.next(Duration::from_millis(5)), Duration::from_millis(10));
        assert_eq!(backoff.next(Duration::from_millis(150)), Duration::from_millis(200));
        assert_eq!(backoff.next(Duration::from_millis(200)), Duration::from_millis(200));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "port": 6100, "seed": 7 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.port, 6100);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.starting_balance, 100);
        assert!(config.validate_peer_input);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "starting_balance": -5 }"#).unwrap();
        assert!(matches!(GameConfig::load(&path), Err(DuelError::Config(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            GameConfig::load(&path),
            Err(DuelError::Serialization(_))
        ));
    }
}
