use anyhow::Context;
use diceduel_core::GameConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Values given on the command line; each one replaces the file setting.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub port: Option<u16>,
    pub balance: Option<i64>,
    pub seed: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub trust_peer: bool,
}

impl Overrides {
    pub fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(balance) = self.balance {
            config.starting_balance = balance;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(secs) = self.timeout_secs {
            config.receive_timeout = Some(Duration::from_secs(secs));
        }
        if self.trust_peer {
            config.validate_peer_input = false;
        }
        config
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("diceduel").join("config.json"))
}

/// Reads `explicit` if given, else the default location when it exists, else
/// built-in defaults.
pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> anyhow::Result<GameConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    };

    let config = match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            GameConfig::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    let config = overrides.apply(config);
    config.validate().context("Invalid settings")?;
    Ok(config)
}
