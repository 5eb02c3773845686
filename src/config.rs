// ⚙️ Configuration - Timing and defaults loaded from TOML
//
// Lookup order:
// 1. Path in PRICE_REVEAL_CONFIG
// 2. price-reveal.toml in the working directory
// 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::currency::Currency;

pub const CONFIG_ENV_VAR: &str = "PRICE_REVEAL_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "price-reveal.toml";
pub const DEFAULT_LOG_FILE: &str = "price-reveal.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid timing: {0}")]
    InvalidTiming(String),
}

// ============================================================================
// TIMING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How often a rolling slot shows a new random digit
    pub roll_interval_ms: u64,

    /// Length of the fast-roll phase before a slot locks
    pub fast_roll_ms: u64,

    /// Pause after a lock before the next slot starts
    pub settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            roll_interval_ms: 50,
            fast_roll_ms: 500,
            settle_ms: 1000,
        }
    }
}

impl TimingConfig {
    pub fn roll_interval(&self) -> Duration {
        Duration::from_millis(self.roll_interval_ms)
    }

    pub fn fast_roll(&self) -> Duration {
        Duration::from_millis(self.fast_roll_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Time from one slot's fast-roll start to the next one's
    pub fn step(&self) -> Duration {
        self.fast_roll() + self.settle()
    }

    /// Total length of a reveal of `digit_count` digits
    pub fn total(&self, digit_count: usize) -> Duration {
        self.step() * digit_count as u32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roll_interval_ms == 0 || self.fast_roll_ms == 0 || self.settle_ms == 0 {
            return Err(ConfigError::InvalidTiming(
                "durations must be greater than zero".to_string(),
            ));
        }

        if self.roll_interval_ms > self.fast_roll_ms {
            return Err(ConfigError::InvalidTiming(format!(
                "roll_interval_ms ({}) exceeds fast_roll_ms ({})",
                self.roll_interval_ms, self.fast_roll_ms
            )));
        }

        Ok(())
    }
}

// ============================================================================
// APP CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub timing: TimingConfig,

    /// Currency preselected on the input screen
    pub default_currency: Currency,

    /// Where logs go while the TUI owns the terminal
    pub log_file: Option<PathBuf>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            timing: TimingConfig::default(),
            default_currency: Currency::default(),
            log_file: None,
        }
    }
}

impl RevealConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: RevealConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.timing.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Resolve the config from the environment, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load_from_file(PathBuf::from(path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_file(local);
        }

        Ok(Self::default())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}
