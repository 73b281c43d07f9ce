//! Runtime configuration.
//!
//! All tunables live here with the observed defaults preserved; a missing
//! config file means "run with defaults".

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::DEFAULT_BASE_URL;
use crate::delivery::RetryPolicy;
use crate::mapper::DEFAULT_MODEL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub browser: BrowserSettings,
    pub delivery: DeliverySettings,
    pub inference: InferenceSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Browser endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Chrome DevTools HTTP endpoint.
    pub cdp_url: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            cdp_url: "http://localhost:9222".to_string(),
        }
    }
}

/// Scanner delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 100,
        }
    }
}

impl DeliverySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

/// Inference service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub base_url: String,

    /// Used when no model override is stored.
    pub default_model: String,

    /// Low by default: mapping is structured extraction, not generation.
    pub temperature: f32,

    /// Unset means the transport default applies.
    pub timeout_secs: Option<u64>,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            timeout_secs: None,
        }
    }
}

impl InferenceSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage directory; `~/.formpilot` when unset.
    pub dir: Option<PathBuf>,
}

impl StorageSettings {
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".formpilot"))
                .unwrap_or_else(|| PathBuf::from(".formpilot"))
        })
    }
}
