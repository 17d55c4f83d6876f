//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`STARFX_SECTION__KEY`)
//! 4. Command line flags

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use starfx_core::budget::DEVICE_RAM_BYTES;
use starfx_core::{StarfieldParams, Viewport, WireframeParams};
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub starfield: StarfieldParams,
    pub wireframe: WireframeParams,
    pub input: InputConfig,
    pub memory: MemoryConfig,
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from the `config` directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory. Missing files
    /// are skipped.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // STARFX_STARFIELD__STAR_COUNT=300 -> starfield.star_count = 300
        figment = figment.merge(Env::prefixed("STARFX_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Logical display and how it is drawn in the terminal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// Terminal cells per pixel along each axis (1-4)
    pub scale: u16,
}

impl DisplayConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width,
            height: viewport.height,
            scale: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Longest wait for the first input event of a frame
    pub wait_ms: u64,
    /// Quiet period after which a held key counts as released, for
    /// terminals that cannot report releases
    pub release_after_ms: u64,
}

impl InputConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    pub fn release_after(&self) -> Duration {
        Duration::from_millis(self.release_after_ms)
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wait_ms: 50,
            release_after_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// RAM of the device being emulated
    pub ram_budget_bytes: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_budget_bytes: DEVICE_RAM_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` wins
    pub log_level: String,
    /// Fixed seed for star spawning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Status line under the canvas
    pub show_overlay: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            seed: None,
            show_overlay: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
