/// Command line flags shared by the effect binaries
use clap::Parser;
use log::warn;
use std::path::PathBuf;

use crate::config::{AppConfig, ConfigError};
use crate::error::AppError;

#[derive(Debug, Parser)]
#[command(version, about = "Monochrome 3D effects for a 128x64 display, in the terminal")]
pub struct Cli {
    /// Seed for star spawning (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Configuration directory holding default.toml / user.toml
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Terminal cells per pixel
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=4))]
    pub scale: Option<u16>,
}

impl Cli {
    /// Load configuration, start logging, and apply flag overrides.
    ///
    /// An unreadable default `config` directory falls back to built-in
    /// defaults; a directory named with `--config` must load.
    pub fn bootstrap(&self) -> Result<AppConfig, AppError> {
        let mut config = match self.load_config() {
            Ok(config) => {
                crate::init_logging(&config.debug.log_level);
                config
            }
            Err(e) if self.config.is_none() => {
                let config = AppConfig::default();
                crate::init_logging(&config.debug.log_level);
                warn!("Failed to load config: {}. Using defaults.", e);
                config
            }
            Err(e) => {
                crate::init_logging(&AppConfig::default().debug.log_level);
                return Err(e.into());
            }
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn load_config(&self) -> Result<AppConfig, ConfigError> {
        match &self.config {
            Some(dir) if !dir.is_dir() => Err(ConfigError::new(format!(
                "{} is not a directory",
                dir.display()
            ))),
            Some(dir) => AppConfig::load_from(dir),
            None => AppConfig::load(),
        }
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.debug.seed = Some(seed);
        }
        if let Some(scale) = self.scale {
            config.display.scale = scale;
        }
    }
}
