use crate::config;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Check a button-to-touch configuration without starting the emulator
#[derive(Parser, Debug, Clone)]
pub struct Args {
    /// Path to the configuration file. Defaults to button-to-touch.json next
    /// to this executable, which is where the plugin looks for it when
    /// installed beside vvctre.
    pub config: Option<PathBuf>,

    /// Press and release every mapped button in turn and print the touch
    /// calls the plugin would make
    #[arg(long)]
    pub simulate: bool,
}

impl Args {
    /// Configuration path to check
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config::default_config_path(),
        }
    }
}
