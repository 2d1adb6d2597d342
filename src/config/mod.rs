pub mod capture;
pub mod path;


use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drivers::elantech::{
    COMMAND_DELAY_MS, COMMAND_TRIES, READ_BACK_DELAY_US, READ_BACK_TRIES, TAP_TO_CLICK_DISTANCE,
};

/// Represents all possible errors loading a config file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

/// Driver options loaded from a YAML config file. Every field is optional in
/// the file and falls back to the built-in default.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct DriverConfig {
    /// Synthesize clicks from one and two finger taps
    pub tap_to_click: bool,
    /// Maximum distance a finger may travel in either axis and still tap
    pub tap_distance: u32,
    /// Override the diagnostics verbosity chosen for the hardware
    pub debug: Option<u8>,
    /// Override parity checking of version 1 packets
    pub parity_check: Option<bool>,
    /// Attempts for command round trips during start-up
    pub command_retries: u32,
    /// Milliseconds to wait between command attempts
    pub command_delay_ms: u64,
    /// Attempts to read back the mode register
    pub read_back_retries: u32,
    /// Microseconds to wait between read-back attempts
    pub read_back_delay_us: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tap_to_click: true,
            tap_distance: TAP_TO_CLICK_DISTANCE,
            debug: None,
            parity_check: None,
            command_retries: COMMAND_TRIES,
            command_delay_ms: COMMAND_DELAY_MS,
            read_back_retries: READ_BACK_TRIES,
            read_back_delay_us: READ_BACK_DELAY_US,
        }
    }
}

impl DriverConfig {
    /// Load a [DriverConfig] from the given YAML string
    pub fn from_yaml(content: String) -> Result<DriverConfig, LoadError> {
        let config: DriverConfig = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [DriverConfig] from the given YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<DriverConfig, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: DriverConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Load the config from the given path, or from the first config file
    /// found in the search paths. Falls back to the defaults if no config
    /// file exists.
    pub fn load(explicit: Option<&Path>) -> Result<DriverConfig, LoadError> {
        if let Some(path) = explicit {
            log::debug!("Loading config from {path:?}");
            return Self::from_yaml_file(path);
        }

        let Some(path) = path::find_config_file() else {
            log::debug!("No config file found. Using defaults.");
            return Ok(DriverConfig::default());
        };
        log::debug!("Loading config from {path:?}");
        Self::from_yaml_file(path)
    }
}
