use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DriverConfig, LoadError};

/// Recorded touchpad session. Holds the bytes the touchpad replied with
/// during detection and start-up along with the raw packet stream that
/// followed, both as whitespace separated hex strings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Capture {
    pub name: String,
    pub description: Option<String>,
    /// Replies to the detection and start-up commands (e.g. "3c 03 c8")
    pub replies: String,
    /// Raw packet stream
    pub stream: String,
    /// Driver options to replay the capture with
    pub config: Option<DriverConfig>,
}

impl Capture {
    /// Load a [Capture] from the given YAML string
    pub fn from_yaml(content: String) -> Result<Capture, LoadError> {
        let capture: Capture = serde_yaml::from_str(content.as_str())?;
        Ok(capture)
    }

    /// Load a [Capture] from the given YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Capture, LoadError> {
        let file = std::fs::File::open(path)?;
        let capture: Capture = serde_yaml::from_reader(file)?;
        Ok(capture)
    }

    pub fn reply_bytes(&self) -> Result<Vec<u8>, LoadError> {
        parse_hex(&self.replies)
    }

    pub fn stream_bytes(&self) -> Result<Vec<u8>, LoadError> {
        parse_hex(&self.stream)
    }
}

/// Parse a whitespace separated list of hex bytes. An optional "0x" prefix
/// is accepted on each byte.
pub fn parse_hex(value: &str) -> Result<Vec<u8>, LoadError> {
    value
        .split_whitespace()
        .map(|token| {
            let digits = token.trim_start_matches("0x");
            u8::from_str_radix(digits, 16).map_err(|_| LoadError::InvalidHex(token.to_string()))
        })
        .collect()
}
