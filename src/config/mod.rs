//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Process configuration, loaded once at startup and immutable after.
///
/// Read from a JSON file; individual fields can be overridden by
/// command-line flags in the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote relay host
    pub server: String,
    /// Remote relay port
    pub server_port: u16,
    /// Local SOCKS5 listen port
    pub local_port: u16,
    /// Shared passphrase for the substitution cipher
    pub password: String,
    /// Connect to the remote relay over IPv6 instead of IPv4
    #[serde(default)]
    pub ipv6: bool,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }
}
