use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Describing the server configuration.
#[derive(Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub address: SocketAddr,
    /// Directory the persisted collections live under.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl Config {
    /// Read the configuration at `path`, falling back to the defaults
    /// when the file is absent or malformed.
    pub fn read(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(string) => toml::from_str(&string).unwrap_or_else(|err| {
                tracing::warn!("malformed config {}: {}", path.display(), err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}
