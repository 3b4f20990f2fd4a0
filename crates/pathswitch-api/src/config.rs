//! Server configuration

use pathswitch_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Server configuration, read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// HTTP listen address
    pub bind_addr: String,
    /// Engine settings used until a profile is activated
    pub engine: EngineConfig,
    /// Start ticking as soon as the server is up
    pub autostart: bool,
    /// Seed for synthetic telemetry; entropy when absent
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            engine: EngineConfig::default(),
            autostart: false,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Load from file
    pub fn load(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse from a JSON document
    pub fn from_json(content: &str) -> Result<Self, std::io::Error> {
        serde_json::from_str(content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
