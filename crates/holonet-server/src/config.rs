//! Configuration for the holonet-server process.
//!
//! Loaded from (lowest to highest priority):
//! 1. Defaults
//! 2. Config file (`holonet.toml`, prefix selectable)
//! 3. `HOLONET__` environment variables (`__` separates nesting levels)
//! 4. The plain `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and `PORT` variables

use std::net::SocketAddr;

use serde::Deserialize;

use holonet_core::HolonetError;
use holonet_graph::GraphConfig;

use crate::keepalive::KeepaliveConfig;

/// Plain environment variables honoured on top of everything else,
/// paired with the config key they override.
const LEGACY_ENV: [(&str, &str); 4] = [
    ("NEO4J_URI", "neo4j.uri"),
    ("NEO4J_USER", "neo4j.user"),
    ("NEO4J_PASSWORD", "neo4j.password"),
    ("PORT", "port"),
];

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Neo4j connection and schema settings.
    #[serde(default)]
    pub neo4j: GraphConfig,

    /// Background reachability check.
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
}

impl ServerConfig {
    /// Load configuration using the real process environment.
    pub fn load(file_prefix: &str) -> Result<Self, HolonetError> {
        Self::load_with(file_prefix, |key| std::env::var(key).ok())
    }

    /// Load configuration, resolving the plain overrides through `lookup`.
    pub fn load_with(
        file_prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HolonetError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("HOLONET")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV {
            builder = builder
                .set_override_option(key, lookup(var))
                .map_err(|e| HolonetError::Config(e.to_string()))?;
        }

        builder
            .build()
            .and_then(|c| c.try_deserialize::<ServerConfig>())
            .map_err(|e| HolonetError::Config(e.to_string()))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, HolonetError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| HolonetError::Config(format!("invalid bind address: {e}")))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            neo4j: GraphConfig::default(),
            keepalive: KeepaliveConfig::default(),
        }
    }
}
