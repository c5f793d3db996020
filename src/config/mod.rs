//! Server configuration.
//!
//! Layered, lowest to highest: built-in defaults, an optional TOML file, then
//! `ROOMCAST_*` environment variables (`ROOMCAST_PORT=9000`). Command-line flags
//! are applied on top by the binary.

use crate::error::ChatError;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "ROOMCAST_";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Lines a client may have queued before further lines to it are dropped.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
    /// Pending register and message requests before submitters wait.
    #[serde(default = "default_message_queue_capacity")]
    pub message_queue_capacity: usize,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8085
}

fn default_outbox_capacity() -> usize {
    64
}

fn default_message_queue_capacity() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            outbox_capacity: default_outbox_capacity(),
            message_queue_capacity: default_message_queue_capacity(),
            log_level: default_log_level(),
        }
    }
}

/// Builds the figment: defaults → `file` (if any) → `ROOMCAST_*` env vars.
pub fn figment(file: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(ChatConfig::default()));
    if let Some(path) = file {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed(ENV_PREFIX))
}

impl ChatConfig {
    /// Loads and validates the layered configuration. A `file` that was
    /// named explicitly must exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ChatError> {
        if let Some(path) = file {
            if !path.is_file() {
                return Err(ChatError::Config(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
        }
        let config: ChatConfig = figment(file)
            .extract()
            .map_err(|e| ChatError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.outbox_capacity == 0 {
            return Err(ChatError::Config("outbox_capacity must be at least 1".into()));
        }
        if self.message_queue_capacity == 0 {
            return Err(ChatError::Config(
                "message_queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
