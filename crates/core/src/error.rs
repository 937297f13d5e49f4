//! Error taxonomy
//!
//! Only `ConfigError` may terminate the process. Everything else is
//! contained: `Unavailable` inside a provider, `RenderError` and
//! `DisplayWriteError` inside a single cycle.

use std::time::Duration;
use thiserror::Error;

/// A provider could not deliver its values this cycle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Unavailable {
    #[error("not configured (missing {0})")]
    NotConfigured(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("API reported an error: {0}")]
    Api(String),
    #[error("read failed: {0}")]
    Io(String),
}

/// Rendering failed; the current cycle is aborted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("region '{region}' does not fit the {width}x{height} canvas")]
    RegionOutOfBounds {
        region: String,
        width: u32,
        height: u32,
    },
    #[error("malformed asset '{name}': {reason}")]
    Asset { name: String, reason: String },
    #[error("invalid layout: {0}")]
    Layout(String),
}

/// The display driver (or screenshot writer) rejected a frame
#[derive(Debug, Error)]
pub enum DisplayWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode bitmap: {0}")]
    Encode(String),
    #[error("driver error: {0}")]
    Driver(String),
}

/// Startup configuration is missing or invalid
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(String),
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
