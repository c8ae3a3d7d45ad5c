//! Error types for the launcher.
//!
//! Each collaborator reports its own failure type. Most of these are
//! best-effort at the call site: the flow logs them and moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("No transient grant to persist for {0}")]
    NoTransientGrant(String),

    #[error("Granting access is not supported here")]
    Unsupported,

    #[error("Grant table IO error at {path:?}: {message}")]
    Store {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Image is not a local file: {0}")]
    NotLocal(String),

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Shortcut registration is not supported on this platform")]
    Unsupported,

    #[error("Shortcut IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to store shortcut icon: {0}")]
    Icon(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Target component {component} could not be resolved")]
    TargetUnresolved { component: String },

    #[error("Failed to start {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
