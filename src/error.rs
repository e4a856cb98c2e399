use std::path::PathBuf;

use thiserror::Error;

/// Why a voice-input request produced no text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenError {
    #[error("no speech detected before the listen timeout")]
    Timeout,
    #[error("speech could not be understood")]
    NotUnderstood,
    #[error("speech service is unavailable")]
    Unavailable,
    #[error("listening was cancelled")]
    Cancelled,
}

/// Failure of a speech sink. Never fatal to a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnounceError {
    #[error("no listeners are connected")]
    NoListeners,
    #[error("speech sink failed: {0}")]
    Sink(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}
