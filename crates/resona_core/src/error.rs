//! Processor Error Types

use thiserror::Error;

/// Errors that can occur in the processing core
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Processor used before prepare()")]
    NotPrepared,

    #[error("Channel length mismatch: left {left}, right {right}")]
    ChannelMismatch { left: usize, right: usize },

    #[error("Filter design error: {0}")]
    DesignError(#[from] resona_dsp::DesignError),

    #[error("Failed to spawn analysis thread: {0}")]
    ThreadSpawnError(#[from] std::io::Error),

    #[error("Settings serialization error: {0}")]
    SettingsError(#[from] serde_json::Error),
}

/// Result type alias for processor operations
pub type ProcessorResult<T> = Result<T, ProcessorError>;
