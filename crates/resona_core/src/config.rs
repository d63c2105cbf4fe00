//! Processor and Analysis Configuration

use serde::{Deserialize, Serialize};

/// Audio stream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Sample rate in Hz (e.g., 44100, 48000, 96000)
    pub sample_rate: u32,

    /// Host buffer size in frames (lower = less latency, higher = more stability)
    pub block_size: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 512,
        }
    }
}

impl StreamConfig {
    /// Calculate latency in milliseconds for this configuration
    pub fn latency_ms(&self) -> f32 {
        (self.block_size as f32 / self.sample_rate as f32) * 1000.0
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate < 8000 || self.sample_rate > 192000 {
            return Err(format!("Invalid sample rate: {}", self.sample_rate));
        }
        if self.block_size < 16 || self.block_size > 8192 {
            return Err(format!("Invalid block size: {}", self.block_size));
        }
        Ok(())
    }
}

/// Spectrum analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sample blocks that may be in flight per channel before the audio
    /// thread starts dropping them
    pub fifo_capacity: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        // ~1.3 seconds of blocks at 48kHz; the worker drains far faster
        Self { fifo_capacity: 30 }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.fifo_capacity == 0 || self.fifo_capacity > 1024 {
            return Err(format!("Invalid fifo capacity: {}", self.fifo_capacity));
        }
        Ok(())
    }
}
