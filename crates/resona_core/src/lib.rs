//! Resona Core - Processing Engine
//!
//! This crate provides the processing core for Resona, including:
//! - Lock-free parameter registry for the five peak bands and both cuts
//! - Stereo-linked EQ processor with per-block coefficient updates
//! - Background analysis engine feeding spectrum displays
//! - Serializable settings for persistence
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Control / UI Thread                     │
//! │   sliders ──atomics──▶ EqParams      SpectrumOutlet ◀─┐     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ snapshot                │ rtrb
//!                              ▼                         │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Audio Thread                          │
//! │   input ──▶ EqProcessor (design + chains) ──rtrb──▶ blocks  │
//! │              (Zero allocation in this path)                 │
//! └──────────────────────────────────────────────────────┬──────┘
//!                                                        ▼
//!                                          analysis worker (FFT)
//! ```

mod analysis;
mod config;
mod error;
mod params;
mod processor;
mod settings;

pub use analysis::{AnalysisEngine, AnalysisFeed, SpectrumOutlet};
pub use config::{AnalysisConfig, StreamConfig};
pub use error::{ProcessorError, ProcessorResult};
pub use params::{
    AtomicF32, BandSettings, EqParams, EqSettings, FloatRange, FREQ_RANGE, GAIN_RANGE,
    HIGH_CUT_OFF_MIN, LOW_CUT_OFF_MAX, PEAK_DEFAULT_FREQS, Q_RANGE,
};
pub use processor::EqProcessor;
pub use settings::{ChainSettings, PeakBand};

// Re-export DSP types for convenience
pub use resona_dsp::{Slope, SpectrumFrame, NUM_BINS, NUM_PEAK_BANDS};
