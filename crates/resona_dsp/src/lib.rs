//! Resona DSP - Digital Signal Processing Module
//!
//! This crate provides the per-channel EQ signal path for Resona, including:
//! - Butterworth cut-filter design and 5-band peaking EQ coefficients
//! - State-preserving biquad stages and slope-selectable cut cascades
//! - The full low-cut / peaks / high-cut channel chain
//! - Lock-free FIFO plumbing and block collection for spectrum analysis
//! - FFT reduction of sample blocks into display-ready magnitude frames
//!
//! # Architecture
//!
//! The processing path follows a strict "no allocation in audio callback"
//! rule. Coefficient swaps preserve delay-line state so the chain can be
//! retuned every block without discontinuities.

mod cascade;
mod chain;
mod collector;
mod design;
mod error;
mod fifo;
mod spectrum;
mod stage;

pub use biquad::Coefficients;

pub use cascade::CutCascade;
pub use chain::{ChannelChain, NUM_PEAK_BANDS};
pub use collector::{SampleBlock, SampleCollector, ANALYSIS_BLOCK_SIZE};
pub use design::{
    gain_to_db, magnitude_for_frequency, make_cut_filter, make_peak_filter, CutKind, Slope,
    MAX_CUT_STAGES,
};
pub use error::DesignError;
pub use fifo::{fifo, FifoConsumer, FifoProducer};
pub use spectrum::{SpectrumAnalyzer, SpectrumFrame, FFT_SIZE, NUM_BINS};
pub use stage::FilterStage;
