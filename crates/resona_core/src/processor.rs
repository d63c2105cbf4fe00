//! Stereo EQ Processor
//!
//! The per-block orchestrator: snapshots the parameter registry, redesigns
//! coefficients, applies them to both channel chains with state preserved,
//! filters the audio in place and feeds the result to the analysis
//! collectors.

use std::sync::Arc;

use resona_dsp::{
    make_cut_filter, make_peak_filter, ChannelChain, CutKind, SampleCollector, NUM_PEAK_BANDS,
};

use crate::analysis::AnalysisFeed;
use crate::config::StreamConfig;
use crate::error::{ProcessorError, ProcessorResult};
use crate::params::EqParams;
use crate::settings::ChainSettings;

/// Stereo-linked parametric EQ.
///
/// Both channels always run identical coefficients; the chains are separate
/// only so each keeps its own delay-line state. Coefficients are recomputed
/// from a fresh parameter snapshot at the top of every block, so parameter
/// changes take effect within one block without zipper noise.
pub struct EqProcessor {
    params: Arc<EqParams>,
    left: ChannelChain,
    right: ChannelChain,
    left_collector: SampleCollector,
    right_collector: SampleCollector,
    sample_rate: f32,
    prepared: bool,
}

impl EqProcessor {
    pub fn new(params: Arc<EqParams>, feed: AnalysisFeed) -> Self {
        Self {
            params,
            left: ChannelChain::new(),
            right: ChannelChain::new(),
            left_collector: SampleCollector::new(feed.left),
            right_collector: SampleCollector::new(feed.right),
            sample_rate: 0.0,
            prepared: false,
        }
    }

    /// Bind to a stream configuration. Must be called before the first
    /// block, and again after any sample-rate change.
    pub fn prepare(&mut self, config: &StreamConfig) -> ProcessorResult<()> {
        config.validate().map_err(ProcessorError::ConfigError)?;

        self.sample_rate = config.sample_rate as f32;
        self.left.reset();
        self.right.reset();
        self.left_collector.prepare();
        self.right_collector.prepare();
        self.update_filters()?;
        self.prepared = true;

        tracing::info!(
            sample_rate = config.sample_rate,
            block_size = config.block_size,
            latency_ms = config.latency_ms(),
            "processor prepared"
        );
        Ok(())
    }

    /// Process one stereo block in place.
    ///
    /// # Real-time Safety
    /// No allocations and no locks once prepared. Filter design is a few
    /// hundred float operations per block.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) -> ProcessorResult<()> {
        if !self.prepared {
            return Err(ProcessorError::NotPrepared);
        }
        if left.len() != right.len() {
            return Err(ProcessorError::ChannelMismatch {
                left: left.len(),
                right: right.len(),
            });
        }

        self.update_filters()?;

        self.left.process_block(left);
        self.right.process_block(right);

        self.left_collector.update(left);
        self.right_collector.update(right);
        Ok(())
    }

    /// Snapshot the registry and push fresh coefficients into both chains.
    ///
    /// Clamped parameters cannot produce a failing design, so errors here
    /// mean a bug upstream; the previous coefficients stay in place in that
    /// case and the error is reported.
    fn update_filters(&mut self) -> ProcessorResult<()> {
        let settings = ChainSettings::snapshot(&self.params);

        for (band, peak) in settings.peaks.iter().enumerate() {
            let coeffs = make_peak_filter(peak.freq, peak.q, peak.gain_db, self.sample_rate)?;
            self.left.set_peak_coefficients(band, coeffs)?;
            self.right.set_peak_coefficients(band, coeffs)?;
        }

        if settings.low_cut_off() {
            self.left.set_low_cut_off();
            self.right.set_low_cut_off();
        } else {
            let coeffs = make_cut_filter(
                settings.low_cut_freq,
                self.sample_rate,
                settings.low_cut_slope,
                CutKind::LowCut,
            )?;
            self.left
                .apply_low_cut(&coeffs, settings.low_cut_slope, false);
            self.right
                .apply_low_cut(&coeffs, settings.low_cut_slope, false);
        }

        if settings.high_cut_off() {
            self.left.set_high_cut_off();
            self.right.set_high_cut_off();
        } else {
            let coeffs = make_cut_filter(
                settings.high_cut_freq,
                self.sample_rate,
                settings.high_cut_slope,
                CutKind::HighCut,
            )?;
            self.left
                .apply_high_cut(&coeffs, settings.high_cut_slope, false);
            self.right
                .apply_high_cut(&coeffs, settings.high_cut_slope, false);
        }

        Ok(())
    }

    pub fn params(&self) -> &Arc<EqParams> {
        &self.params
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Analysis blocks dropped across both channels since prepare.
    pub fn dropped_analysis_blocks(&self) -> u64 {
        self.left_collector.dropped_blocks() + self.right_collector.dropped_blocks()
    }

    /// Clear all filter state without touching parameters.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
