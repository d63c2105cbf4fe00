//! Channel Chain
//!
//! The complete per-channel signal path: low-cut cascade, five peak bands,
//! high-cut cascade, in that fixed order.

use biquad::Coefficients;

use crate::cascade::CutCascade;
use crate::design::{Slope, MAX_CUT_STAGES};
use crate::error::DesignError;
use crate::stage::FilterStage;

/// Number of parametric peak bands per channel.
pub const NUM_PEAK_BANDS: usize = 5;

/// One channel's worth of EQ filtering.
///
/// Coefficient updates go through [`set_peak_coefficients`],
/// [`apply_low_cut`] and [`apply_high_cut`]; all three preserve delay-line
/// state so the chain can be retuned while audio is flowing.
///
/// [`set_peak_coefficients`]: ChannelChain::set_peak_coefficients
/// [`apply_low_cut`]: ChannelChain::apply_low_cut
/// [`apply_high_cut`]: ChannelChain::apply_high_cut
pub struct ChannelChain {
    low_cut: CutCascade,
    peaks: [FilterStage; NUM_PEAK_BANDS],
    high_cut: CutCascade,
}

impl ChannelChain {
    /// Create a chain that passes audio through unchanged: both cut cascades
    /// off, all peak bands at unity.
    pub fn new() -> Self {
        Self {
            low_cut: CutCascade::new(),
            peaks: core::array::from_fn(|_| FilterStage::unity()),
            high_cut: CutCascade::new(),
        }
    }

    /// Process one sample through the full chain.
    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let mut x = self.low_cut.process_sample(sample);
        for peak in &mut self.peaks {
            x = peak.process(x);
        }
        self.high_cut.process_sample(x)
    }

    /// Process a block of samples in place.
    ///
    /// # Real-time Safety
    /// No allocations, no locks. Safe to call from the audio callback.
    pub fn process_block(&mut self, block: &mut [f32]) {
        for sample in block {
            *sample = self.process_sample(*sample);
        }
    }

    /// Replace one peak band's coefficients, preserving its state.
    pub fn set_peak_coefficients(
        &mut self,
        band: usize,
        coeffs: Coefficients<f32>,
    ) -> Result<(), DesignError> {
        let stage = self
            .peaks
            .get_mut(band)
            .ok_or(DesignError::InvalidBandIndex(band))?;
        stage.replace_coefficients(coeffs);
        Ok(())
    }

    /// Install new low-cut coefficients and the slope's active prefix.
    pub fn apply_low_cut(
        &mut self,
        coeffs: &[Coefficients<f32>; MAX_CUT_STAGES],
        slope: Slope,
        is_off: bool,
    ) {
        self.low_cut.apply_coefficients(coeffs, slope, is_off);
    }

    /// Install new high-cut coefficients and the slope's active prefix.
    pub fn apply_high_cut(
        &mut self,
        coeffs: &[Coefficients<f32>; MAX_CUT_STAGES],
        slope: Slope,
        is_off: bool,
    ) {
        self.high_cut.apply_coefficients(coeffs, slope, is_off);
    }

    /// Disable the low cut entirely, keeping coefficients and state.
    pub fn set_low_cut_off(&mut self) {
        self.low_cut.bypass_all();
    }

    /// Disable the high cut entirely, keeping coefficients and state.
    pub fn set_high_cut_off(&mut self) {
        self.high_cut.bypass_all();
    }

    pub fn low_cut(&self) -> &CutCascade {
        &self.low_cut
    }

    pub fn high_cut(&self) -> &CutCascade {
        &self.high_cut
    }

    /// Clear every delay line in the chain.
    pub fn reset(&mut self) {
        self.low_cut.reset();
        for peak in &mut self.peaks {
            peak.reset();
        }
        self.high_cut.reset();
    }
}

impl Default for ChannelChain {
    fn default() -> Self {
        Self::new()
    }
}
