//! Filter Stage
//!
//! A single 2nd-order IIR filter unit with a swappable coefficient set and a
//! bypass switch. This is the building block of both the peak bands and the
//! cut-filter cascades.

use biquad::{Biquad, Coefficients, DirectForm2Transposed};

/// One biquad section with hot-swappable coefficients.
///
/// Coefficient replacement never touches the delay-line state, so a stage can
/// change its transfer function mid-stream without an audible discontinuity.
/// Bypassing likewise leaves the state untouched: a re-enabled stage resumes
/// from where it left off instead of ringing up from silence.
pub struct FilterStage {
    // DirectForm2Transposed: better numerical stability than DF1
    filter: DirectForm2Transposed<f32>,
    bypassed: bool,
}

impl FilterStage {
    /// Create a stage with the given coefficients, active.
    pub fn new(coeffs: Coefficients<f32>) -> Self {
        Self {
            filter: DirectForm2Transposed::<f32>::new(coeffs),
            bypassed: false,
        }
    }

    /// Create a pass-through stage (unity coefficients), active.
    pub fn unity() -> Self {
        Self::new(Coefficients {
            a1: 0.0,
            a2: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
        })
    }

    /// Process one sample.
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls, O(1) time. Safe to call from the audio
    /// callback.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        if self.bypassed {
            sample
        } else {
            self.filter.run(sample)
        }
    }

    /// Install a new coefficient set, preserving the delay-line state.
    #[inline]
    pub fn replace_coefficients(&mut self, coeffs: Coefficients<f32>) {
        self.filter.update_coefficients(coeffs);
    }

    /// Set whether this stage passes its input through unchanged.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    #[inline]
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Clear the delay line. Only for use outside the block path, e.g. when
    /// switching audio sources.
    pub fn reset(&mut self) {
        self.filter.reset_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::make_peak_filter;

    const SR: f32 = 48000.0;

    #[test]
    fn test_unity_stage_is_identity() {
        let mut stage = FilterStage::unity();
        for x in [0.0, 0.5, -0.25, 1.0] {
            assert_eq!(stage.process(x), x);
        }
    }

    #[test]
    fn test_bypassed_stage_is_identity() {
        let coeffs = make_peak_filter(1000.0, 1.0, 24.0, SR).unwrap();
        let mut stage = FilterStage::new(coeffs);
        stage.set_bypassed(true);
        for x in [0.3, -0.7, 0.9] {
            assert_eq!(stage.process(x), x);
        }
    }

    #[test]
    fn test_active_stage_filters() {
        let coeffs = make_peak_filter(1000.0, 1.0, 24.0, SR).unwrap();
        let mut stage = FilterStage::new(coeffs);

        // Feed a 1kHz sine at the boosted center; output should exceed input
        // amplitude once the filter settles.
        let mut max_out = 0.0_f32;
        for i in 0..2000 {
            let t = i as f32 / SR;
            let x = (2.0 * std::f32::consts::PI * 1000.0 * t).sin() * 0.25;
            max_out = max_out.max(stage.process(x).abs());
        }
        assert!(max_out > 0.3, "boosted band should amplify, got {max_out}");
    }

    #[test]
    fn test_coefficient_swap_preserves_state() {
        // Excite the filter with an impulse, then swap coefficients and feed
        // silence. If the delay line survived the swap, the stage keeps
        // ringing; a cleared delay line would output exactly zero forever.
        let boost = make_peak_filter(500.0, 5.0, 18.0, SR).unwrap();
        let cut = make_peak_filter(8000.0, 0.5, -18.0, SR).unwrap();

        let mut stage = FilterStage::new(boost);
        stage.process(1.0);
        stage.process(0.0);

        stage.replace_coefficients(cut);

        let mut tail_energy = 0.0_f32;
        for _ in 0..64 {
            let y = stage.process(0.0);
            tail_energy += y * y;
        }
        assert!(
            tail_energy > 0.0,
            "delay line must survive a coefficient swap"
        );
    }

    #[test]
    fn test_no_discontinuity_across_swaps() {
        // Run a sine through the stage while swapping between two wildly
        // different designs every 256 samples. Successive output samples must
        // stay within the bound implied by the transfer functions themselves;
        // a state reset would show up as a jump.
        let a = make_peak_filter(200.0, 8.0, 20.0, SR).unwrap();
        let b = make_peak_filter(200.0, 8.0, -20.0, SR).unwrap();

        let mut stage = FilterStage::new(a);
        let mut prev = 0.0_f32;
        let mut max_step = 0.0_f32;
        for i in 0..4096 {
            if i % 512 == 256 {
                stage.replace_coefficients(if (i / 512) % 2 == 0 { b } else { a });
            }
            let t = i as f32 / SR;
            let x = (2.0 * std::f32::consts::PI * 200.0 * t).sin() * 0.25;
            let y = stage.process(x);
            assert!(y.is_finite());
            max_step = max_step.max((y - prev).abs());
            prev = y;
        }
        assert!(
            max_step < 0.6,
            "sample-to-sample step too large after swap: {max_step}"
        );
    }

    #[test]
    fn test_bypass_leaves_state_intact() {
        let coeffs = make_peak_filter(500.0, 5.0, 18.0, SR).unwrap();
        let mut stage = FilterStage::new(coeffs);

        stage.process(1.0);
        stage.set_bypassed(true);
        assert_eq!(stage.process(0.5), 0.5);
        stage.set_bypassed(false);

        // Still ringing from the impulse fed before the bypass.
        let mut tail_energy = 0.0_f32;
        for _ in 0..64 {
            let y = stage.process(0.0);
            tail_energy += y * y;
        }
        assert!(tail_energy > 0.0, "bypass must not clear the delay line");
    }

    #[test]
    fn test_reset_clears_state() {
        let coeffs = make_peak_filter(500.0, 5.0, 18.0, SR).unwrap();
        let mut stage = FilterStage::new(coeffs);

        stage.process(1.0);
        stage.reset();

        for _ in 0..16 {
            assert_eq!(stage.process(0.0), 0.0);
        }
    }
}
