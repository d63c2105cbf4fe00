//! Cut-Filter Cascade
//!
//! An ordered bank of 8 filter stages of which only a slope-dependent prefix
//! is active. Higher-order Butterworth rolloffs are reached by running one
//! additional 2nd-order section per 12 dB/octave.

use biquad::Coefficients;

use crate::design::{Slope, MAX_CUT_STAGES};
use crate::stage::FilterStage;

/// A series connection of up to 8 biquad sections.
///
/// Active stages always form a contiguous low-index prefix; everything past
/// the prefix is bypassed. A fully bypassed cascade contributes unity gain,
/// which is the explicit "filter off" policy rather than a degenerate design
/// at the range extremes.
pub struct CutCascade {
    stages: [FilterStage; MAX_CUT_STAGES],
}

impl CutCascade {
    /// Create a cascade with all stages bypassed (filter off).
    pub fn new() -> Self {
        let stages = core::array::from_fn(|_| {
            let mut stage = FilterStage::unity();
            stage.set_bypassed(true);
            stage
        });
        Self { stages }
    }

    /// Install a designed coefficient set and activate the slope's prefix.
    ///
    /// All 8 stages are bypassed first; when `is_off` is set they stay that
    /// way and the cascade passes audio through unchanged. Otherwise stages
    /// `0..slope.sections()` receive their coefficient sets and are enabled.
    /// Delay-line state is never cleared by this call.
    pub fn apply_coefficients(
        &mut self,
        coeffs: &[Coefficients<f32>; MAX_CUT_STAGES],
        slope: Slope,
        is_off: bool,
    ) {
        for stage in &mut self.stages {
            stage.set_bypassed(true);
        }
        if is_off {
            return;
        }
        for k in 0..slope.sections() {
            self.stages[k].replace_coefficients(coeffs[k]);
            self.stages[k].set_bypassed(false);
        }
    }

    /// Bypass every stage without touching coefficients or state.
    pub fn bypass_all(&mut self) {
        for stage in &mut self.stages {
            stage.set_bypassed(true);
        }
    }

    /// Process one sample through all active stages in index order.
    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let mut x = sample;
        for stage in &mut self.stages {
            x = stage.process(x);
        }
        x
    }

    /// Number of currently active (non-bypassed) stages.
    pub fn active_stages(&self) -> usize {
        self.stages.iter().filter(|s| !s.is_bypassed()).count()
    }

    /// True if the active stages form a contiguous prefix of the bank.
    pub fn active_is_prefix(&self) -> bool {
        let active = self.active_stages();
        self.stages[..active].iter().all(|s| !s.is_bypassed())
            && self.stages[active..].iter().all(|s| s.is_bypassed())
    }

    /// Clear the delay lines of all stages.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

impl Default for CutCascade {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{make_cut_filter, CutKind};

    const SR: f32 = 48000.0;

    #[test]
    fn test_new_cascade_is_off() {
        let mut cascade = CutCascade::new();
        assert_eq!(cascade.active_stages(), 0);
        assert_eq!(cascade.process_sample(0.42), 0.42);
    }

    #[test]
    fn test_active_prefix_for_every_slope() {
        for slope in Slope::ALL {
            let coeffs = make_cut_filter(200.0, SR, slope, CutKind::LowCut).unwrap();
            let mut cascade = CutCascade::new();
            cascade.apply_coefficients(&coeffs, slope, false);

            assert_eq!(
                cascade.active_stages(),
                slope.sections(),
                "{slope:?}: wrong number of active stages"
            );
            assert!(
                cascade.active_is_prefix(),
                "{slope:?}: active stages must be a contiguous prefix"
            );
        }
    }

    #[test]
    fn test_off_bypasses_regardless_of_slope() {
        for slope in Slope::ALL {
            let coeffs = make_cut_filter(200.0, SR, slope, CutKind::LowCut).unwrap();
            let mut cascade = CutCascade::new();
            cascade.apply_coefficients(&coeffs, slope, true);

            assert_eq!(cascade.active_stages(), 0);
            for x in [0.1, -0.9, 0.5] {
                assert_eq!(cascade.process_sample(x), x, "off cascade must be unity");
            }
        }
    }

    #[test]
    fn test_reapplying_shorter_slope_shrinks_prefix() {
        let mut cascade = CutCascade::new();

        let steep = make_cut_filter(200.0, SR, Slope::Db96, CutKind::LowCut).unwrap();
        cascade.apply_coefficients(&steep, Slope::Db96, false);
        assert_eq!(cascade.active_stages(), 8);

        let gentle = make_cut_filter(200.0, SR, Slope::Db24, CutKind::LowCut).unwrap();
        cascade.apply_coefficients(&gentle, Slope::Db24, false);
        assert_eq!(cascade.active_stages(), 2);
        assert!(cascade.active_is_prefix());
    }

    #[test]
    fn test_low_cut_attenuates_low_frequencies() {
        let coeffs = make_cut_filter(1000.0, SR, Slope::Db48, CutKind::LowCut).unwrap();
        let mut cascade = CutCascade::new();
        cascade.apply_coefficients(&coeffs, Slope::Db48, false);

        // 100Hz sine, well below the 1kHz cutoff of a 48dB/oct high-pass.
        let mut peak = 0.0_f32;
        for i in 0..48000 {
            let t = i as f32 / SR;
            let x = (2.0 * std::f32::consts::PI * 100.0 * t).sin();
            let y = cascade.process_sample(x);
            if i > 24000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.01, "100Hz should be heavily attenuated, got {peak}");
    }

    #[test]
    fn test_high_cut_passes_low_frequencies() {
        let coeffs = make_cut_filter(10000.0, SR, Slope::Db24, CutKind::HighCut).unwrap();
        let mut cascade = CutCascade::new();
        cascade.apply_coefficients(&coeffs, Slope::Db24, false);

        let mut peak = 0.0_f32;
        for i in 0..48000 {
            let t = i as f32 / SR;
            let x = (2.0 * std::f32::consts::PI * 100.0 * t).sin();
            let y = cascade.process_sample(x);
            if i > 24000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(
            (peak - 1.0).abs() < 0.05,
            "100Hz should pass a 10kHz low-pass at unity, got {peak}"
        );
    }
}
