//! Filter Coefficient Design
//!
//! Pure functions mapping user-facing parameters (frequency, Q, gain, slope)
//! to biquad coefficient sets. Peak bands use the RBJ (Robert Bristow-Johnson)
//! Audio EQ Cookbook peaking design; cut filters are Butterworth high-pass or
//! low-pass responses built as cascades of 2nd-order sections, one section per
//! 12 dB/octave of selected slope.

use std::f32::consts::PI;

use biquad::{Coefficients, ToHertz, Type};

use crate::error::DesignError;

/// Number of 2nd-order sections held by a cut-filter cascade.
///
/// The steepest selectable slope (96 dB/octave) is a 16th-order Butterworth
/// response, i.e. 8 cascaded biquads.
pub const MAX_CUT_STAGES: usize = 8;

/// Cut-filter slope selection, one discrete step per 12 dB/octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slope {
    Db12,
    Db24,
    Db36,
    Db48,
    Db60,
    Db72,
    Db84,
    Db96,
}

impl Slope {
    /// All slopes, in ascending steepness order.
    pub const ALL: [Slope; MAX_CUT_STAGES] = [
        Slope::Db12,
        Slope::Db24,
        Slope::Db36,
        Slope::Db48,
        Slope::Db60,
        Slope::Db72,
        Slope::Db84,
        Slope::Db96,
    ];

    /// Discrete choice index (0-7).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Slope from a choice index; out-of-range indices saturate at the
    /// steepest slope so a corrupted stored value can never panic.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(MAX_CUT_STAGES - 1)]
    }

    /// Number of active 2nd-order sections for this slope.
    #[inline]
    pub fn sections(self) -> usize {
        self.index() + 1
    }

    /// Combined filter order of the cascade.
    #[inline]
    pub fn order(self) -> usize {
        2 * self.sections()
    }

    /// Rolloff in dB per octave.
    #[inline]
    pub fn db_per_octave(self) -> usize {
        12 * self.sections()
    }
}

impl Default for Slope {
    fn default() -> Self {
        Slope::Db12
    }
}

/// Which side of the spectrum a cut filter removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    /// High-pass response: removes content below the cutoff.
    LowCut,
    /// Low-pass response: removes content above the cutoff.
    HighCut,
}

/// Clamp a design frequency strictly inside (0, Nyquist).
///
/// The parameter layer already constrains frequencies to its published range,
/// but the range top (22 kHz) can exceed Nyquist at low sample rates. Clamping
/// here keeps the bilinear transform away from its singularities instead of
/// letting coefficients blow up to NaN.
#[inline]
fn clamp_design_freq(freq: f32, sample_rate: f32) -> f32 {
    freq.clamp(1.0, sample_rate * 0.49)
}

/// Design a parametric peaking (bell) filter.
///
/// `gain_db` is the boost/cut at the center frequency; `q` controls the
/// bandwidth of the bell. Valid for frequencies strictly inside
/// `(0, sample_rate / 2)`; inputs outside that range are clamped.
pub fn make_peak_filter(
    freq: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Result<Coefficients<f32>, DesignError> {
    if !(sample_rate > 0.0) {
        return Err(DesignError::InvalidSampleRate(sample_rate));
    }
    if !(q > 0.0) {
        return Err(DesignError::InvalidQ(q));
    }

    let freq = clamp_design_freq(freq, sample_rate);
    Coefficients::<f32>::from_params(
        Type::PeakingEQ(gain_db),
        sample_rate.hz(),
        freq.hz(),
        q,
    )
    .map_err(|_| DesignError::InvalidCoefficients {
        frequency: freq,
        sample_rate,
    })
}

/// Design a Butterworth cut filter as a cascade of 2nd-order sections.
///
/// Always returns [`MAX_CUT_STAGES`] coefficient sets; only the first
/// `slope.sections()` describe the requested response and the trailing slots
/// repeat the last designed section (callers bypass them). Per-section Q
/// values are the standard Butterworth pole placements
/// `1 / (2 cos(pi (2k+1) / (2n)))` for order `n`, so the cascaded magnitude
/// is -3 dB at the cutoff for every slope.
pub fn make_cut_filter(
    freq: f32,
    sample_rate: f32,
    slope: Slope,
    kind: CutKind,
) -> Result<[Coefficients<f32>; MAX_CUT_STAGES], DesignError> {
    if !(sample_rate > 0.0) {
        return Err(DesignError::InvalidSampleRate(sample_rate));
    }

    let freq = clamp_design_freq(freq, sample_rate);
    let filter_type = match kind {
        CutKind::LowCut => Type::HighPass,
        CutKind::HighCut => Type::LowPass,
    };

    let sections = slope.sections();
    let order = slope.order();

    let design_section = |k: usize| -> Result<Coefficients<f32>, DesignError> {
        let theta = PI * (2 * k + 1) as f32 / (2 * order) as f32;
        let q = 1.0 / (2.0 * theta.cos());
        Coefficients::<f32>::from_params(filter_type, sample_rate.hz(), freq.hz(), q).map_err(
            |_| DesignError::InvalidCoefficients {
                frequency: freq,
                sample_rate,
            },
        )
    };

    let mut coeffs = [design_section(0)?; MAX_CUT_STAGES];
    for k in 1..sections {
        coeffs[k] = design_section(k)?;
    }
    let last = coeffs[sections - 1];
    for slot in coeffs.iter_mut().skip(sections) {
        *slot = last;
    }

    Ok(coeffs)
}

/// Magnitude of a biquad section's transfer function at `freq`.
///
/// Evaluates `|H(e^{jw})|` in f64 for accuracy; used by response-curve
/// rendering and by tests. Not part of the per-sample hot path.
pub fn magnitude_for_frequency(coeffs: &Coefficients<f32>, freq: f32, sample_rate: f32) -> f32 {
    let w = 2.0 * std::f64::consts::PI * f64::from(freq) / f64::from(sample_rate);
    let (sin1, cos1) = w.sin_cos();
    let (sin2, cos2) = (2.0 * w).sin_cos();

    let (b0, b1, b2) = (
        f64::from(coeffs.b0),
        f64::from(coeffs.b1),
        f64::from(coeffs.b2),
    );
    let (a1, a2) = (f64::from(coeffs.a1), f64::from(coeffs.a2));

    // H(z) = (b0 + b1 z^-1 + b2 z^-2) / (1 + a1 z^-1 + a2 z^-2) at z = e^{jw}
    let num_re = b0 + b1 * cos1 + b2 * cos2;
    let num_im = -(b1 * sin1 + b2 * sin2);
    let den_re = 1.0 + a1 * cos1 + a2 * cos2;
    let den_im = -(a1 * sin1 + a2 * sin2);

    let num = num_re.hypot(num_im);
    let den = den_re.hypot(den_im);
    (num / den) as f32
}

/// Convert a linear magnitude to decibels.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.max(1e-12).log10()
}
