//! Spectrum Analysis
//!
//! Converts completed sample blocks into compact log-spaced magnitude frames
//! for visualization. This code runs on the analysis worker thread, never in
//! the audio callback; the only audio-thread work is the block copy done by
//! the collector.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::collector::{SampleBlock, ANALYSIS_BLOCK_SIZE};

/// FFT size, equal to the analysis block size.
/// 2048 samples at 48kHz = ~42ms window, ~23Hz resolution.
pub const FFT_SIZE: usize = ANALYSIS_BLOCK_SIZE;

/// Log-spaced output bins, sized for efficient UI rendering.
pub const NUM_BINS: usize = 32;

/// One analyzed frame: per-bin magnitude normalized to 0.0..=1.0 over a
/// 60dB display range.
pub type SpectrumFrame = [f32; NUM_BINS];

/// Bottom of the display range; anything quieter renders as zero.
const FLOOR_DB: f32 = -60.0;

fn hann_coefficient(n: usize, size: usize) -> f32 {
    0.5 * (1.0 - (2.0 * std::f32::consts::PI * n as f32 / (size - 1) as f32).cos())
}

/// Pre-computed Hann window, applied before every transform to reduce
/// spectral leakage.
struct HannWindow {
    coeffs: [f32; FFT_SIZE],
}

impl HannWindow {
    fn new() -> Self {
        Self {
            coeffs: core::array::from_fn(|i| hann_coefficient(i, FFT_SIZE)),
        }
    }
}

/// Turns sample blocks into [`SpectrumFrame`]s.
///
/// Owns its FFT plan and working buffers, so after construction `analyze`
/// performs no allocations. Not shared across threads; the worker owns one
/// per channel.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: HannWindow,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Self {
            fft,
            window: HannWindow::new(),
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            scratch,
        }
    }

    /// Window, transform and reduce one block to a display frame.
    pub fn analyze(&mut self, block: &SampleBlock) -> SpectrumFrame {
        for (i, (&sample, slot)) in block
            .as_slice()
            .iter()
            .zip(self.buffer.iter_mut())
            .enumerate()
        {
            *slot = Complex::new(sample * self.window.coeffs[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let mut frame = [0.0; NUM_BINS];
        reduce_to_log_bins(&self.buffer, &mut frame);
        frame
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Average FFT magnitudes into logarithmically spaced bands and normalize
/// each to the 0.0..=1.0 display range.
///
/// Log spacing matches perceived pitch: the low octaves get as much visual
/// real estate as the top of the spectrum.
fn reduce_to_log_bins(fft_output: &[Complex<f32>], frame: &mut SpectrumFrame) {
    let nyquist = FFT_SIZE / 2;

    // Skip DC; spread the remaining bins 1..nyquist over NUM_BINS bands.
    let log_min = 1.0_f32.ln();
    let log_max = (nyquist as f32).ln();
    let log_step = (log_max - log_min) / NUM_BINS as f32;

    // A full-scale sine concentrated in one bin measures about FFT_SIZE/4
    // after the Hann window's 0.5 coherent gain.
    let reference_magnitude = (FFT_SIZE as f32) / 4.0;

    for (i, band) in frame.iter_mut().enumerate() {
        let start = (log_min + i as f32 * log_step).exp() as usize;
        let end = ((log_min + (i + 1) as f32 * log_step).exp() as usize).min(nyquist - 1);
        let end = (end + 1).min(nyquist);

        let (sum, count): (f32, usize) = fft_output[start..end]
            .iter()
            .map(|c| c.norm())
            .fold((0.0, 0), |(s, c), mag| (s + mag, c + 1));
        let avg = if count > 0 { sum / count as f32 } else { 0.0 };

        let db = 20.0 * (avg / reference_magnitude).max(1e-10).log10();
        *band = ((db - FLOOR_DB) / -FLOOR_DB).clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_block(freq: f32, sample_rate: f32, amplitude: f32) -> SampleBlock {
        let mut samples = [0.0_f32; ANALYSIS_BLOCK_SIZE];
        for (i, s) in samples.iter_mut().enumerate() {
            let t = i as f32 / sample_rate;
            *s = (2.0 * std::f32::consts::PI * freq * t).sin() * amplitude;
        }
        SampleBlock::from_samples(samples)
    }

    #[test]
    fn test_silence_is_floor() {
        let mut analyzer = SpectrumAnalyzer::new();
        let frame = analyzer.analyze(&SampleBlock::silence());
        for bin in frame {
            assert_eq!(bin, 0.0);
        }
    }

    #[test]
    fn test_sine_concentrates_in_one_band() {
        let mut analyzer = SpectrumAnalyzer::new();
        let frame = analyzer.analyze(&sine_block(1000.0, 48000.0, 1.0));

        let (peak_bin, peak) = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert!(peak > &0.6, "full-scale sine should read high: {peak}");
        // 1kHz lands around FFT bin 43, roughly band 17 of 32.
        assert!(
            (15..=19).contains(&peak_bin),
            "1kHz peaked in band {peak_bin}"
        );
    }

    #[test]
    fn test_quieter_input_reads_lower() {
        let mut analyzer = SpectrumAnalyzer::new();
        let loud = analyzer.analyze(&sine_block(1000.0, 48000.0, 1.0));
        let quiet = analyzer.analyze(&sine_block(1000.0, 48000.0, 0.01));

        let max_loud = loud.iter().cloned().fold(0.0_f32, f32::max);
        let max_quiet = quiet.iter().cloned().fold(0.0_f32, f32::max);
        assert!(max_quiet < max_loud, "-40dB input must read lower");
        assert!(max_quiet > 0.0, "-40dB is still above the display floor");
    }

    #[test]
    fn test_hann_window_shape() {
        let w = HannWindow::new();
        assert!(w.coeffs[0] < 0.01);
        assert!(w.coeffs[FFT_SIZE - 1] < 0.01);
        assert!((w.coeffs[FFT_SIZE / 2] - 1.0).abs() < 0.01);
    }
}
