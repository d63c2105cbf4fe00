//! Parameter Registry
//!
//! Lock-free storage for every user-facing EQ parameter. Control threads
//! write through the clamping setters; the audio thread reads a coherent
//! snapshot once per block (see [`crate::settings::ChainSettings`]).

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use resona_dsp::{Slope, NUM_PEAK_BANDS};

/// A low-cut frequency at or below this is treated as "off".
pub const LOW_CUT_OFF_MAX: f32 = 10.0;

/// A high-cut frequency at or above this is treated as "off".
pub const HIGH_CUT_OFF_MIN: f32 = 21_000.0;

/// Factory center frequencies for the five peak bands.
pub const PEAK_DEFAULT_FREQS: [f32; NUM_PEAK_BANDS] = [120.0, 250.0, 500.0, 1000.0, 3200.0];

/// Atomic f32 built on bit-casting through `AtomicU32`.
///
/// Relaxed ordering is fine for single-value updates that don't need to
/// synchronize with other memory operations.
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// A bounded parameter range with a skew factor for UI mapping.
///
/// `skew < 1.0` compresses the top of the range so a fader spends more of
/// its travel on the low end; 0.5 on the frequency range gives the familiar
/// log-like feel.
#[derive(Debug, Clone, Copy)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
    pub skew: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32, skew: f32) -> Self {
        Self { min, max, skew }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Map a value in the range to 0..=1 fader position.
    pub fn normalize(&self, value: f32) -> f32 {
        let proportion = (self.clamp(value) - self.min) / (self.max - self.min);
        proportion.powf(self.skew)
    }

    /// Map a 0..=1 fader position back into the range.
    pub fn denormalize(&self, position: f32) -> f32 {
        let proportion = position.clamp(0.0, 1.0).powf(1.0 / self.skew);
        self.min + proportion * (self.max - self.min)
    }
}

/// Frequency faders, shared by cut and peak controls.
pub const FREQ_RANGE: FloatRange = FloatRange::new(5.0, 22_000.0, 0.5);

/// Peak gain in dB.
pub const GAIN_RANGE: FloatRange = FloatRange::new(-24.0, 24.0, 1.0);

/// Peak quality factor.
pub const Q_RANGE: FloatRange = FloatRange::new(0.1, 10.0, 1.0);

struct BandParams {
    freq: AtomicF32,
    gain_db: AtomicF32,
    q: AtomicF32,
}

impl BandParams {
    fn new(freq: f32) -> Self {
        Self {
            freq: AtomicF32::new(freq),
            gain_db: AtomicF32::new(0.0),
            q: AtomicF32::new(1.0),
        }
    }
}

/// Every EQ parameter, readable and writable from any thread without locks.
///
/// Setters clamp into the legal range rather than erroring; out-of-range
/// slider values are a UI bug, not a reason to glitch audio. Band index is
/// the one exception and is checked by the caller via
/// [`resona_dsp::NUM_PEAK_BANDS`]; the accessors here panic on a bad index
/// like slice indexing does.
pub struct EqParams {
    low_cut_freq: AtomicF32,
    low_cut_slope: AtomicU8,
    high_cut_freq: AtomicF32,
    high_cut_slope: AtomicU8,
    bands: [BandParams; NUM_PEAK_BANDS],
}

impl EqParams {
    pub fn new() -> Self {
        Self {
            // Both cuts ship parked in their off ranges
            low_cut_freq: AtomicF32::new(5.0),
            low_cut_slope: AtomicU8::new(Slope::default().index() as u8),
            high_cut_freq: AtomicF32::new(22_000.0),
            high_cut_slope: AtomicU8::new(Slope::default().index() as u8),
            bands: core::array::from_fn(|i| BandParams::new(PEAK_DEFAULT_FREQS[i])),
        }
    }

    pub fn set_low_cut_freq(&self, freq: f32) {
        self.low_cut_freq.store(FREQ_RANGE.clamp(freq));
    }

    pub fn low_cut_freq(&self) -> f32 {
        self.low_cut_freq.load()
    }

    pub fn set_low_cut_slope(&self, slope: Slope) {
        self.low_cut_slope
            .store(slope.index() as u8, Ordering::Relaxed);
    }

    pub fn low_cut_slope(&self) -> Slope {
        Slope::from_index(self.low_cut_slope.load(Ordering::Relaxed) as usize)
    }

    pub fn set_high_cut_freq(&self, freq: f32) {
        self.high_cut_freq.store(FREQ_RANGE.clamp(freq));
    }

    pub fn high_cut_freq(&self) -> f32 {
        self.high_cut_freq.load()
    }

    pub fn set_high_cut_slope(&self, slope: Slope) {
        self.high_cut_slope
            .store(slope.index() as u8, Ordering::Relaxed);
    }

    pub fn high_cut_slope(&self) -> Slope {
        Slope::from_index(self.high_cut_slope.load(Ordering::Relaxed) as usize)
    }

    pub fn set_band_freq(&self, band: usize, freq: f32) {
        self.bands[band].freq.store(FREQ_RANGE.clamp(freq));
    }

    pub fn band_freq(&self, band: usize) -> f32 {
        self.bands[band].freq.load()
    }

    pub fn set_band_gain_db(&self, band: usize, gain_db: f32) {
        self.bands[band].gain_db.store(GAIN_RANGE.clamp(gain_db));
    }

    pub fn band_gain_db(&self, band: usize) -> f32 {
        self.bands[band].gain_db.load()
    }

    pub fn set_band_q(&self, band: usize, q: f32) {
        self.bands[band].q.store(Q_RANGE.clamp(q));
    }

    pub fn band_q(&self, band: usize) -> f32 {
        self.bands[band].q.load()
    }

    /// Capture every parameter into a serializable settings struct.
    pub fn to_settings(&self) -> EqSettings {
        EqSettings {
            low_cut_freq: self.low_cut_freq(),
            low_cut_slope: self.low_cut_slope().index(),
            high_cut_freq: self.high_cut_freq(),
            high_cut_slope: self.high_cut_slope().index(),
            bands: core::array::from_fn(|i| BandSettings {
                freq: self.band_freq(i),
                gain_db: self.band_gain_db(i),
                q: self.band_q(i),
            }),
        }
    }

    /// Load every parameter from a settings struct, clamping as usual.
    pub fn apply_settings(&self, settings: &EqSettings) {
        self.set_low_cut_freq(settings.low_cut_freq);
        self.set_low_cut_slope(Slope::from_index(settings.low_cut_slope));
        self.set_high_cut_freq(settings.high_cut_freq);
        self.set_high_cut_slope(Slope::from_index(settings.high_cut_slope));
        for (i, band) in settings.bands.iter().enumerate() {
            self.set_band_freq(i, band.freq);
            self.set_band_gain_db(i, band.gain_db);
            self.set_band_q(i, band.q);
        }
    }
}

impl Default for EqParams {
    fn default() -> Self {
        Self::new()
    }
}

/// One peak band's persisted state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandSettings {
    pub freq: f32,
    pub gain_db: f32,
    pub q: f32,
}

/// Persistable form of [`EqParams`]. Slopes are stored as their index so the
/// on-disk format stays stable if the enum gains variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EqSettings {
    pub low_cut_freq: f32,
    pub low_cut_slope: usize,
    pub high_cut_freq: f32,
    pub high_cut_slope: usize,
    pub bands: [BandSettings; NUM_PEAK_BANDS],
}
