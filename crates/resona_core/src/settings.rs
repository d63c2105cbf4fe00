//! Per-Block Settings Snapshot
//!
//! The audio thread reads every parameter exactly once per block into a
//! plain-value snapshot, then designs and applies coefficients from that.
//! Mid-block parameter writes therefore never tear a single design.

use resona_dsp::{Slope, NUM_PEAK_BANDS};

use crate::params::{EqParams, HIGH_CUT_OFF_MIN, LOW_CUT_OFF_MAX};

/// One peak band's values at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakBand {
    pub freq: f32,
    pub gain_db: f32,
    pub q: f32,
}

/// All chain-relevant parameter values, captured atomically enough for
/// per-block use: each field is one atomic read, and one block's filters are
/// designed from one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    pub low_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub high_cut_freq: f32,
    pub high_cut_slope: Slope,
    pub peaks: [PeakBand; NUM_PEAK_BANDS],
}

impl ChainSettings {
    /// Read the registry once.
    pub fn snapshot(params: &EqParams) -> Self {
        Self {
            low_cut_freq: params.low_cut_freq(),
            low_cut_slope: params.low_cut_slope(),
            high_cut_freq: params.high_cut_freq(),
            high_cut_slope: params.high_cut_slope(),
            peaks: core::array::from_fn(|i| PeakBand {
                freq: params.band_freq(i),
                gain_db: params.band_gain_db(i),
                q: params.band_q(i),
            }),
        }
    }

    /// Low-cut parked at the bottom of its travel counts as disabled.
    pub fn low_cut_off(&self) -> bool {
        self.low_cut_freq <= LOW_CUT_OFF_MAX
    }

    /// High-cut parked at the top of its travel counts as disabled.
    pub fn high_cut_off(&self) -> bool {
        self.high_cut_freq >= HIGH_CUT_OFF_MIN
    }
}
