//! Sample Collector
//!
//! Accumulates post-EQ audio into fixed-size blocks and hands complete blocks
//! to the analysis thread through the lock-free FIFO. Runs entirely inside
//! the audio callback.

use crate::fifo::FifoProducer;

/// Samples per analysis block. Also the FFT size downstream.
pub const ANALYSIS_BLOCK_SIZE: usize = 2048;

/// A fixed-size chunk of mono audio for spectrum analysis.
///
/// Plain `Copy` payload so pushing a block into the FIFO is a memcpy, not an
/// allocation.
#[derive(Clone, Copy)]
pub struct SampleBlock {
    samples: [f32; ANALYSIS_BLOCK_SIZE],
}

impl SampleBlock {
    pub fn silence() -> Self {
        Self {
            samples: [0.0; ANALYSIS_BLOCK_SIZE],
        }
    }

    pub fn from_samples(samples: [f32; ANALYSIS_BLOCK_SIZE]) -> Self {
        Self { samples }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}

impl Default for SampleBlock {
    fn default() -> Self {
        Self::silence()
    }
}

/// Accumulates samples until a full block is ready, then ships it.
///
/// Block boundaries are independent of the callback's buffer size: a 512
/// sample callback fills a 2048 sample block across four calls, and a block
/// may complete mid-callback.
pub struct SampleCollector {
    block: SampleBlock,
    fill: usize,
    producer: FifoProducer<SampleBlock>,
    prepared: bool,
    dropped_blocks: u64,
}

impl SampleCollector {
    pub fn new(producer: FifoProducer<SampleBlock>) -> Self {
        Self {
            block: SampleBlock::silence(),
            fill: 0,
            producer,
            prepared: false,
            dropped_blocks: 0,
        }
    }

    /// Discard any partial block and start collecting from scratch.
    pub fn prepare(&mut self) {
        self.fill = 0;
        self.prepared = true;
    }

    /// Append a callback's worth of samples, shipping each block as it
    /// completes.
    ///
    /// # Real-time Safety
    /// No allocations; a completed block is a fixed-size copy into the ring
    /// buffer. Full-buffer pushes drop the block and count it.
    pub fn update(&mut self, samples: &[f32]) {
        debug_assert!(self.prepared, "collector used before prepare()");
        let mut rest = samples;
        while !rest.is_empty() {
            let room = ANALYSIS_BLOCK_SIZE - self.fill;
            let take = room.min(rest.len());
            self.block.samples[self.fill..self.fill + take].copy_from_slice(&rest[..take]);
            self.fill += take;
            rest = &rest[take..];

            if self.fill == ANALYSIS_BLOCK_SIZE {
                if !self.producer.push(self.block) {
                    self.dropped_blocks += 1;
                }
                self.fill = 0;
            }
        }
    }

    /// Blocks discarded because the analysis thread fell behind.
    pub fn dropped_blocks(&self) -> u64 {
        self.dropped_blocks
    }
}
