//! Analysis Engine
//!
//! Owns the worker thread that turns collected sample blocks into spectrum
//! frames. The audio thread only ever touches the block FIFOs; all FFT work
//! happens here, and the UI drains finished frames through
//! [`SpectrumOutlet`] at its own frame rate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use resona_dsp::{fifo, FifoConsumer, FifoProducer, SampleBlock, SpectrumAnalyzer, SpectrumFrame};

use crate::config::AnalysisConfig;
use crate::error::{ProcessorError, ProcessorResult};

/// Smoothing factor for spectrum decay (0.0 = instant, 1.0 = no decay)
const SPECTRUM_DECAY: f32 = 0.7;

/// Attack factor for spectrum rise (higher = faster response to new peaks)
const SPECTRUM_ATTACK: f32 = 0.5;

/// Idle sleep between empty FIFO polls on the worker thread.
const WORKER_IDLE: Duration = Duration::from_millis(4);

/// The audio-thread half of the analysis plumbing: one block producer per
/// channel, handed to the processor's sample collectors.
pub struct AnalysisFeed {
    pub(crate) left: FifoProducer<SampleBlock>,
    pub(crate) right: FifoProducer<SampleBlock>,
}

/// UI-side view of one channel's spectrum.
///
/// Draining through [`latest`] applies asymmetric attack/decay smoothing so
/// the display rises snappily and falls gently regardless of how many frames
/// arrived since the last poll.
///
/// [`latest`]: SpectrumOutlet::latest
pub struct SpectrumOutlet {
    frames: FifoConsumer<SpectrumFrame>,
    smoothed: SpectrumFrame,
}

impl SpectrumOutlet {
    fn new(frames: FifoConsumer<SpectrumFrame>) -> Self {
        Self {
            frames,
            smoothed: [0.0; resona_dsp::NUM_BINS],
        }
    }

    /// Fold any pending frames into the smoothed display state and return it.
    pub fn latest(&mut self) -> SpectrumFrame {
        while let Some(frame) = self.frames.pull() {
            for (current, &raw) in self.smoothed.iter_mut().zip(frame.iter()) {
                if raw > *current {
                    *current += (raw - *current) * SPECTRUM_ATTACK;
                } else {
                    *current = *current * SPECTRUM_DECAY + raw * (1.0 - SPECTRUM_DECAY);
                }
            }
        }
        self.smoothed
    }
}

/// Handle to the background analysis worker. Dropping it stops the thread.
pub struct AnalysisEngine {
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl AnalysisEngine {
    /// Allocate the FIFOs, spawn the worker and return the plumbing ends.
    pub fn start(
        config: &AnalysisConfig,
    ) -> ProcessorResult<(Self, AnalysisFeed, SpectrumOutlet, SpectrumOutlet)> {
        config.validate().map_err(ProcessorError::ConfigError)?;

        let (left_tx, mut left_rx) = fifo::<SampleBlock>(config.fifo_capacity);
        let (right_tx, mut right_rx) = fifo::<SampleBlock>(config.fifo_capacity);
        let (mut left_frame_tx, left_frame_rx) = fifo::<SpectrumFrame>(config.fifo_capacity);
        let (mut right_frame_tx, right_frame_rx) = fifo::<SpectrumFrame>(config.fifo_capacity);

        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_shutdown = Arc::clone(&shutdown);

        let worker = std::thread::Builder::new()
            .name("resona-analysis".into())
            .spawn(move || {
                let mut left_analyzer = SpectrumAnalyzer::new();
                let mut right_analyzer = SpectrumAnalyzer::new();

                tracing::debug!("analysis worker started");
                while !worker_shutdown.load(Ordering::Relaxed) {
                    let mut busy = false;
                    while let Some(block) = left_rx.pull() {
                        // A full frame FIFO means the UI stopped polling;
                        // dropping the frame is the right call.
                        left_frame_tx.push(left_analyzer.analyze(&block));
                        busy = true;
                    }
                    while let Some(block) = right_rx.pull() {
                        right_frame_tx.push(right_analyzer.analyze(&block));
                        busy = true;
                    }
                    if !busy {
                        std::thread::sleep(WORKER_IDLE);
                    }
                }
                tracing::debug!("analysis worker stopped");
            })?;

        Ok((
            Self {
                shutdown,
                worker: Some(worker),
            },
            AnalysisFeed {
                left: left_tx,
                right: right_tx,
            },
            SpectrumOutlet::new(left_frame_rx),
            SpectrumOutlet::new(right_frame_rx),
        ))
    }
}

impl Drop for AnalysisEngine {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("analysis worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_dsp::ANALYSIS_BLOCK_SIZE;
    use std::time::Instant;

    fn sine_block(freq: f32) -> SampleBlock {
        let mut samples = [0.0_f32; ANALYSIS_BLOCK_SIZE];
        for (i, s) in samples.iter_mut().enumerate() {
            let t = i as f32 / 48000.0;
            *s = (2.0 * std::f32::consts::PI * freq * t).sin();
        }
        SampleBlock::from_samples(samples)
    }

    #[test]
    fn test_blocks_become_frames() {
        let (engine, mut feed, mut left_out, _right_out) =
            AnalysisEngine::start(&AnalysisConfig::default()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut peak = 0.0_f32;
        while Instant::now() < deadline {
            feed.left.push(sine_block(1000.0));
            let frame = left_out.latest();
            peak = frame.iter().cloned().fold(peak, f32::max);
            if peak > 0.3 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(peak > 0.3, "worker never produced a frame with signal");
        drop(engine);
    }

    #[test]
    fn test_engine_stops_on_drop() {
        let (engine, feed, _l, _r) = AnalysisEngine::start(&AnalysisConfig::default()).unwrap();
        drop(engine);
        // Feed ends outlive the worker without issue.
        drop(feed);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = AnalysisConfig { fifo_capacity: 0 };
        assert!(matches!(
            AnalysisEngine::start(&bad),
            Err(ProcessorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_outlet_decays_toward_silence() {
        let frames = {
            let (mut tx, rx) = fifo::<SpectrumFrame>(8);
            let mut loud = [0.0; resona_dsp::NUM_BINS];
            loud[10] = 1.0;
            tx.push(loud);
            rx
        };
        let mut outlet = SpectrumOutlet::new(frames);

        let first = outlet.latest()[10];
        assert!(first > 0.0 && first <= 1.0);
        // No new frames: the displayed value holds rather than resetting.
        let held = outlet.latest()[10];
        assert_eq!(held, first);
    }
}
