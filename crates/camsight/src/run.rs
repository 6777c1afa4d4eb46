//! The capture → process → display loop.

use std::time::Duration;

use crate::capture::FrameSource;
use crate::display::FrameSink;
use crate::error::Result;
use crate::processor::{FrameProcessor, FrameReport};

/// Loop pacing and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Longest wait for a key press per iteration (milliseconds).
    pub key_wait_ms: u64,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            key_wait_ms: 30,
            max_frames: None,
        }
    }
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The sink reported a key press.
    KeyPressed(i32),
    /// A finite source ran out of frames.
    SourceExhausted,
    /// `max_frames` frames were processed.
    FrameLimit,
}

/// Outcome of a finished loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    /// Frames processed.
    pub frames: u64,
    pub stop: StopReason,
}

/// Run `processor` over frames from `source` until a key press, the end of
/// the source, or the frame limit.
///
/// `on_report` receives every frame's report before its views are shown.
/// Any error from the source, the sink or `on_report` ends the loop.
pub fn run_loop<F>(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    processor: &mut dyn FrameProcessor,
    config: &LoopConfig,
    mut on_report: F,
) -> Result<LoopSummary>
where
    F: FnMut(u64, &FrameReport) -> Result<()>,
{
    sink.open_windows(&processor.windows())?;
    tracing::info!(
        "Running {} on {} (key wait {} ms)",
        processor.name(),
        source.describe(),
        config.key_wait_ms
    );

    let delay = Duration::from_millis(config.key_wait_ms);
    let mut frames = 0u64;
    let stop = loop {
        if config.max_frames.is_some_and(|max| frames >= max) {
            break StopReason::FrameLimit;
        }
        if let Some(key) = sink.wait_key(delay)? {
            break StopReason::KeyPressed(key);
        }
        let Some(frame) = source.read_frame()? else {
            break StopReason::SourceExhausted;
        };

        let out = processor.process(&frame);
        on_report(frames, &out.report)?;
        for view in &out.views {
            sink.show(view, frames)?;
        }
        frames += 1;
    };

    tracing::info!("Stopped after {} frames: {:?}", frames, stop);
    Ok(LoopSummary { frames, stop })
}
