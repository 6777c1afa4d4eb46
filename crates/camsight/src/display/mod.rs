//! Display sinks.
//!
//! The loop hands every [`View`] to a [`FrameSink`] and polls it for key
//! presses between frames. On-screen windows need the `opencv` feature.
//! The directory and headless sinks run anywhere.

mod directory;

use std::time::Duration;

use crate::error::Result;
use crate::processor::View;

pub use directory::DirectorySink;

#[cfg(feature = "opencv")]
pub use crate::highgui::HighGuiDisplay;

/// A consumer of rendered views.
pub trait FrameSink {
    /// Prepare the named windows before the first frame.
    fn open_windows(&mut self, _windows: &[&'static str]) -> Result<()> {
        Ok(())
    }

    /// Render one view of frame `frame_index`.
    fn show(&mut self, view: &View, frame_index: u64) -> Result<()>;

    /// Wait up to `delay` for a key press.
    ///
    /// Returns the key code when a key was pressed, `None` otherwise. Sinks
    /// without a keyboard return `None` immediately.
    fn wait_key(&mut self, delay: Duration) -> Result<Option<i32>>;
}

/// Discards every view. Useful for running the analysis with only the
/// per-frame diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessSink;

impl FrameSink for HeadlessSink {
    fn show(&mut self, _view: &View, _frame_index: u64) -> Result<()> {
        Ok(())
    }

    fn wait_key(&mut self, _delay: Duration) -> Result<Option<i32>> {
        Ok(None)
    }
}
