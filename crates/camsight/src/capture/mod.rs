//! Frame sources.
//!
//! The loop pulls frames through [`FrameSource`]. Image files and
//! directories are always available as sources. Live cameras need the
//! `opencv` feature.

mod sequence;

use image::RgbImage;

use crate::error::Result;

pub use sequence::ImageSequenceSource;

#[cfg(feature = "opencv")]
pub use crate::highgui::OpenCvCamera;

/// A producer of color frames.
pub trait FrameSource {
    /// Block until the next frame is available.
    ///
    /// Returns `Ok(None)` once a finite source is exhausted.
    fn read_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}
