//! camsight — per-frame analysis for live capture loops.
//!
//! Two frame analysers share one blocking loop:
//!
//! 1. **Circles** – Hough gradient circle detection on the intensity image,
//!    with outlines drawn on the color frame and a Canny edge map shown
//!    alongside.
//! 2. **Dark frame** – a 256-bin intensity histogram plotted over the frame;
//!    frames whose darkest buckets hold most of the pixels get a warning
//!    border.
//!
//! The loop ([`run_loop`]) pulls frames from a [`FrameSource`], hands them to
//! a [`FrameProcessor`] and renders the resulting views to a [`FrameSink`]
//! until a key is pressed or the source runs dry.
//!
//! The numeric primitives ([`find_circles`], [`Histogram`], [`edge_map`],
//! [`to_gray`]) work on plain `image` buffers and need no device.
//!
//! # Features
//! - `opencv`: camera capture ([`OpenCvCamera`]) and on-screen windows
//!   ([`HighGuiDisplay`]) through the OpenCV bindings.

pub mod capture;
mod color;
pub mod config;
pub mod display;
mod edges;
mod error;
#[cfg(feature = "opencv")]
mod highgui;
mod histogram;
mod hough;
mod overlay;
pub mod processor;
mod run;
#[cfg(test)]
pub(crate) mod test_utils;

pub use capture::{FrameSource, ImageSequenceSource};
pub use color::{luma, to_gray};
pub use display::{DirectorySink, FrameSink, HeadlessSink};
pub use edges::{count_edges, edge_map, EdgeConfig};
pub use error::{Error, Result};
pub use histogram::{DarkFrameConfig, DarkFrameStats, Histogram, BINS};
pub use hough::{find_circles, Circle, HoughCircleConfig, HoughParams};
pub use overlay::{
    draw_circles, draw_histogram_bars, draw_histogram_box, draw_warning_border, BorderStyle,
    CircleStyle, HistogramPlotStyle,
};
pub use processor::{
    CircleProcessor, CircleProcessorConfig, DarkFrameProcessor, DarkFrameProcessorConfig,
    FrameOutput, FrameProcessor, FrameReport, View, EDGES_WINDOW, FRAMES_WINDOW,
};
pub use run::{run_loop, LoopConfig, LoopSummary, StopReason};

#[cfg(feature = "opencv")]
pub use highgui::{HighGuiDisplay, OpenCvCamera};
