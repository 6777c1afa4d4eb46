use image::{DynamicImage, RgbImage};

use super::{FrameOutput, FrameProcessor, FrameReport, View, FRAMES_WINDOW};
use crate::color::to_gray;
use crate::histogram::{DarkFrameConfig, DarkFrameStats, Histogram};
use crate::overlay::{
    draw_histogram_bars, draw_histogram_box, draw_warning_border, BorderStyle, HistogramPlotStyle,
};

/// Configuration of the dark-frame program.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DarkFrameProcessorConfig {
    /// Dark-bucket range and warning threshold.
    pub dark: DarkFrameConfig,
    /// Placement of the histogram plot.
    pub plot: HistogramPlotStyle,
    /// Border drawn on frames flagged as dark.
    pub border: BorderStyle,
}

/// Plots the intensity histogram over the frame and flags mostly-black
/// frames with a border.
#[derive(Debug, Clone, Default)]
pub struct DarkFrameProcessor {
    config: DarkFrameProcessorConfig,
}

impl DarkFrameProcessor {
    pub fn new(config: DarkFrameProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DarkFrameProcessorConfig {
        &self.config
    }
}

impl FrameProcessor for DarkFrameProcessor {
    fn name(&self) -> &'static str {
        "dark"
    }

    fn windows(&self) -> Vec<&'static str> {
        vec![FRAMES_WINDOW]
    }

    fn process(&mut self, frame: &RgbImage) -> FrameOutput {
        let cfg = &self.config;
        let mut gray = to_gray(frame);

        // The guide box is part of the frame by the time the histogram is taken.
        draw_histogram_box(&mut gray, &cfg.plot);
        let hist = Histogram::of(&gray);
        let heights = hist.normalized(0.0, cfg.plot.plot_height);
        draw_histogram_bars(&mut gray, &heights, &cfg.plot);

        let stats = DarkFrameStats::from_histogram(&hist, &cfg.dark);
        if stats.warning {
            tracing::debug!(dark_percent = stats.dark_percent, "dark frame");
            draw_warning_border(&mut gray, &cfg.border);
        }

        FrameOutput {
            views: vec![View {
                window: FRAMES_WINDOW,
                image: DynamicImage::ImageLuma8(gray),
            }],
            report: FrameReport::DarkFrame(stats),
        }
    }
}
