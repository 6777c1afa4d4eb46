//! Per-frame processors.
//!
//! A [`FrameProcessor`] turns one captured color frame into the views to
//! display and a [`FrameReport`] describing what it found. Processors hold
//! configuration only; nothing carries over from one frame to the next.

mod circles;
mod dark_frame;

use image::{DynamicImage, RgbImage};

use crate::histogram::DarkFrameStats;
use crate::hough::Circle;

pub use circles::{CircleProcessor, CircleProcessorConfig};
pub use dark_frame::{DarkFrameProcessor, DarkFrameProcessorConfig};

/// Window showing the annotated frame.
pub const FRAMES_WINDOW: &str = "Frames";
/// Window showing the Canny edge map of the circle program.
pub const EDGES_WINDOW: &str = "Edges";

/// One image to show in a named window.
#[derive(Debug, Clone)]
pub struct View {
    /// Target window name.
    pub window: &'static str,
    /// Image to render.
    pub image: DynamicImage,
}

/// Per-frame diagnostic record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameReport {
    Circles { circles: Vec<Circle> },
    DarkFrame(DarkFrameStats),
}

impl std::fmt::Display for FrameReport {
    /// One diagnostic line: the circle count, or `dark_pixels (percent%)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Circles { circles } => write!(f, "{}", circles.len()),
            Self::DarkFrame(s) => {
                write!(f, "{} ({}%)", s.dark_pixels, general_format(s.dark_percent))
            }
        }
    }
}

/// Six significant digits with trailing zeros dropped (`%g` style), so
/// `100.0` prints as `100` and `99.33333` as `99.3333`.
fn general_format(v: f32) -> String {
    if v == 0.0 || !v.is_finite() {
        return v.to_string();
    }
    let exp = v.abs().log10().floor() as i32;
    let decimals = (5 - exp).max(0) as usize;
    let s = format!("{v:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Result of processing one frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Views in display order.
    pub views: Vec<View>,
    /// What the processor found.
    pub report: FrameReport,
}

/// One capture → analyse → annotate step.
pub trait FrameProcessor {
    /// Short program name used in logs.
    fn name(&self) -> &'static str;

    /// Windows this processor renders into, in display order.
    fn windows(&self) -> Vec<&'static str>;

    /// Analyse `frame` and compose the views to display.
    fn process(&mut self, frame: &RgbImage) -> FrameOutput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lines_match_diagnostic_format() {
        let circles = FrameReport::Circles {
            circles: vec![
                Circle {
                    x: 1.0,
                    y: 2.0,
                    radius: 3.0,
                };
                2
            ],
        };
        assert_eq!(circles.to_string(), "2");

        let dark = FrameReport::DarkFrame(DarkFrameStats {
            dark_pixels: 300,
            total_pixels: 400,
            dark_percent: 75.0,
            warning: false,
        });
        assert_eq!(dark.to_string(), "300 (75%)");
    }

    #[test]
    fn dark_percent_prints_six_significant_digits() {
        let line = |dark_pixels: u64, dark_percent: f32| {
            FrameReport::DarkFrame(DarkFrameStats {
                dark_pixels,
                total_pixels: 76_800,
                dark_percent,
                warning: dark_percent > 95.0,
            })
            .to_string()
        };
        assert_eq!(line(76_800, 100.0), "76800 (100%)");
        assert_eq!(line(76_288, 99.333_336), "76288 (99.3333%)");
        assert_eq!(line(0, 0.0), "0 (0%)");
        assert_eq!(line(12, 0.015_625), "12 (0.015625%)");
    }

    #[test]
    fn report_serializes_with_kind_tag() {
        let report = FrameReport::Circles {
            circles: vec![Circle {
                x: 10.0,
                y: 20.0,
                radius: 5.0,
            }],
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["kind"], "circles");
        assert_eq!(json["circles"][0]["radius"], 5.0);

        let back: FrameReport = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, report);
    }
}
