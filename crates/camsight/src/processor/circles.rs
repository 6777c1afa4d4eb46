use image::{DynamicImage, RgbImage};

use super::{FrameOutput, FrameProcessor, FrameReport, View, EDGES_WINDOW, FRAMES_WINDOW};
use crate::color::to_gray;
use crate::edges::{edge_map, EdgeConfig};
use crate::hough::{find_circles, HoughCircleConfig};
use crate::overlay::{draw_circles, CircleStyle};

/// Configuration of the circle-detection program.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CircleProcessorConfig {
    /// Hough gradient transform parameters.
    pub hough: HoughCircleConfig,
    /// Thresholds of the displayed edge map. Detection does not use it.
    pub edges: EdgeConfig,
    /// Outline style for detected circles.
    pub style: CircleStyle,
    /// Render the edge map into its own window.
    pub show_edges: bool,
}

impl Default for CircleProcessorConfig {
    fn default() -> Self {
        Self {
            hough: HoughCircleConfig::default(),
            edges: EdgeConfig::default(),
            style: CircleStyle::default(),
            show_edges: true,
        }
    }
}

/// Detects circles and outlines them on the color frame.
#[derive(Debug, Clone, Default)]
pub struct CircleProcessor {
    config: CircleProcessorConfig,
}

impl CircleProcessor {
    pub fn new(config: CircleProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CircleProcessorConfig {
        &self.config
    }
}

impl FrameProcessor for CircleProcessor {
    fn name(&self) -> &'static str {
        "circles"
    }

    fn windows(&self) -> Vec<&'static str> {
        if self.config.show_edges {
            vec![EDGES_WINDOW, FRAMES_WINDOW]
        } else {
            vec![FRAMES_WINDOW]
        }
    }

    fn process(&mut self, frame: &RgbImage) -> FrameOutput {
        let gray = to_gray(frame);
        let circles = find_circles(&gray, &self.config.hough);

        let mut annotated = frame.clone();
        draw_circles(&mut annotated, &circles, &self.config.style);

        let mut views = vec![View {
            window: FRAMES_WINDOW,
            image: DynamicImage::ImageRgb8(annotated),
        }];
        if self.config.show_edges {
            views.push(View {
                window: EDGES_WINDOW,
                image: DynamicImage::ImageLuma8(edge_map(&gray, &self.config.edges)),
            });
        }

        FrameOutput {
            views,
            report: FrameReport::Circles { circles },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{draw_disk_image, gray_to_rgb};

    fn tuned() -> CircleProcessorConfig {
        CircleProcessorConfig {
            hough: HoughCircleConfig {
                acc_threshold: 30,
                min_radius_px: Some(10),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn detects_and_outlines_disk() {
        let frame = gray_to_rgb(&draw_disk_image(200, 160, [100.0, 80.0], 40.0, 200, 20));
        let mut processor = CircleProcessor::new(tuned());
        let out = processor.process(&frame);

        let FrameReport::Circles { circles } = &out.report else {
            panic!("unexpected report {:?}", out.report);
        };
        assert!(!circles.is_empty());

        let windows: Vec<_> = out.views.iter().map(|v| v.window).collect();
        assert_eq!(windows, vec![FRAMES_WINDOW, EDGES_WINDOW]);

        let annotated = out.views[0].image.to_rgb8();
        let has_red = annotated.pixels().any(|p| p.0 == [255, 0, 0]);
        assert!(has_red, "outline should be drawn");
        assert_eq!(out.views[1].image.color(), image::ColorType::L8);
    }

    #[test]
    fn default_config_detects_disk_at_webcam_size() {
        let frame = gray_to_rgb(&draw_disk_image(640, 480, [320.0, 240.0], 100.0, 230, 30));
        let out = CircleProcessor::default().process(&frame);

        let FrameReport::Circles { circles } = &out.report else {
            panic!("unexpected report {:?}", out.report);
        };
        let best = circles.first().expect("disk should be detected");
        let center_err = ((best.x - 320.0).powi(2) + (best.y - 240.0).powi(2)).sqrt();
        assert!(center_err < 4.0, "{best:?}");
        assert!((best.radius - 100.0).abs() < 4.0, "{best:?}");
    }

    #[test]
    fn edge_view_is_optional() {
        let frame = RgbImage::new(64, 48);
        let mut processor = CircleProcessor::new(CircleProcessorConfig {
            show_edges: false,
            ..tuned()
        });
        assert_eq!(processor.windows(), vec![FRAMES_WINDOW]);
        let out = processor.process(&frame);
        assert_eq!(out.views.len(), 1);
        assert_eq!(out.report, FrameReport::Circles { circles: vec![] });
    }

    #[test]
    fn frame_without_circles_is_passed_through() {
        let frame = RgbImage::from_pixel(80, 60, image::Rgb([40, 90, 140]));
        let out = CircleProcessor::default().process(&frame);
        assert_eq!(out.report.to_string(), "0");
        assert_eq!(out.views[0].image.to_rgb8(), frame);
    }
}
