//! Canny edge maps.

use image::GrayImage;

/// Gaussian sigma `imageproc::edges::canny` smooths with before taking
/// gradients.
pub(crate) const CANNY_SIGMA: f32 = 1.4;

/// Hysteresis thresholds for a Canny edge map.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Gradient magnitude below which a pixel is never an edge.
    pub low_threshold: f32,
    /// Gradient magnitude above which a pixel is always an edge.
    pub high_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 75.0,
            high_threshold: 150.0,
        }
    }
}

impl EdgeConfig {
    /// Thresholds used internally by the Hough gradient transform: the low
    /// threshold is half the high one.
    pub fn from_high_threshold(high_threshold: f32) -> Self {
        Self {
            low_threshold: high_threshold * 0.5,
            high_threshold,
        }
    }
}

/// Binary edge map (0 or 255) of `gray`.
///
/// Images smaller than 3x3 have no interior and yield an all-zero map.
pub fn edge_map(gray: &GrayImage, config: &EdgeConfig) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w < 3 || h < 3 {
        return GrayImage::new(w, h);
    }
    let low = config.low_threshold.min(config.high_threshold);
    imageproc::edges::canny(gray, low, config.high_threshold)
}

/// Number of edge pixels in a binary edge map.
pub fn count_edges(edges: &GrayImage) -> usize {
    edges.as_raw().iter().filter(|&&v| v > 0).count()
}
