//! Intensity histograms and dark-frame statistics.

use image::GrayImage;

/// Number of intensity buckets (one per 8-bit level).
pub const BINS: usize = 256;

/// Per-level pixel counts of a grayscale image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; BINS],
}

impl Histogram {
    /// Count intensities over the whole image.
    pub fn of(gray: &GrayImage) -> Self {
        let hist = imageproc::stats::histogram(gray);
        let mut counts = [0u32; BINS];
        if let Some(channel) = hist.channels.first() {
            counts.copy_from_slice(&channel[..]);
        }
        Self { counts }
    }

    pub fn counts(&self) -> &[u32; BINS] {
        &self.counts
    }

    /// Total number of counted pixels.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Sum of the `levels` darkest buckets (`0..levels`, clamped to 256).
    pub fn darkest_sum(&self, levels: usize) -> u64 {
        self.counts[..levels.min(BINS)].iter().map(|&c| c as u64).sum()
    }

    /// Min-max normalise bucket counts into `[lo, hi]`.
    ///
    /// A histogram whose buckets are all equal maps every bucket to `lo`.
    pub fn normalized(&self, lo: f32, hi: f32) -> [f32; BINS] {
        let min = self.counts.iter().copied().min().unwrap_or(0) as f64;
        let max = self.counts.iter().copied().max().unwrap_or(0) as f64;
        let span = max - min;
        let scale = if span > f64::EPSILON {
            (hi - lo) as f64 / span
        } else {
            0.0
        };
        let mut out = [lo; BINS];
        for (dst, &c) in out.iter_mut().zip(self.counts.iter()) {
            *dst = ((c as f64 - min) * scale + lo as f64) as f32;
        }
        out
    }
}

/// Thresholds for the dark-frame test.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DarkFrameConfig {
    /// Buckets counted as dark, starting from level 0.
    pub dark_levels: usize,
    /// Dark-pixel percentage above which the frame is flagged.
    pub warn_percent: f32,
}

impl Default for DarkFrameConfig {
    fn default() -> Self {
        Self {
            dark_levels: 20,
            warn_percent: 95.0,
        }
    }
}

/// Outcome of the dark-frame test on one frame.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DarkFrameStats {
    /// Pixels falling in the dark buckets.
    pub dark_pixels: u64,
    /// Total pixels in the frame.
    pub total_pixels: u64,
    /// `dark_pixels` as a percentage of `total_pixels` (0 for an empty frame).
    pub dark_percent: f32,
    /// `dark_percent` exceeded the warning threshold.
    pub warning: bool,
}

impl DarkFrameStats {
    pub fn from_histogram(hist: &Histogram, config: &DarkFrameConfig) -> Self {
        let dark_pixels = hist.darkest_sum(config.dark_levels);
        let total_pixels = hist.total();
        let dark_percent = if total_pixels == 0 {
            0.0
        } else {
            (dark_pixels as f64 * 100.0 / total_pixels as f64) as f32
        };
        Self {
            dark_pixels,
            total_pixels,
            dark_percent,
            warning: dark_percent > config.warn_percent,
        }
    }
}
