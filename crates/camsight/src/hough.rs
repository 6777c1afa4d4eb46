//! Circle detection with the Hough gradient transform.
//!
//! Every Canny edge pixel votes along its Sobel gradient direction (both
//! signs, taken on the same Gaussian-smoothed image Canny works on) for all radii in `[min_radius, max_radius]`. Votes land in a
//! down-sampled accumulator (`dp` image pixels per cell). Accumulator local
//! maxima above the vote threshold are candidate centers. For each candidate,
//! in decreasing vote order, the radius is the densest run of edge-point
//! distances. The circle is kept if that run is supported by more edge points
//! than the vote threshold.

use image::GrayImage;

use crate::edges::{edge_map, EdgeConfig, CANNY_SIGMA};

/// Parameters of the Hough gradient transform.
///
/// Distances that depend on the frame size are optional. When unset they are
/// derived from the frame width through the matching `*_frac` field.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HoughCircleConfig {
    /// Inverse accumulator resolution: image pixels per accumulator cell.
    pub dp: f32,
    /// Minimum distance between detected centers (pixels).
    pub min_dist_px: Option<f32>,
    /// `min_dist_px` as a fraction of frame width, used when it is unset.
    pub min_dist_frac: f32,
    /// High Canny threshold of the internal edge step (low is half of it).
    pub canny_high_threshold: f32,
    /// Votes (and radius support) a circle needs to be reported.
    pub acc_threshold: u32,
    /// Minimum circle radius (pixels).
    pub min_radius_px: Option<u32>,
    /// `min_radius_px` as a fraction of frame width, used when it is unset.
    pub min_radius_frac: f32,
    /// Maximum circle radius (pixels). `None` or 0 means the larger frame side.
    pub max_radius_px: Option<u32>,
    /// Optional cap on the number of circles returned.
    pub max_circles: Option<usize>,
}

impl Default for HoughCircleConfig {
    fn default() -> Self {
        Self {
            dp: 2.0,
            min_dist_px: None,
            min_dist_frac: 0.5,
            canny_high_threshold: 150.0,
            acc_threshold: 150,
            min_radius_px: None,
            min_radius_frac: 1.0 / 20.0,
            max_radius_px: None,
            max_circles: None,
        }
    }
}

/// Frame-size-resolved transform parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// Image pixels per accumulator cell, at least 1.
    pub dp: f32,
    /// Minimum distance between detected centers, at least `dp`.
    pub min_dist: f32,
    /// High Canny threshold of the internal edge step.
    pub canny_high_threshold: f32,
    /// Votes (and radius support) a circle needs to be reported.
    pub acc_threshold: u32,
    /// Smallest radius voted for (pixels).
    pub min_radius: u32,
    /// Largest radius voted for (pixels).
    pub max_radius: u32,
}

impl HoughCircleConfig {
    /// Resolve width-relative defaults for a `w x h` frame.
    pub fn resolve(&self, w: u32, h: u32) -> HoughParams {
        let dp = if self.dp.is_finite() { self.dp.max(1.0) } else { 1.0 };
        let min_dist = self
            .min_dist_px
            .unwrap_or_else(|| (w as f32 * self.min_dist_frac).floor())
            .max(dp);
        let min_radius = self
            .min_radius_px
            .unwrap_or_else(|| (w as f32 * self.min_radius_frac).max(0.0) as u32);
        let max_radius = match self.max_radius_px {
            Some(r) if r > 0 => r,
            _ => w.max(h),
        };
        HoughParams {
            dp,
            min_dist,
            canny_high_threshold: self.canny_high_threshold,
            acc_threshold: self.acc_threshold,
            min_radius,
            max_radius,
        }
    }
}

/// A detected circle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Circle {
    /// Center x (pixels).
    pub x: f32,
    /// Center y (pixels).
    pub y: f32,
    /// Radius (pixels).
    pub radius: f32,
}

struct Accumulator {
    cols: usize,
    rows: usize,
    votes: Vec<u32>,
}

impl Accumulator {
    fn new(w: u32, h: u32, dp: f32) -> Self {
        let cols = (w as f32 / dp).ceil() as usize;
        let rows = (h as f32 / dp).ceil() as usize;
        Self {
            cols,
            rows,
            votes: vec![0; cols * rows],
        }
    }

    /// Walk from `(x0, y0)` along `(sx, sy)` for radius steps
    /// `min_r..=max_r`, stopping at the accumulator border.
    fn cast_ray(&mut self, x0: f32, y0: f32, sx: f32, sy: f32, min_r: u32, max_r: u32) {
        for r in min_r..=max_r {
            let cx = x0 + sx * r as f32;
            let cy = y0 + sy * r as f32;
            if cx < 0.0 || cy < 0.0 {
                break;
            }
            let (ix, iy) = (cx as usize, cy as usize);
            if ix >= self.cols || iy >= self.rows {
                break;
            }
            self.votes[iy * self.cols + ix] += 1;
        }
    }

    /// Cells above `threshold` that are 4-neighbour local maxima, strongest
    /// first. Ties on a plateau resolve to the top-left cell.
    fn peaks(&self, threshold: u32) -> Vec<(usize, u32)> {
        let mut peaks = Vec::new();
        if self.cols < 3 || self.rows < 3 {
            return peaks;
        }
        let stride = self.cols;
        for y in 1..self.rows - 1 {
            for x in 1..self.cols - 1 {
                let base = y * stride + x;
                let v = self.votes[base];
                if v > threshold
                    && v > self.votes[base - 1]
                    && v >= self.votes[base + 1]
                    && v > self.votes[base - stride]
                    && v >= self.votes[base + stride]
                {
                    peaks.push((base, v));
                }
            }
        }
        peaks.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        peaks
    }
}

/// Pick the densest run of sorted distances, where a run spans at most
/// `bin_width`. Density is support per unit radius, so a run wins over the
/// current best when `count * r_best >= best_count * r`.
///
/// Returns `(radius, support)` with `radius` the median of the run.
fn best_radius(sorted: &[f32], bin_width: f32) -> Option<(f32, usize)> {
    let mut best: Option<(f32, usize)> = None;
    let mut start = 0;
    while start < sorted.len() {
        let start_d = sorted[start];
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] - start_d <= bin_width {
            end += 1;
        }
        let count = end - start;
        let r = sorted[(start + end - 1) / 2];
        let better = match best {
            None => true,
            Some((r_best, count_best)) if r_best < f32::EPSILON => count >= count_best,
            Some((r_best, count_best)) => count as f32 * r_best >= count_best as f32 * r,
        };
        if better {
            best = Some((r, count));
        }
        start = end;
    }
    best
}

/// Detect circles in a grayscale image.
///
/// Returns circles ordered by accumulator votes (strongest first). Images
/// smaller than 3x3, or an empty radius range, yield no circles.
pub fn find_circles(gray: &GrayImage, config: &HoughCircleConfig) -> Vec<Circle> {
    let (w, h) = gray.dimensions();
    if w < 3 || h < 3 {
        return Vec::new();
    }
    let p = config.resolve(w, h);
    if p.max_radius < p.min_radius {
        return Vec::new();
    }

    let edges = edge_map(gray, &EdgeConfig::from_high_threshold(p.canny_high_threshold));
    // Canny locates edges on a blurred copy; the vote directions must come
    // from the same blurred image or the rays miss the center.
    let smoothed = imageproc::filter::gaussian_blur_f32(gray, CANNY_SIGMA);
    let gx = imageproc::gradients::horizontal_sobel(&smoothed);
    let gy = imageproc::gradients::vertical_sobel(&smoothed);
    let (edge_raw, gx_raw, gy_raw) = (edges.as_raw(), gx.as_raw(), gy.as_raw());

    let inv_dp = 1.0 / p.dp;
    let mut acc = Accumulator::new(w, h, p.dp);
    let mut points: Vec<[f32; 2]> = Vec::new();
    let stride = w as usize;
    for y in 0..h as usize {
        for x in 0..stride {
            let idx = y * stride + x;
            if edge_raw[idx] == 0 {
                continue;
            }
            let vx = gx_raw[idx] as f32;
            let vy = gy_raw[idx] as f32;
            let mag = (vx * vx + vy * vy).sqrt();
            if mag < 1.0 {
                continue;
            }
            points.push([x as f32, y as f32]);

            let sx = vx / mag * inv_dp;
            let sy = vy / mag * inv_dp;
            let x0 = x as f32 * inv_dp;
            let y0 = y as f32 * inv_dp;
            acc.cast_ray(x0, y0, sx, sy, p.min_radius, p.max_radius);
            acc.cast_ray(x0, y0, -sx, -sy, p.min_radius, p.max_radius);
        }
    }

    let peaks = acc.peaks(p.acc_threshold);
    tracing::trace!(
        edge_points = points.len(),
        peaks = peaks.len(),
        "hough accumulator filled"
    );

    let min_dist_sq = p.min_dist * p.min_dist;
    let min_r_sq = (p.min_radius as f32).powi(2);
    let max_r_sq = (p.max_radius as f32).powi(2);
    let mut circles: Vec<Circle> = Vec::new();
    let mut dists: Vec<f32> = Vec::with_capacity(points.len());

    for (cell, votes) in peaks {
        if config.max_circles.is_some_and(|max| circles.len() >= max) {
            break;
        }
        let cx = ((cell % acc.cols) as f32 + 0.5) * p.dp;
        let cy = ((cell / acc.cols) as f32 + 0.5) * p.dp;
        let too_close = circles.iter().any(|c| {
            let dx = c.x - cx;
            let dy = c.y - cy;
            dx * dx + dy * dy < min_dist_sq
        });
        if too_close {
            continue;
        }

        dists.clear();
        dists.extend(points.iter().filter_map(|&[px, py]| {
            let d_sq = (px - cx).powi(2) + (py - cy).powi(2);
            (d_sq >= min_r_sq && d_sq <= max_r_sq).then(|| d_sq.sqrt())
        }));
        if dists.len() <= p.acc_threshold as usize {
            continue;
        }
        dists.sort_by(f32::total_cmp);

        if let Some((radius, support)) = best_radius(&dists, p.dp) {
            if support > p.acc_threshold as usize {
                tracing::debug!(cx, cy, radius, votes, support, "circle accepted");
                circles.push(Circle { x: cx, y: cy, radius });
            }
        }
    }
    circles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{draw_disk_image, draw_disks_image};

    fn test_config() -> HoughCircleConfig {
        HoughCircleConfig {
            min_dist_px: Some(20.0),
            acc_threshold: 30,
            min_radius_px: Some(10),
            ..Default::default()
        }
    }

    fn near(c: &Circle, center: [f32; 2], radius: f32, tol: f32) -> bool {
        let err = ((c.x - center[0]).powi(2) + (c.y - center[1]).powi(2)).sqrt();
        err < tol && (c.radius - radius).abs() < tol
    }

    #[test]
    fn default_config_derives_from_frame_width() {
        let p = HoughCircleConfig::default().resolve(640, 480);
        assert_eq!(p.dp, 2.0);
        assert_eq!(p.min_dist, 320.0);
        assert_eq!(p.min_radius, 32);
        assert_eq!(p.max_radius, 640);
        assert_eq!(p.acc_threshold, 150);
        assert_eq!(p.canny_high_threshold, 150.0);
    }

    #[test]
    fn zero_max_radius_means_unbounded() {
        let cfg = HoughCircleConfig {
            max_radius_px: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.resolve(320, 400).max_radius, 400);
    }

    #[test]
    fn finds_single_disk() {
        let center = [100.0, 90.0];
        let img = draw_disk_image(200, 180, center, 40.0, 255, 0);
        let circles = find_circles(&img, &test_config());
        assert!(!circles.is_empty(), "should detect the disk");
        assert!(
            circles.iter().any(|c| near(c, center, 40.0, 4.0)),
            "no circle near ({}, {}) r=40: {:?}",
            center[0],
            center[1],
            circles
        );
    }

    #[test]
    fn default_parameters_find_disk_in_webcam_frame() {
        let center = [320.0, 240.0];
        let img = draw_disk_image(640, 480, center, 100.0, 255, 0);
        let circles = find_circles(&img, &HoughCircleConfig::default());
        assert!(!circles.is_empty(), "should detect the disk");
        assert!(near(&circles[0], center, 100.0, 4.0), "{circles:?}");
    }

    #[test]
    fn finds_dark_disk_on_bright_background() {
        let center = [80.0, 80.0];
        let img = draw_disk_image(160, 160, center, 30.0, 20, 230);
        let circles = find_circles(&img, &test_config());
        assert!(circles.iter().any(|c| near(c, center, 30.0, 4.0)), "{circles:?}");
    }

    #[test]
    fn finds_separated_disks() {
        let disks = [([70.0, 75.0], 28.0), ([210.0, 75.0], 28.0)];
        let img = draw_disks_image(280, 150, &disks, 255, 0);
        let circles = find_circles(&img, &test_config());
        for (center, r) in disks {
            assert!(
                circles.iter().any(|c| near(c, center, r, 4.0)),
                "missing disk at {center:?}: {circles:?}"
            );
        }
    }

    #[test]
    fn min_dist_keeps_only_the_strongest_center() {
        let disks = [([70.0, 75.0], 28.0), ([210.0, 75.0], 28.0)];
        let img = draw_disks_image(280, 150, &disks, 255, 0);
        let cfg = HoughCircleConfig {
            min_dist_px: Some(300.0),
            ..test_config()
        };
        let circles = find_circles(&img, &cfg);
        assert_eq!(circles.len(), 1, "{circles:?}");
    }

    #[test]
    fn max_circles_caps_output() {
        let disks = [([70.0, 75.0], 28.0), ([210.0, 75.0], 28.0)];
        let img = draw_disks_image(280, 150, &disks, 255, 0);
        let cfg = HoughCircleConfig {
            max_circles: Some(1),
            ..test_config()
        };
        assert!(find_circles(&img, &cfg).len() <= 1);
    }

    #[test]
    fn blank_image_has_no_circles() {
        let img = GrayImage::from_pixel(120, 100, image::Luma([90]));
        assert!(find_circles(&img, &test_config()).is_empty());
        assert!(find_circles(&img, &HoughCircleConfig::default()).is_empty());
    }

    #[test]
    fn degenerate_inputs_yield_nothing() {
        assert!(find_circles(&GrayImage::new(2, 2), &test_config()).is_empty());
        let img = draw_disk_image(100, 100, [50.0, 50.0], 20.0, 255, 0);
        let cfg = HoughCircleConfig {
            min_radius_px: Some(50),
            max_radius_px: Some(10),
            ..test_config()
        };
        assert!(find_circles(&img, &cfg).is_empty());
    }

    #[test]
    fn best_radius_prefers_dense_run() {
        let dists = [10.0, 20.0, 30.0, 30.5, 31.0, 31.2, 31.8, 50.0];
        let (r, support) = best_radius(&dists, 2.0).expect("non-empty");
        assert_eq!(support, 5);
        assert!((r - 31.0).abs() < 1e-6);
        assert!(best_radius(&[], 2.0).is_none());
    }
}
