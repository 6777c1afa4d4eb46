//! Annotation drawing: circle outlines, histogram plots and frame borders.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::histogram::BINS;
use crate::hough::Circle;

/// Widest stroke drawn; larger configured widths are clamped.
const MAX_STROKE: u32 = 1 << 16;

/// Outline style for detected circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CircleStyle {
    /// Outline color (RGB).
    pub color: [u8; 3],
    /// Stroke width in pixels, centered on the radius.
    pub thickness: u32,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            thickness: 3,
        }
    }
}

/// Placement of the on-frame histogram plot.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HistogramPlotStyle {
    /// Top-left corner of the guide box.
    pub origin: [i32; 2],
    /// Guide box height. The width is always one column per bucket.
    pub box_height: u32,
    /// Tallest bar, in pixels (normalisation upper bound).
    pub plot_height: f32,
    /// Guide box intensity.
    pub box_value: u8,
    /// Bar intensity.
    pub bar_value: u8,
}

impl Default for HistogramPlotStyle {
    fn default() -> Self {
        Self {
            origin: [10, 10],
            box_height: 130,
            plot_height: 127.0,
            box_value: 255,
            bar_value: 191,
        }
    }
}

impl HistogramPlotStyle {
    /// Bottom row of the guide box; bars stand on it.
    pub fn baseline_y(&self) -> i32 {
        let height = i32::try_from(self.box_height).unwrap_or(i32::MAX);
        self.origin[1].saturating_add(height).saturating_sub(1)
    }
}

/// Style of the full-frame warning border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BorderStyle {
    /// Inset of the border centerline from the frame edge.
    pub inset: u32,
    /// Stroke width in pixels, centered on the border line.
    pub thickness: u32,
    /// Border intensity.
    pub value: u8,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            inset: 4,
            thickness: 4,
            value: 255,
        }
    }
}

/// Offsets of the parallel 1 px strokes that make up a `thickness` px stroke.
fn stroke_offsets(thickness: u32) -> std::ops::Range<i32> {
    let t = thickness.clamp(1, MAX_STROKE) as i32;
    -(t / 2)..(t - t / 2)
}

/// Draw circle outlines onto a color frame.
pub fn draw_circles(frame: &mut RgbImage, circles: &[Circle], style: &CircleStyle) {
    let color = Rgb(style.color);
    for c in circles {
        let center = (c.x.round() as i32, c.y.round() as i32);
        let radius = c.radius.round() as i32;
        for off in stroke_offsets(style.thickness) {
            let r = radius.saturating_add(off);
            if r > 0 {
                draw_hollow_circle_mut(frame, center, r, color);
            }
        }
    }
}

/// Draw the empty guide box the histogram is plotted into.
pub fn draw_histogram_box(gray: &mut GrayImage, style: &HistogramPlotStyle) {
    if style.box_height == 0 {
        return;
    }
    draw_clipped_rect(
        gray,
        [i64::from(style.origin[0]), i64::from(style.origin[1])],
        [BINS as i64, i64::from(style.box_height)],
        Luma([style.box_value]),
    );
}

/// Draw a 1 px rectangle outline, clamping sides that fall outside the frame
/// to one pixel beyond it so they stay invisible.
fn draw_clipped_rect(gray: &mut GrayImage, top_left: [i64; 2], size: [i64; 2], color: Luma<u8>) {
    let [left, top] = top_left;
    let [width, height] = size;
    if width <= 0 || height <= 0 {
        return;
    }
    let (w, h) = gray.dimensions();
    let l = left.max(-1);
    let t = top.max(-1);
    let r = (left + width - 1).min(i64::from(w));
    let b = (top + height - 1).min(i64::from(h));
    if l > r || t > b {
        return;
    }
    let rect = Rect::at(l as i32, t as i32).of_size((r - l + 1) as u32, (b - t + 1) as u32);
    draw_hollow_rect_mut(gray, rect, color);
}

/// Plot normalised bucket heights as one vertical line per bucket.
///
/// Bucket `i` is drawn at column `origin.x + i` from
/// `baseline - 1 - height[i]` down to the baseline.
pub fn draw_histogram_bars(
    gray: &mut GrayImage,
    heights: &[f32; BINS],
    style: &HistogramPlotStyle,
) {
    let (w, h) = gray.dimensions();
    let base = style.baseline_y() as f32;
    let bottom = base.min(h as f32);
    let color = Luma([style.bar_value]);
    for (i, &v) in heights.iter().enumerate() {
        let x = i64::from(style.origin[0]) + i as i64;
        if x < 0 || x >= i64::from(w) {
            continue;
        }
        let top = (base - 1.0 - v).max(-1.0);
        if top > bottom {
            continue;
        }
        draw_line_segment_mut(gray, (x as f32, top), (x as f32, bottom), color);
    }
}

/// Draw a rectangular border just inside the frame edges.
pub fn draw_warning_border(gray: &mut GrayImage, style: &BorderStyle) {
    let (w, h) = gray.dimensions();
    let (w, h) = (w as i64, h as i64);
    let inset = i64::from(style.inset);
    // Centerline runs from (inset, inset) to (w - inset, h - inset).
    let (rw, rh) = (w - 2 * inset + 1, h - 2 * inset + 1);
    for off in stroke_offsets(style.thickness) {
        let off = i64::from(off);
        let at = inset + off;
        draw_clipped_rect(
            gray,
            [at, at],
            [rw - 2 * off, rh - 2 * off],
            Luma([style.value]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_offsets_are_centered() {
        assert_eq!(stroke_offsets(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(stroke_offsets(3).collect::<Vec<_>>(), vec![-1, 0, 1]);
        assert_eq!(stroke_offsets(4).collect::<Vec<_>>(), vec![-2, -1, 0, 1]);
        assert_eq!(stroke_offsets(0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn circle_outline_is_drawn_in_color() {
        let mut frame = RgbImage::new(60, 60);
        let circle = Circle {
            x: 30.0,
            y: 30.0,
            radius: 15.0,
        };
        draw_circles(&mut frame, &[circle], &CircleStyle::default());
        assert_eq!(*frame.get_pixel(45, 30), Rgb([255, 0, 0]));
        assert_eq!(*frame.get_pixel(30, 30), Rgb([0, 0, 0]));
        assert_eq!(*frame.get_pixel(30, 14), Rgb([255, 0, 0]));
    }

    #[test]
    fn circle_partly_outside_frame_is_clipped() {
        let mut frame = RgbImage::new(20, 20);
        let circle = Circle {
            x: 0.0,
            y: 0.0,
            radius: 10.0,
        };
        draw_circles(&mut frame, &[circle], &CircleStyle::default());
        assert_eq!(*frame.get_pixel(10, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn histogram_box_matches_guide_geometry() {
        let mut gray = GrayImage::new(320, 240);
        let style = HistogramPlotStyle::default();
        draw_histogram_box(&mut gray, &style);
        assert_eq!(gray.get_pixel(10, 10)[0], 255);
        assert_eq!(gray.get_pixel(265, 139)[0], 255);
        assert_eq!(gray.get_pixel(266, 139)[0], 0);
        assert_eq!(gray.get_pixel(100, 75)[0], 0);
        assert_eq!(style.baseline_y(), 139);
    }

    #[test]
    fn histogram_bars_rise_from_baseline() {
        let mut gray = GrayImage::new(320, 240);
        let style = HistogramPlotStyle::default();
        let mut heights = [0.0f32; BINS];
        heights[5] = 127.0;
        draw_histogram_bars(&mut gray, &heights, &style);
        // Full-height bar spans rows 11..=139 at column 15.
        assert_eq!(gray.get_pixel(15, 11)[0], 191);
        assert_eq!(gray.get_pixel(15, 139)[0], 191);
        assert_eq!(gray.get_pixel(15, 10)[0], 0);
        // Empty buckets still leave a 2 px stub.
        assert_eq!(gray.get_pixel(16, 138)[0], 191);
        assert_eq!(gray.get_pixel(16, 137)[0], 0);
    }

    #[test]
    fn warning_border_frames_the_image() {
        let mut gray = GrayImage::new(100, 80);
        draw_warning_border(&mut gray, &BorderStyle::default());
        assert_eq!(gray.get_pixel(4, 40)[0], 255);
        assert_eq!(gray.get_pixel(2, 40)[0], 255);
        assert_eq!(gray.get_pixel(1, 40)[0], 0);
        assert_eq!(gray.get_pixel(50, 4)[0], 255);
        assert_eq!(gray.get_pixel(50, 40)[0], 0);
        assert_eq!(gray.get_pixel(96, 40)[0], 255);
    }

    #[test]
    fn oversized_styles_do_not_overflow() {
        let mut gray = GrayImage::new(40, 30);
        let border = BorderStyle {
            inset: u32::MAX,
            thickness: u32::MAX,
            value: 255,
        };
        draw_warning_border(&mut gray, &border);
        assert!(gray.pixels().all(|p| p[0] == 0));

        let plot = HistogramPlotStyle {
            origin: [i32::MAX - 10, i32::MAX - 10],
            box_height: u32::MAX,
            ..Default::default()
        };
        assert_eq!(plot.baseline_y(), i32::MAX - 1);
        draw_histogram_box(&mut gray, &plot);
        draw_histogram_bars(&mut gray, &[127.0; BINS], &plot);
        assert!(gray.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn warning_border_on_tiny_frame_does_not_panic() {
        let mut gray = GrayImage::new(5, 5);
        draw_warning_border(&mut gray, &BorderStyle::default());
    }
}
