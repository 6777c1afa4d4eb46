//! Color-space conversion.

use image::{GrayImage, Luma, RgbImage};

// 14-bit fixed-point BT.601 luma weights (R, G, B).
const SHIFT: u32 = 14;
const W_R: u32 = 4899;
const W_G: u32 = 9617;
const W_B: u32 = 1868;

/// Luma of a single RGB sample, rounded to nearest.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = r as u32 * W_R + g as u32 * W_G + b as u32 * W_B + (1 << (SHIFT - 1));
    (y >> SHIFT).min(255) as u8
}

/// Convert a color frame to single-channel intensity.
///
/// Uses BT.601 weights (0.299, 0.587, 0.114), matching what capture
/// pipelines built on OpenCV produce for `BGR2GRAY`. `image`'s own
/// `to_luma8` uses Rec.709 weights and would shift the histogram.
pub fn to_gray(frame: &RgbImage) -> GrayImage {
    let (w, h) = frame.dimensions();
    let mut out = GrayImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(frame.pixels()) {
        let [r, g, b] = src.0;
        *dst = Luma([luma(r, g, b)]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn primaries_follow_bt601_weights() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn to_gray_keeps_dimensions() {
        let frame = RgbImage::from_pixel(7, 5, Rgb([10, 200, 30]));
        let gray = to_gray(&frame);
        assert_eq!(gray.dimensions(), (7, 5));
        assert!(gray.pixels().all(|p| p[0] == luma(10, 200, 30)));
    }
}
