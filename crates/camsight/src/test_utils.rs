//! Synthetic images shared by unit tests.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Render a filled disk: pixels within `radius` of `center` get `disk_pix`,
/// everything else `bg_pix`.
pub(crate) fn draw_disk_image(
    w: u32,
    h: u32,
    center: [f32; 2],
    radius: f32,
    disk_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    draw_disks_image(w, h, &[(center, radius)], disk_pix, bg_pix)
}

/// Render several filled disks on a uniform background.
pub(crate) fn draw_disks_image(
    w: u32,
    h: u32,
    disks: &[([f32; 2], f32)],
    disk_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let inside = disks.iter().any(|&(c, r)| {
                let dx = x as f32 - c[0];
                let dy = y as f32 - c[1];
                dx * dx + dy * dy <= r * r
            });
            img.put_pixel(x, y, Luma([if inside { disk_pix } else { bg_pix }]));
        }
    }
    img
}

/// Replicate a gray image into all three color channels.
pub(crate) fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    let (w, h) = gray.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}
