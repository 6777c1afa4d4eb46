//! OpenCV camera capture and HighGUI windows.

use std::time::Duration;

use image::{DynamicImage, RgbImage};
use opencv::core::{Mat, Scalar, CV_8UC1, CV_8UC3};
use opencv::prelude::*;
use opencv::{highgui, videoio};

use crate::capture::FrameSource;
use crate::display::FrameSink;
use crate::error::{Error, Result};
use crate::processor::View;

/// A capture device opened through OpenCV's `VideoCapture`.
///
/// The device is released when the value is dropped.
pub struct OpenCvCamera {
    index: i32,
    capture: videoio::VideoCapture,
}

impl OpenCvCamera {
    /// Open capture device `index` (0 is the default camera).
    pub fn open(index: i32) -> Result<Self> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|e| Error::DeviceUnavailable(format!("camera {index}: {e}")))?;
        let opened = capture
            .is_opened()
            .map_err(|e| Error::DeviceUnavailable(format!("camera {index}: {e}")))?;
        if !opened {
            return Err(Error::DeviceUnavailable(format!(
                "camera {index} could not be opened"
            )));
        }
        Ok(Self { index, capture })
    }
}

impl FrameSource for OpenCvCamera {
    fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            tracing::warn!("camera {} returned no frame", self.index);
            return Ok(None);
        }
        bgr_mat_to_rgb(&frame).map(Some)
    }

    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }
}

fn bgr_mat_to_rgb(frame: &Mat) -> Result<RgbImage> {
    if frame.typ() != CV_8UC3 {
        return Err(Error::Capture(format!(
            "unsupported frame type {} (expected 8-bit BGR)",
            frame.typ()
        )));
    }
    let owned;
    let frame = if frame.is_continuous() {
        frame
    } else {
        owned = frame.try_clone()?;
        &owned
    };
    let (w, h) = (frame.cols() as u32, frame.rows() as u32);
    let mut data = frame.data_bytes()?.to_vec();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    RgbImage::from_raw(w, h, data)
        .ok_or_else(|| Error::Capture(format!("frame buffer does not match {w}x{h}")))
}

fn view_to_mat(image: &DynamicImage) -> Result<Mat> {
    let (typ, data) = match image {
        DynamicImage::ImageLuma8(gray) => (CV_8UC1, gray.as_raw().clone()),
        other => {
            let mut bgr = other.to_rgb8().into_raw();
            for px in bgr.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            (CV_8UC3, bgr)
        }
    };
    let mut mat = Mat::new_rows_cols_with_default(
        image.height() as i32,
        image.width() as i32,
        typ,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(&data);
    Ok(mat)
}

/// On-screen HighGUI windows with keyboard polling.
#[derive(Debug, Default)]
pub struct HighGuiDisplay {
    windows: Vec<&'static str>,
}

impl HighGuiDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for HighGuiDisplay {
    fn open_windows(&mut self, windows: &[&'static str]) -> Result<()> {
        for &name in windows {
            highgui::named_window(name, highgui::WINDOW_AUTOSIZE)
                .map_err(|e| Error::Display(e.to_string()))?;
            self.windows.push(name);
        }
        Ok(())
    }

    fn show(&mut self, view: &View, _frame_index: u64) -> Result<()> {
        let mat = view_to_mat(&view.image)?;
        highgui::imshow(view.window, &mat).map_err(|e| Error::Display(e.to_string()))
    }

    fn wait_key(&mut self, delay: Duration) -> Result<Option<i32>> {
        let delay_ms = delay.as_millis().clamp(1, i32::MAX as u128) as i32;
        let key = highgui::wait_key(delay_ms).map_err(|e| Error::Display(e.to_string()))?;
        // Some backends report "no key" as 255 instead of -1.
        Ok((key >= 0 && key != 255).then_some(key))
    }
}

impl Drop for HighGuiDisplay {
    fn drop(&mut self) {
        if !self.windows.is_empty() {
            let _ = highgui::destroy_all_windows();
        }
    }
}
