use std::path::{Path, PathBuf};

use image::RgbImage;

use super::FrameSource;
use crate::error::{Error, Result};

/// Replays image files as frames: a single file, or every decodable image
/// in a directory in lexicographic order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    repeat: bool,
    size: Option<(u32, u32)>,
}

impl ImageSequenceSource {
    /// Open `path`. With `repeat`, the sequence restarts when it runs out.
    ///
    /// Fails with [`Error::DeviceUnavailable`] when the path does not exist
    /// or holds no images.
    pub fn open(path: &Path, repeat: bool) -> Result<Self> {
        let paths = if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| {
                Error::DeviceUnavailable(format!("cannot read {}: {e}", path.display()))
            })?;
            let mut paths: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && image::ImageFormat::from_path(p).is_ok())
                .collect();
            paths.sort();
            paths
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(Error::DeviceUnavailable(format!(
                "no such file or directory: {}",
                path.display()
            )));
        };

        if paths.is_empty() {
            return Err(Error::DeviceUnavailable(format!(
                "no images found in {}",
                path.display()
            )));
        }
        tracing::debug!("Opened image sequence with {} frames", paths.len());
        Ok(Self {
            paths,
            next: 0,
            repeat,
            size: None,
        })
    }

    /// Number of images in one pass of the sequence.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        if self.next >= self.paths.len() {
            if !self.repeat {
                return Ok(None);
            }
            self.next = 0;
        }
        let path = &self.paths[self.next];
        self.next += 1;

        let frame = image::open(path)?.to_rgb8();
        let dims = frame.dimensions();
        match self.size {
            None => self.size = Some(dims),
            Some(first) if first != dims => tracing::warn!(
                "{} is {}x{}, sequence started at {}x{}",
                path.display(),
                dims.0,
                dims.1,
                first.0,
                first.1
            ),
            Some(_) => {}
        }
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        match self.paths.as_slice() {
            [single] => format!("image {}", single.display()),
            paths => format!("{} images", paths.len()),
        }
    }
}
