//! Library error type.

/// Errors raised by capture sources, display sinks and config loading.
///
/// The numeric primitives (`hough`, `histogram`, `edges`) never fail; they
/// return empty results on degenerate input instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The capture device or input could not be opened.
    #[error("capture source unavailable: {0}")]
    DeviceUnavailable(String),
    /// A frame could not be read from an opened source.
    #[error("frame capture failed: {0}")]
    Capture(String),
    /// A view could not be shown or written.
    #[error("display failed: {0}")]
    Display(String),
    /// Processor configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    /// An image file could not be decoded or encoded.
    #[error(transparent)]
    Image(#[from] image::ImageError),
    /// Filesystem access failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// `true` when the failure happened while opening the capture source.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(self, Self::DeviceUnavailable(_))
    }
}

#[cfg(feature = "opencv")]
impl From<opencv::Error> for Error {
    fn from(e: opencv::Error) -> Self {
        Self::Capture(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
