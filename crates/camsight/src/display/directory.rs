use std::path::{Path, PathBuf};
use std::time::Duration;

use super::FrameSink;
use crate::error::{Error, Result};
use crate::processor::View;

/// Writes each view as `<window>_<frame>.png` into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Use `dir` as output directory, creating it if needed.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path a view of `window` for frame `frame_index` is written to.
    pub fn view_path(&self, window: &str, frame_index: u64) -> PathBuf {
        let stem = window.to_ascii_lowercase().replace(' ', "_");
        self.dir.join(format!("{stem}_{frame_index:06}.png"))
    }
}

impl FrameSink for DirectorySink {
    fn show(&mut self, view: &View, frame_index: u64) -> Result<()> {
        let path = self.view_path(view.window, frame_index);
        view.image
            .save(&path)
            .map_err(|e| Error::Display(format!("cannot write {}: {e}", path.display())))?;
        tracing::trace!("Wrote {}", path.display());
        Ok(())
    }

    fn wait_key(&mut self, _delay: Duration) -> Result<Option<i32>> {
        Ok(None)
    }
}
