//! File output for rendered frames.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use brainsnap_core::{Frame, FrameSink, Result};

/// Writes one frame as a PNG file.
pub fn save_frame_png(path: impl AsRef<Path>, frame: &Frame) -> Result<()> {
    let path = path.as_ref();
    brainsnap_render::save_image(path, frame)?;
    log::info!("saved {}", path.display());
    Ok(())
}

/// Writes each accepted frame to `<dir>/<prefix>_NNNN.png`.
///
/// The numbered files are what external video encoders consume.
#[derive(Debug, Clone)]
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl PngSink {
    /// Creates the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.into(),
            written: Vec::new(),
        })
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_{index:04}.png", self.prefix))
    }

    /// Files written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSink {
    fn accept(&mut self, index: usize, frame: Frame) -> Result<ControlFlow<()>> {
        let path = self.path_for(index);
        brainsnap_render::save_image(&path, &frame)?;
        log::debug!("frame {index} -> {}", path.display());
        self.written.push(path);
        Ok(ControlFlow::Continue(()))
    }
}
