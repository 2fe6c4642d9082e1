//! Frame staging: persists frames as numbered PNG files.
//!
//! A [`FrameStager`] owns every file it writes. Files for indices
//! `[0, frame_count)` exist until [`FrameStager::cleanup`] runs or the
//! stager is dropped, whichever comes first.

use std::path::PathBuf;

use reel_core::frame::FrameBuffer;
use reel_core::{ReelError, ReelResult};

use crate::template::FrameTemplate;

#[derive(Debug)]
pub struct FrameStager {
    template: FrameTemplate,
    width: u32,
    height: u32,
    frame_count: usize,
    closed: bool,
}

impl FrameStager {
    pub fn new(template: FrameTemplate, width: u32, height: u32) -> Self {
        Self {
            template,
            width,
            height,
            frame_count: 0,
            closed: false,
        }
    }

    pub fn template(&self) -> &FrameTemplate {
        &self.template
    }

    /// Number of frames staged so far.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn path_for_frame(&self, index: usize) -> PathBuf {
        self.template.path_for_frame(index)
    }

    /// Write `frame` as the next PNG in the sequence.
    ///
    /// Wrong dimensions are rejected before anything touches the disk. A
    /// write failure removes every previously staged file and closes the
    /// stager before the error is returned.
    pub fn stage(&mut self, frame: &FrameBuffer) -> ReelResult<()> {
        if self.closed {
            return Err(ReelError::SessionClosed);
        }
        if frame.dimensions() != (self.width, self.height) {
            return Err(ReelError::dimension_mismatch(
                (self.width, self.height),
                frame.dimensions(),
            ));
        }

        let index = self.frame_count;
        let path = self.path_for_frame(index);
        if let Err(source) = write_png(frame, &path) {
            tracing::warn!("staging frame {} failed, discarding staged frames", index);
            // A partially written file may exist at the failed index.
            let _ = std::fs::remove_file(&path);
            self.cleanup();
            return Err(ReelError::StageIo {
                index,
                path,
                source,
            });
        }

        self.frame_count += 1;
        tracing::trace!("staged frame {} at {}", index, path.display());
        Ok(())
    }

    /// Best-effort removal of all staged files. Idempotent.
    pub fn cleanup(&mut self) {
        for index in 0..self.frame_count {
            let path = self.path_for_frame(index);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
            }
        }
        if !self.closed {
            tracing::debug!(
                "cleaned up {} staged frames under {}",
                self.frame_count,
                self.template.base().display()
            );
        }
        self.closed = true;
    }
}

impl Drop for FrameStager {
    fn drop(&mut self) {
        if !self.closed {
            self.cleanup();
        }
    }
}

fn write_png(frame: &FrameBuffer, path: &std::path::Path) -> Result<(), image::ImageError> {
    let img = frame.to_dynamic_image().ok_or_else(|| {
        image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        ))
    })?;
    img.save_with_format(path, image::ImageFormat::Png)
}
