//! Camera abstraction for the scan loop.
//!
//! A `Camera` hands out a `VideoStream` on request; the stream yields RGBA
//! frames and owns tracks that must be stopped when scanning ends.
//! `ImageSequenceCamera` plays a directory of still images as a stream,
//! one file per frame, which is how recorded captures and fixtures are fed
//! through the same loop a live device would drive.

use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::scan::StreamConstraints;

/// Something that can open a video stream.
pub trait Camera {
    fn request_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, String>;
}

/// A live video source.
pub trait VideoStream {
    /// Whether a full frame is buffered and can be captured now.
    fn has_enough_data(&self) -> bool;
    /// Copies the current frame into an off-screen raster.
    fn capture_frame(&mut self) -> Option<RgbaImage>;
    /// Releases the underlying device tracks. Idempotent.
    fn stop_tracks(&mut self);
}

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Serves the images in a directory, sorted by name, as consecutive frames.
pub struct ImageSequenceCamera {
    source: PathBuf,
    looping: bool,
}

impl ImageSequenceCamera {
    pub fn new<P: AsRef<Path>>(source: P) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            looping: false,
        }
    }

    /// Restart from the first frame after the last one instead of running dry.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    fn frame_paths(&self) -> Result<Vec<PathBuf>, String> {
        if self.source.is_file() {
            return Ok(vec![self.source.clone()]);
        }
        let dir = fs::read_dir(&self.source)
            .map_err(|e| format!("{}: {}", self.source.display(), e))?;
        let mut paths: Vec<PathBuf> = dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        Ok(paths)
    }
}

impl Camera for ImageSequenceCamera {
    fn request_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, String> {
        let frames = self.frame_paths()?;
        if frames.is_empty() {
            return Err(format!("no frames in {}", self.source.display()));
        }
        log::debug!(
            "opened image sequence {} ({} frames, facing {:?})",
            self.source.display(),
            frames.len(),
            constraints.facing_mode
        );
        Ok(Box::new(ImageSequenceStream {
            frames,
            next: 0,
            looping: self.looping,
            live: true,
        }))
    }
}

struct ImageSequenceStream {
    frames: Vec<PathBuf>,
    next: usize,
    looping: bool,
    live: bool,
}

impl VideoStream for ImageSequenceStream {
    fn has_enough_data(&self) -> bool {
        self.live && (self.looping || self.next < self.frames.len())
    }

    fn capture_frame(&mut self) -> Option<RgbaImage> {
        if !self.has_enough_data() {
            return None;
        }
        let path = &self.frames[self.next % self.frames.len()];
        self.next += 1;
        match image::open(path) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                log::warn!("skipping unreadable frame {}: {}", path.display(), e);
                None
            }
        }
    }

    fn stop_tracks(&mut self) {
        self.live = false;
    }
}
