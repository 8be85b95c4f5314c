//! Animated preview built from evenly spaced stills of a video.
//!
//! Probing the video, extracting stills and turning a still into a square
//! single-frame GIF are left to the `VideoProbe` and `Thumbnailer`
//! implementations supplied by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::container::Container;
use super::errors::GifResult;
use super::{Delay, Frame};



pub trait VideoProbe {
    /// Duration in seconds, `None` when it cannot be determined
    fn duration(&self, video: &Path) -> Option<f64>;
    /// Writes the still at `timestamp` seconds to a temporary file and returns its path
    fn extract_frame(&self, video: &Path, timestamp: f64) -> GifResult<PathBuf>;
}

pub trait Thumbnailer {
    /// Encodes `still` as a `size`x`size` single-frame GIF.
    ///
    /// `index` is the 1-based sample number out of `count`.
    fn square_gif(&self, still: &Path, size: u32, index: usize, count: usize) -> GifResult<Vec<u8>>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PreviewSettings {
    pub count: usize,
    pub delay: Delay,
    pub last_delay: Delay,
    pub loop_count: u16,
    pub size: u32,
}


impl Default for PreviewSettings {
    fn default() -> Self {
        PreviewSettings {
            count: 9,
            delay: Delay(50),
            last_delay: Delay(200),
            loop_count: 0,
            size: 100,
        }
    }
}


/// `count` timestamps splitting `duration` into `count + 1` equal parts
pub fn sample_timestamps(duration: f64, count: usize) -> Vec<f64> {
    let parts = (count + 1) as f64;
    (1 ..= count).map(|i| duration * i as f64 / parts).collect()
}

/// Returns `Ok(None)` when the video has no usable duration or no still could be turned into a frame.
///
/// A timestamp whose still cannot be extracted or thumbnailed is skipped.
/// A thumbnail that is not a valid GIF fails the whole preview.
pub fn build_preview<P, T>(probe: &P, thumbnailer: &T, video: &Path, settings: &PreviewSettings) -> GifResult<Option<Vec<u8>>>
where P: VideoProbe, T: Thumbnailer {
    let duration = match probe.duration(video) {
        Some(duration) if duration.is_finite() && 0.0 < duration => duration,
        _ => {
            warn!("no usable duration for {:?}", video);
            return Ok(None);
        }
    };

    let mut container = Container::new(settings.loop_count);

    for (i, timestamp) in sample_timestamps(duration, settings.count).into_iter().enumerate() {
        let index = i + 1;
        let still = match probe.extract_frame(video, timestamp) {
            Ok(still) => still,
            Err(err) => {
                warn!("skip still at {:.3}s: {}", timestamp, err);
                continue;
            }
        };

        let thumbnail = thumbnailer.square_gif(&still, settings.size, index, settings.count);
        if let Err(err) = fs::remove_file(&still) {
            debug!("could not remove {:?}: {}", still, err);
        }
        let thumbnail = match thumbnail {
            Ok(thumbnail) => thumbnail,
            Err(err) => {
                warn!("skip still at {:.3}s: {}", timestamp, err);
                continue;
            }
        };

        let delay = if index == settings.count { settings.last_delay } else { settings.delay };
        container.add(&thumbnail, &Frame::with_delay(delay))?;
    }

    if container.is_empty() || container.width() == 0 || container.height() == 0 {
        warn!("no frames for preview of {:?}", video);
        return Ok(None);
    }

    Ok(Some(container.serialize()))
}
