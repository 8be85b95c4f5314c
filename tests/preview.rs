use std::cell::RefCell;
use std::path::{Path, PathBuf};

use gif_muxer::gif::preview::sample_timestamps;
use gif_muxer::{build_preview, Delay, GifError, GifResult, PreviewSettings, Thumbnailer, VideoProbe};

mod common;

use crate::common::{read_u16, single_frame, walk};



struct Probe {
    duration: Option<f64>,
    failing: Vec<usize>,
    requested: RefCell<Vec<f64>>,
}

struct Thumbnails {
    valid: bool,
    indices: RefCell<Vec<(usize, usize)>>,
}


impl Probe {
    fn new(duration: Option<f64>, failing: Vec<usize>) -> Self {
        Probe { duration, failing, requested: RefCell::new(vec![]) }
    }
}

impl VideoProbe for Probe {
    fn duration(&self, _: &Path) -> Option<f64> {
        self.duration
    }

    fn extract_frame(&self, _: &Path, timestamp: f64) -> GifResult<PathBuf> {
        let mut requested = self.requested.borrow_mut();
        requested.push(timestamp);
        if self.failing.contains(&requested.len()) {
            return Err(GifError::UpstreamFailure("no still".to_owned()));
        }
        Ok(PathBuf::from(format!("still-that-does-not-exist-{}.png", requested.len())))
    }
}

impl Thumbnails {
    fn new(valid: bool) -> Self {
        Thumbnails { valid, indices: RefCell::new(vec![]) }
    }
}

impl Thumbnailer for Thumbnails {
    fn square_gif(&self, _: &Path, size: u32, index: usize, count: usize) -> GifResult<Vec<u8>> {
        self.indices.borrow_mut().push((index, count));
        if self.valid {
            Ok(single_frame(size as u16, size as u16, 0x80, false))
        } else {
            Ok(b"PNG?".to_vec())
        }
    }
}


fn settings(count: usize) -> PreviewSettings {
    PreviewSettings { count, size: 32, ..Default::default() }
}


#[test]
fn test_sample_timestamps() {
    assert_eq!(sample_timestamps(10.0, 4), vec![2.0, 4.0, 6.0, 8.0]);
    assert!(sample_timestamps(10.0, 0).is_empty());
}

#[test]
fn test_default_settings() {
    let settings = PreviewSettings::default();
    assert_eq!((settings.size, settings.count, settings.loop_count), (100, 9, 0));
    assert_eq!((settings.delay, settings.last_delay), (Delay(50), Delay(200)));
}

#[test]
fn test_preview() {
    let probe = Probe::new(Some(20.0), vec![]);
    let thumbnails = Thumbnails::new(true);
    let data = build_preview(&probe, &thumbnails, Path::new("movie.mp4"), &settings(3)).unwrap().unwrap();

    assert_eq!(*probe.requested.borrow(), vec![5.0, 10.0, 15.0]);
    assert_eq!(*thumbnails.indices.borrow(), vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!((read_u16(&data, 6), read_u16(&data, 8)), (32, 32));

    let walked = walk(&data);
    assert_eq!(walked.images.len(), 3);
    assert_eq!(walked.delays, vec![50, 50, 200]);
    assert_eq!(walked.loop_count, Some(0));
}

#[test]
fn test_failed_timestamps_are_skipped() {
    let probe = Probe::new(Some(9.0), vec![1, 4]);
    let thumbnails = Thumbnails::new(true);
    let data = build_preview(&probe, &thumbnails, Path::new("movie.mp4"), &settings(4)).unwrap().unwrap();

    assert_eq!(probe.requested.borrow().len(), 4);
    assert_eq!(*thumbnails.indices.borrow(), vec![(2, 4), (3, 4)]);
    assert_eq!(walk(&data).delays, vec![50, 50]);
}

#[test]
fn test_unknown_duration() {
    let probe = Probe::new(None, vec![]);
    let thumbnails = Thumbnails::new(true);
    assert_eq!(build_preview(&probe, &thumbnails, Path::new("movie.mp4"), &settings(3)).unwrap(), None);
    assert!(probe.requested.borrow().is_empty());
}

#[test]
fn test_no_frames() {
    let probe = Probe::new(Some(3.0), vec![1, 2, 3]);
    let thumbnails = Thumbnails::new(true);
    assert_eq!(build_preview(&probe, &thumbnails, Path::new("movie.mp4"), &settings(3)).unwrap(), None);
}

#[test]#[should_panic(expected="NotAGif")]
fn test_invalid_thumbnail() {
    let probe = Probe::new(Some(3.0), vec![]);
    let thumbnails = Thumbnails::new(false);
    build_preview(&probe, &thumbnails, Path::new("movie.mp4"), &settings(3)).unwrap();
}
