
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::warn;

use gif_muxer::{GifError, GifResult, VideoProbe};

use crate::errors::{AppError, AppResult};



#[derive(Clone, Debug)]
pub struct FFmpeg {
    ffmpeg: String,
    ffprobe: String,
}

/// `ffprobe -print_format json -show_format -show_streams` output
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Probed {
    #[serde(default)]
    pub format: Option<ProbedFormat>,
    #[serde(default)]
    pub streams: Vec<ProbedStream>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProbedFormat {
    // ffprobe prints these numbers as strings
    pub duration: Option<String>,
    pub format_name: Option<String>,
    pub size: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProbedStream {
    pub channels: Option<u32>,
    pub codec_name: Option<String>,
    pub codec_type: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoInfo {
    pub audio_codec: Option<String>,
    pub channels: Option<u32>,
    pub container: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    pub height: Option<u32>,
    pub size: Option<u64>,
    pub video_codec: Option<String>,
    pub width: Option<u32>,
}


impl Default for FFmpeg {
    fn default() -> Self {
        let suffix = if cfg!(windows) { ".exe" } else { "" };
        FFmpeg {
            ffmpeg: format!("ffmpeg{}", suffix),
            ffprobe: format!("ffprobe{}", suffix),
        }
    }
}

impl FFmpeg {
    pub fn probe(&self, video: &Path) -> AppResult<Probed> {
        let output = Command::new(&self.ffprobe)
            .args(&["-hide_banner", "-v", "quiet", "-print_format", "json", "-show_format", "-show_streams", "-i"])
            .arg(video)
            .stderr(Stdio::null())
            .output()
            .map_err(command_error)?;
        if !output.status.success() {
            return Err(AppError::ProbeFailed(output.status.to_string()));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    pub fn probe_light(&self, video: &Path) -> AppResult<VideoInfo> {
        Ok(VideoInfo::from(self.probe(video)?))
    }
}

impl VideoProbe for FFmpeg {
    fn duration(&self, video: &Path) -> Option<f64> {
        match self.probe_light(video) {
            Ok(info) => info.duration,
            Err(err) => {
                warn!("could not probe {:?}: {}", video, err);
                None
            }
        }
    }

    /// The still is deleted again unless ffmpeg succeeds and writes something.
    fn extract_frame(&self, video: &Path, timestamp: f64) -> GifResult<PathBuf> {
        let still = tempfile::Builder::new()
            .prefix(".gifmux_")
            .suffix(".png")
            .tempfile()?
            .into_temp_path();

        let status = Command::new(&self.ffmpeg)
            .arg("-ss").arg(format!("{:.3}", timestamp))
            .arg("-i").arg(video)
            .args(&["-frames:v", "1", "-y"])
            .arg(still.as_os_str())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        let written = fs::metadata(&still).map(|it| 0 < it.len()).unwrap_or(false);
        if !status.success() || !written {
            return Err(GifError::UpstreamFailure(format!("ffmpeg could not extract a still at {:.3}s ({})", timestamp, status)));
        }

        still.keep().map_err(|err| GifError::Io(err.error))
    }
}


impl From<Probed> for VideoInfo {
    fn from(probed: Probed) -> Self {
        let mut info = VideoInfo::default();

        for stream in probed.streams {
            match stream.codec_type.as_ref().map(String::as_str) {
                Some("video") => {
                    info.width = stream.width;
                    info.height = stream.height;
                    info.video_codec = stream.codec_name;
                },
                Some("audio") => {
                    info.channels = stream.channels;
                    info.audio_codec = stream.codec_name;
                },
                _ => (),
            }
        }

        if let Some(format) = probed.format {
            info.container = format.format_name;
            info.duration = format.duration.and_then(|it| it.parse().ok());
            info.size = format.size.and_then(|it| it.parse().ok());
        }

        info
    }
}


fn command_error(error: io::Error) -> AppError {
    if error.kind() == io::ErrorKind::NotFound {
        AppError::ToolNotFound
    } else {
        AppError::Io(error)
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    const PROBED: &str = r#"{
        "streams": [
            { "index": 0, "codec_name": "h264", "codec_type": "video", "width": 1280, "height": 720 },
            { "index": 1, "codec_name": "aac", "codec_type": "audio", "channels": 2 }
        ],
        "format": {
            "nb_streams": 2,
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "12.345000",
            "size": "1048576"
        }
    }"#;

    #[test]
    fn test_video_info() {
        let probed: Probed = serde_json::from_str(PROBED).unwrap();
        assert_eq!(VideoInfo::from(probed), VideoInfo {
            audio_codec: Some("aac".to_owned()),
            channels: Some(2),
            container: Some("mov,mp4,m4a,3gp,3g2,mj2".to_owned()),
            duration: Some(12.345),
            height: Some(720),
            size: Some(1_048_576),
            video_codec: Some("h264".to_owned()),
            width: Some(1280),
        });
    }

    #[test]
    fn test_video_info_without_format() {
        let probed: Probed = serde_json::from_str(r#"{ "streams": [{ "codec_type": "video", "width": 1 }] }"#).unwrap();
        let info = VideoInfo::from(probed);
        assert_eq!(info.width, Some(1));
        assert_eq!(info.duration, None);
    }

    #[test]
    fn test_empty_output() {
        let probed: Probed = serde_json::from_str("{}").unwrap();
        assert_eq!(VideoInfo::from(probed), VideoInfo::default());
    }

    #[test]
    fn test_missing_tool() {
        let ffmpeg = FFmpeg {
            ffmpeg: "gifmux-no-such-ffmpeg".to_owned(),
            ffprobe: "gifmux-no-such-ffprobe".to_owned(),
        };
        match ffmpeg.probe(Path::new("movie.mp4")) {
            Err(AppError::ToolNotFound) => (),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(ffmpeg.duration(Path::new("movie.mp4")), None);
    }

    #[test]#[cfg(unix)]
    fn test_failed_extraction_removes_still() {
        let ffmpeg = FFmpeg {
            ffmpeg: "false".to_owned(),
            ffprobe: "false".to_owned(),
        };
        let before = count_stills();
        match ffmpeg.extract_frame(Path::new("movie.mp4"), 1.0) {
            Err(GifError::UpstreamFailure(_)) => (),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(count_stills(), before);
    }

    #[test]#[cfg(unix)]
    fn test_failed_probe() {
        let ffmpeg = FFmpeg {
            ffmpeg: "false".to_owned(),
            ffprobe: "false".to_owned(),
        };
        match ffmpeg.probe(Path::new("movie.mp4")) {
            Err(AppError::ProbeFailed(_)) => (),
            other => panic!("unexpected: {:?}", other),
        }
    }

    fn count_stills() -> usize {
        fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|it| it.file_name().to_string_lossy().starts_with(".gifmux_"))
                    .count()
            })
            .unwrap_or(0)
    }
}
