
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{stdout, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

use failure::Fail;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gif_muxer::{build_preview, Container, Delay, Frame, PreviewSettings};

mod errors;
mod ffmpeg;
mod thumbnail;

use crate::errors::{AppResult, AppError};
use crate::ffmpeg::FFmpeg;
use crate::thumbnail::FilmStrip;



#[derive(Clone, Debug, Eq, PartialEq)]
struct Entry {
    filepath: String,
    frame: Frame,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Setting {
    entries: Vec<Entry>,
    loops: u16,
    preview: Option<PathBuf>,
    preview_settings: PreviewSettings,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Parsed {
    output: Option<String>,
    setting: Setting,
}


fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = app() {
        let mut fail: &dyn Fail = &err;
        let mut message = err.to_string();
        while let Some(cause) = fail.cause() {
            message.push_str(&format!("\n\tcaused by: {}", cause));
            fail = cause;
        }
        eprintln!("{}\n", message);
        print_usage();
        exit(1);
    }
}

fn print_usage() {
    eprintln!(include_str!("usage.txt"));
}

fn app() -> AppResult<()> {
    let parsed = parse_args(env::args().skip(1))?;

    let data = if let Some(video) = parsed.setting.preview.as_ref() {
        preview(video, &parsed.setting)?
    } else {
        compile(&parsed.setting)?
    };

    if let Some(output) = parsed.output {
        let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(output)?;
        file.write_all(&data)?;
    } else {
        let out = stdout();
        let mut out = BufWriter::new(out.lock());
        out.write_all(&data)?;
        out.flush()?;
    }

    Ok(())
}


fn compile(setting: &Setting) -> AppResult<Vec<u8>> {
    if setting.entries.is_empty() {
        return Err(AppError::NotEnoughArgument);
    }

    let progress_bar = ProgressBar::new(setting.entries.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:60.cyan/blue}] {pos:>4}/{len:4} files processed ({eta} remaining) | {msg}")
            .progress_chars("█▌ ")
    );

    let mut container = Container::new(setting.loops);
    for entry in &setting.entries {
        progress_bar.set_message(&file_name(&entry.filepath));
        container.add(&load_gif(&entry.filepath)?, &entry.frame)?;
        progress_bar.inc(1);
    }
    progress_bar.finish_and_clear();

    info!("{} frames, {}x{}", container.len(), container.width(), container.height());
    Ok(container.serialize())
}

fn preview(video: &Path, setting: &Setting) -> AppResult<Vec<u8>> {
    let ffmpeg = FFmpeg::default();
    let settings = PreviewSettings { loop_count: setting.loops, ..setting.preview_settings };
    build_preview(&ffmpeg, &FilmStrip, video, &settings)?
        .ok_or_else(|| AppError::PreviewUnavailable(video.display().to_string()))
}


fn parse_args<I: Iterator<Item = String>>(mut args: I) -> AppResult<Parsed> {
    let mut setting = Setting::default();
    let mut output = None;
    let mut frame = Frame::default();

    #[allow(clippy::while_let_on_iterator)]
    while let Some(arg) = args.next() {
        let mut next = || args.next().ok_or(AppError::NotEnoughArgument);

        match &*arg {
            "-h" | "--help" => {
                print_usage();
                exit(0);
            },
            "-d" | "--delay" =>
                frame.delay = Delay::new(next()?.parse()?),
            "-l" | "--loops" =>
                setting.loops = next()?.parse()?,
            "-t" | "--transparent" =>
                frame.transparent = Some(next()?.parse()?),
            "-x" =>
                frame.x = Some(next()?.parse()?),
            "-y" =>
                frame.y = Some(next()?.parse()?),
            "-o" | "--output" =>
                output = Some(next()?),
            "--preview" =>
                setting.preview = Some(PathBuf::from(next()?)),
            "--size" =>
                setting.preview_settings.size = next()?.parse()?,
            "--count" =>
                setting.preview_settings.count = next()?.parse()?,
            filepath => {
                let entry = Entry {
                    filepath: filepath.to_owned(),
                    frame,
                };
                setting.entries.push(entry);
            }
        }
    }

    Ok(Parsed { setting, output })
}


/// Reads `filepath` as GIF data, converting other image formats to a single frame GIF
fn load_gif(filepath: &str) -> AppResult<Vec<u8>> {
    let mut file = File::open(filepath)?;
    let mut buffer = vec![];
    file.read_to_end(&mut buffer)?;
    if buffer.starts_with(b"GIF") {
        return Ok(buffer);
    }

    let image = image::load_from_memory(&buffer)?;
    let mut result = vec![];
    image.write_to(&mut result, image::ImageOutputFormat::GIF)?;
    Ok(result)
}

fn file_name(filepath: &str) -> String {
    Path::new(filepath)
        .file_name()
        .map(|it| it.to_string_lossy().into_owned())
        .unwrap_or_else(|| filepath.to_owned())
}
