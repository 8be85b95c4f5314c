
use failure::Fail;



pub type AppResult<T> = Result<T, AppError>;


#[derive(Fail, Debug)]
pub enum AppError {
    #[fail(display = "GIF error: {}", _0)]
    Gif(gif_muxer::GifError),
    #[fail(display = "Image error: {}", _0)]
    Image(image::ImageError),
    #[fail(display = "Not a integer: {}", _0)]
    Int(std::num::ParseIntError),
    #[fail(display = "IO error: {}", _0)]
    Io(std::io::Error),
    #[fail(display = "Not enough argument")]
    NotEnoughArgument,
    #[fail(display = "JSON error: {}", _0)]
    Json(serde_json::Error),
    #[fail(display = "Preview unavailable for {}", _0)]
    PreviewUnavailable(String),
    #[fail(display = "ffprobe failed: {}", _0)]
    ProbeFailed(String),
    #[fail(display = "ffmpeg/ffprobe not found")]
    ToolNotFound,
}

macro_rules! define_error {
    ($source:ty, $kind:ident) => {
        impl From<$source> for AppError {
            fn from(error: $source) -> AppError {
                AppError::$kind(error)
            }
        }
    }
}

define_error!(std::io::Error, Io);
define_error!(std::num::ParseIntError, Int);
define_error!(image::ImageError, Image);
define_error!(gif_muxer::GifError, Gif);
define_error!(serde_json::Error, Json);
