
use failure::Fail;
use std::io::Error as IOError;


pub type GifResult<T> = Result<T, GifError>;



#[derive(Fail, Debug)]
pub enum GifError {
    #[fail(display = "IO error: {}", _0)]
    Io(IOError),
    #[fail(display = "No image block found before the trailer")]
    NoImageBlock,
    #[fail(display = "Not a GIF")]
    NotAGif,
    #[fail(display = "Unexpected end of data at offset {}", offset)]
    UnexpectedEof { offset: usize },
    #[fail(display = "Unknown block tag: 0x{:02X}", _0)]
    UnknownBlockTag(u8),
    #[fail(display = "Upstream failure: {}", _0)]
    UpstreamFailure(String),
}

macro_rules! define_error {
    ($source:ty, $kind:ident) => {
        impl From<$source> for GifError {
            fn from(error: $source) -> GifError {
                GifError::$kind(error)
            }
        }
    }
}

define_error!(std::io::Error, Io);


impl GifError {
    pub fn is_format_error(&self) -> bool {
        match self {
            GifError::NoImageBlock | GifError::NotAGif | GifError::UnexpectedEof { .. } | GifError::UnknownBlockTag(_) => true,
            GifError::Io(_) | GifError::UpstreamFailure(_) => false,
        }
    }
}
