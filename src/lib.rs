
pub mod gif;

pub use crate::gif::container::Container;
pub use crate::gif::errors::{GifError, GifResult};
pub use crate::gif::parser::{parse, FrameRecord, ParsedFrame};
pub use crate::gif::preview::{build_preview, PreviewSettings, Thumbnailer, VideoProbe};
pub use crate::gif::{Delay, DisposalMethod, Frame, GraphicControl, Position};
