
use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, trace, warn};

use super::{DisposalMethod, Frame};
use super::blocks::*;
use super::errors::{GifError, GifResult};



/// A frame ready to be appended to a container.
///
/// `image_data` never refers to a global color table; it carries its own
/// local table whenever the source had any table at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameRecord {
    pub graphic_control: Vec<u8>,
    pub image_data: Vec<u8>,
}

/// A `FrameRecord` together with the screen values of its source
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedFrame {
    pub record: FrameRecord,
    pub width: u16,
    pub height: u16,
    pub color_resolution: u8,
}

struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

struct GlobalTable<'a> {
    bytes: &'a [u8],
    size: u8,
    sorted: bool,
}


/// Extracts the first image of a single-image GIF.
pub fn parse(data: &[u8], frame: &Frame) -> GifResult<ParsedFrame> {
    if data.len() < SIGNATURE.len() || data[..SIGNATURE.len()] != SIGNATURE {
        return Err(GifError::NotAGif);
    }

    let mut cursor = Cursor::new(data);
    cursor.seek(6)?;
    let width = cursor.read_u16()?;
    let height = cursor.read_u16()?;
    let screen_flags = cursor.read_u8()?;
    cursor.seek(SCREEN_DESCRIPTOR_END)?;

    let global = if screen_flags & COLOR_TABLE_FLAG != 0 {
        Some(GlobalTable {
            bytes: cursor.take(color_table_len(screen_flags))?,
            size: screen_flags & TABLE_SIZE_MASK,
            sorted: screen_flags & SCREEN_SORT_FLAG != 0,
        })
    } else {
        None
    };

    let mut graphic_control = None;

    let image_data = loop {
        if cursor.is_empty() {
            return Err(GifError::NoImageBlock);
        }
        match BlockTag::from_u8(cursor.read_u8()?)? {
            BlockTag::Extension => {
                let (label, block) = read_extension(&mut cursor)?;
                if label == GRAPHIC_CONTROL_LABEL {
                    if let Some(flags) = block.get(3) {
                        trace!("graphic control with disposal {:?}", DisposalMethod::from_bits((flags >> 2) & 0x07));
                    }
                    graphic_control = Some(block.to_vec());
                } else {
                    trace!("skip extension 0x{:02X} ({} bytes)", label, block.len());
                }
            },
            BlockTag::ImageDescriptor =>
                break read_image(&mut cursor, frame, global.as_ref())?,
            BlockTag::Trailer =>
                return Err(GifError::NoImageBlock),
        }
    };

    let graphic_control = graphic_control.unwrap_or_else(|| frame.graphic_control().to_bytes().to_vec());

    Ok(ParsedFrame {
        record: FrameRecord { graphic_control, image_data },
        width,
        height,
        color_resolution: color_resolution(screen_flags),
    })
}


/// Returns the extension label and the whole block, introducer through terminator.
fn read_extension<'a>(cursor: &mut Cursor<'a>) -> GifResult<(u8, &'a [u8])> {
    let start = cursor.position - 1;
    let label = cursor.read_u8()?;
    cursor.skip_sub_blocks()?;
    Ok((label, cursor.since(start)))
}

fn read_image(cursor: &mut Cursor, frame: &Frame, global: Option<&GlobalTable>) -> GifResult<Vec<u8>> {
    let mut image_data = vec![BlockTag::ImageDescriptor as u8];

    let x = cursor.read_u16()?;
    let y = cursor.read_u16()?;
    push_u16(&mut image_data, frame.x.unwrap_or(x));
    push_u16(&mut image_data, frame.y.unwrap_or(y));
    image_data.extend_from_slice(cursor.take(4)?);

    let flags = cursor.read_u8()?;
    let promoted = flags & COLOR_TABLE_FLAG == 0;
    if !promoted {
        image_data.push(flags);
        image_data.extend_from_slice(cursor.take(color_table_len(flags))?);
    } else if let Some(global) = global {
        let mut local_flags = COLOR_TABLE_FLAG | (flags & INTERLACE_FLAG) | global.size;
        if global.sorted {
            local_flags |= LOCAL_SORT_FLAG;
        }
        image_data.push(local_flags);
        image_data.extend_from_slice(global.bytes);
    } else {
        warn!("image has neither a local nor a global color table");
        image_data.push(flags);
    }

    // LZW minimum code size followed by the data sub-blocks
    let start = cursor.position;
    cursor.read_u8()?;
    cursor.skip_sub_blocks()?;
    image_data.extend_from_slice(cursor.since(start));

    debug!(
        "parsed image at ({}, {}), {} bytes, promoted color table: {}",
        frame.x.unwrap_or(x), frame.y.unwrap_or(y), image_data.len(), promoted && global.is_some());

    Ok(image_data)
}


impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Cursor { data, position: 0 }
    }

    fn is_empty(&self) -> bool {
        self.data.len() <= self.position
    }

    fn seek(&mut self, position: usize) -> GifResult<()> {
        if self.data.len() < position {
            return Err(self.eof());
        }
        self.position = position;
        Ok(())
    }

    fn take(&mut self, length: usize) -> GifResult<&'a [u8]> {
        let end = self.position + length;
        if self.data.len() < end {
            return Err(self.eof());
        }
        let result = &self.data[self.position .. end];
        self.position = end;
        Ok(result)
    }

    fn read_u8(&mut self) -> GifResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> GifResult<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    /// Skips length-prefixed sub-blocks up to and including the zero-length terminator.
    fn skip_sub_blocks(&mut self) -> GifResult<()> {
        loop {
            let length = self.read_u8()?;
            if length == 0 {
                return Ok(());
            }
            self.take(usize::from(length))?;
        }
    }

    fn since(&self, start: usize) -> &'a [u8] {
        &self.data[start .. self.position]
    }

    fn eof(&self) -> GifError {
        GifError::UnexpectedEof { offset: self.data.len() }
    }
}
