
use byteorder::{ByteOrder, LittleEndian};
use enum_iterator::IntoEnumIterator;

use super::errors::{GifError, GifResult};



pub const SIGNATURE: [u8; 3] = *b"GIF";
pub const HEADER: [u8; 6] = *b"GIF89a";
/// Signature plus Logical Screen Descriptor
pub const SCREEN_DESCRIPTOR_END: usize = 13;

pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const EXTENSION_TERMINATOR: u8 = 0x00;
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
pub const GRAPHIC_CONTROL_SIZE: u8 = 0x04;
pub const APPLICATION_LABEL: u8 = 0xFF;
pub const NETSCAPE: [u8; 11] = *b"NETSCAPE2.0";
pub const LOOP_SUB_BLOCK: [u8; 2] = [0x03, 0x01];

// Logical Screen Descriptor flags
pub const COLOR_TABLE_FLAG: u8 = 0x80;
pub const COLOR_RESOLUTION_MASK: u8 = 0x70;
pub const SCREEN_SORT_FLAG: u8 = 0x08;
pub const TABLE_SIZE_MASK: u8 = 0x07;

// Image Descriptor flags
pub const INTERLACE_FLAG: u8 = 0x40;
pub const LOCAL_SORT_FLAG: u8 = 0x20;


#[derive(Clone, Copy, Debug, Eq, PartialEq, enum_iterator_derive::IntoEnumIterator)]
pub enum BlockTag {
    Extension = 0x21,
    ImageDescriptor = 0x2C,
    Trailer = 0x3B,
}


impl BlockTag {
    pub fn from_u8(byte: u8) -> GifResult<Self> {
        BlockTag::into_enum_iter()
            .find(|it| *it as u8 == byte)
            .ok_or(GifError::UnknownBlockTag(byte))
    }
}


/// Byte length of the color table announced by `flags`
pub fn color_table_len(flags: u8) -> usize {
    3 * (1 << ((flags & TABLE_SIZE_MASK) + 1))
}

pub fn color_resolution(screen_flags: u8) -> u8 {
    (screen_flags & COLOR_RESOLUTION_MASK) >> 4
}

pub fn push_u16(buffer: &mut Vec<u8>, value: u16) {
    let mut bytes = [0; 2];
    LittleEndian::write_u16(&mut bytes, value);
    buffer.extend_from_slice(&bytes);
}
