
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use super::Frame;
use super::blocks::*;
use super::errors::GifResult;
use super::parser::{parse, FrameRecord, ParsedFrame};



/// Accumulates single-image GIFs into one animated GIF.
///
/// The canvas size and color resolution only ever grow to cover the added frames.
/// The serialized header carries no global color table; every frame brings its own.
#[derive(Clone, Debug, Default)]
pub struct Container {
    color_resolution: u8,
    frames: Vec<FrameRecord>,
    height: u16,
    loop_count: u16,
    width: u16,
}


impl Container {
    /// `loop_count` 0 loops forever
    pub fn new(loop_count: u16) -> Self {
        Self::with_size(loop_count, 0, 0)
    }

    pub fn with_size(loop_count: u16, width: u16, height: u16) -> Self {
        Container { loop_count, width, height, ..Default::default() }
    }

    /// Parses `data` as a single-image GIF and appends its first image.
    ///
    /// The container is left untouched when `data` cannot be parsed.
    pub fn add(&mut self, data: &[u8], frame: &Frame) -> GifResult<()> {
        let parsed = parse(data, frame)?;
        self.fold(parsed);
        Ok(())
    }

    pub fn add_reader<R: Read>(&mut self, reader: &mut R, frame: &Frame) -> GifResult<()> {
        let mut buffer = vec![];
        reader.read_to_end(&mut buffer)?;
        self.add(&buffer, frame)
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, frame: &Frame) -> GifResult<()> {
        let mut file = File::open(path)?;
        self.add_reader(&mut file, frame)
    }

    pub fn color_resolution(&self) -> u8 {
        self.color_resolution
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Builds the complete animated GIF from the frames added so far.
    pub fn serialize(&self) -> Vec<u8> {
        let frames_len: usize = self.frames.iter().map(|it| it.graphic_control.len() + it.image_data.len()).sum();
        let mut buffer = Vec::with_capacity(SCREEN_DESCRIPTOR_END + 19 + frames_len + 1);

        buffer.extend_from_slice(&HEADER);
        buffer.extend_from_slice(&self.screen_descriptor());
        buffer.extend_from_slice(&self.loop_extension());
        for frame in &self.frames {
            buffer.extend_from_slice(&frame.graphic_control);
            buffer.extend_from_slice(&frame.image_data);
        }
        buffer.push(BlockTag::Trailer as u8);

        buffer
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.serialize())?;
        writer.flush()
    }

    fn fold(&mut self, parsed: ParsedFrame) {
        self.width = self.width.max(parsed.width);
        self.height = self.height.max(parsed.height);
        self.color_resolution = self.color_resolution.max(parsed.color_resolution);
        self.frames.push(parsed.record);
        debug!(
            "frame #{} added ({}x{}), canvas is {}x{}",
            self.frames.len(), parsed.width, parsed.height, self.width, self.height);
    }

    fn loop_extension(&self) -> [u8; 19] {
        let mut result = [0; 19];
        result[0] = EXTENSION_INTRODUCER;
        result[1] = APPLICATION_LABEL;
        result[2] = NETSCAPE.len() as u8;
        result[3 .. 14].copy_from_slice(&NETSCAPE);
        result[14 .. 16].copy_from_slice(&LOOP_SUB_BLOCK);
        LittleEndian::write_u16(&mut result[16 .. 18], self.loop_count);
        result[18] = EXTENSION_TERMINATOR;
        result
    }

    fn screen_descriptor(&self) -> [u8; 7] {
        let mut result = [0; 7];
        LittleEndian::write_u16(&mut result[0 .. 2], self.width);
        LittleEndian::write_u16(&mut result[2 .. 4], self.height);
        // No global color table; background index and aspect ratio stay zero
        result[4] = (self.color_resolution << 4) & COLOR_RESOLUTION_MASK;
        result
    }
}
