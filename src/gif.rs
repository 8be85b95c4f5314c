
use std::default::Default;

use byteorder::{ByteOrder, LittleEndian};
use enum_iterator::IntoEnumIterator;

use self::blocks::{EXTENSION_INTRODUCER, EXTENSION_TERMINATOR, GRAPHIC_CONTROL_LABEL, GRAPHIC_CONTROL_SIZE};



pub mod blocks;
pub mod container;
pub mod errors;
pub mod parser;
pub mod preview;



/// Frame display time in hundredths of a second
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Delay(pub u16);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, enum_iterator_derive::IntoEnumIterator)]
pub enum DisposalMethod {
    Unspecified = 0,
    Keep = 1,
    Background = 2,
    Previous = 3,
}

/// Contents of a synthesized Graphic Control Extension
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GraphicControl {
    pub delay: Delay,
    pub disposal: DisposalMethod,
    /// Palette index treated as transparent
    pub transparent: Option<u8>,
}

/// Per-frame options given when a frame is added to a container.
///
/// `x` and `y` replace the position stored in the source image descriptor.
/// `delay`, `disposal` and `transparent` only take effect when the source
/// carries no Graphic Control Extension of its own.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    pub delay: Delay,
    pub disposal: DisposalMethod,
    pub transparent: Option<u8>,
    pub x: Option<u16>,
    pub y: Option<u16>,
}


impl Delay {
    pub fn new(centiseconds: u16) -> Self {
        Delay(centiseconds)
    }

    pub fn from_millis(millis: u32) -> Self {
        let centiseconds = (millis + 5) / 10;
        Delay(centiseconds.min(u32::from(u16::max_value())) as u16)
    }

    pub fn centiseconds(self) -> u16 {
        self.0
    }
}

impl Default for Delay {
    fn default() -> Self {
        Delay(20)
    }
}


impl Position {
    pub fn new(x: u16, y: u16) -> Self {
        Position { x, y }
    }
}


impl DisposalMethod {
    pub fn from_bits(bits: u8) -> Option<Self> {
        DisposalMethod::into_enum_iter().find(|it| *it as u8 == bits)
    }
}

impl Default for DisposalMethod {
    fn default() -> Self {
        DisposalMethod::Previous
    }
}


impl GraphicControl {
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut flags = (self.disposal as u8) << 2;
        if self.transparent.is_some() {
            flags |= 0x01;
        }
        let mut delay = [0; 2];
        LittleEndian::write_u16(&mut delay, self.delay.0);
        [
            EXTENSION_INTRODUCER,
            GRAPHIC_CONTROL_LABEL,
            GRAPHIC_CONTROL_SIZE,
            flags,
            delay[0],
            delay[1],
            self.transparent.unwrap_or(0),
            EXTENSION_TERMINATOR,
        ]
    }
}


impl Frame {
    pub fn with_delay(delay: Delay) -> Self {
        Frame { delay, ..Default::default() }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.x = Some(position.x);
        self.y = Some(position.y);
        self
    }

    pub fn graphic_control(&self) -> GraphicControl {
        GraphicControl {
            delay: self.delay,
            disposal: self.disposal,
            transparent: self.transparent,
        }
    }
}
