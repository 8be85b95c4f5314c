#![allow(dead_code)]

pub const WHITE_AND_BLACK: [u8; 6] = [0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00];
// One pixel of palette index 0
pub const PIXEL: [u8; 5] = [0x02, 0x02, 0x44, 0x01, 0x00];


#[derive(Debug, Default)]
pub struct Walked {
    pub delays: Vec<u16>,
    pub images: Vec<(u16, u16, u16, u16)>,
    pub loop_count: Option<u16>,
}


pub fn single_frame(width: u16, height: u16, screen_flags: u8, local_table: bool) -> Vec<u8> {
    let mut data = b"GIF89a".to_vec();
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&[screen_flags, 0x00, 0x00]);
    if screen_flags & 0x80 != 0 {
        data.extend_from_slice(&WHITE_AND_BLACK);
    }
    data.extend_from_slice(&[0x2C, 0x00, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    if local_table {
        data.push(0x80);
        data.extend_from_slice(&WHITE_AND_BLACK);
    } else {
        data.push(0x00);
    }
    data.extend_from_slice(&PIXEL);
    data.push(0x3B);
    data
}

fn skip_sub_blocks(data: &[u8], mut position: usize) -> usize {
    loop {
        let length = data[position] as usize;
        position += 1 + length;
        if length == 0 {
            return position;
        }
    }
}

pub fn read_u16(data: &[u8], position: usize) -> u16 {
    u16::from(data[position]) | u16::from(data[position + 1]) << 8
}

pub fn walk(data: &[u8]) -> Walked {
    assert_eq!(&data[0 .. 6], b"GIF89a");
    assert_eq!(data[10] & 0x80, 0, "container must not carry a global color table");

    let mut result = Walked::default();
    let mut position = 13;
    loop {
        match data[position] {
            0x21 => {
                match data[position + 1] {
                    0xF9 => result.delays.push(read_u16(data, position + 4)),
                    0xFF => result.loop_count = Some(read_u16(data, position + 16)),
                    _ => (),
                }
                position = skip_sub_blocks(data, position + 2);
            },
            0x2C => {
                result.images.push((
                    read_u16(data, position + 1),
                    read_u16(data, position + 3),
                    read_u16(data, position + 5),
                    read_u16(data, position + 7)));
                let flags = data[position + 9];
                assert_ne!(flags & 0x80, 0, "every frame must carry a local color table");
                position += 10 + 3 * (1 << ((flags & 0x07) + 1));
                position = skip_sub_blocks(data, position + 1);
            },
            0x3B => {
                assert_eq!(position, data.len() - 1);
                return result;
            },
            tag => panic!("unexpected tag 0x{:02X} at {}", tag, position),
        }
    }
}
