//! CBF byte-offset compression of signed 32-bit pixel arrays.
//!
//! Each pixel is stored as the difference from its predecessor (the first
//! from zero). Differences in -127..=127 take one byte; larger ones are
//! escaped with a marker and widened to 16, 32 or 64 bits, little-endian.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{ConvertError, Result};

const ESCAPE_8: u8 = 0x80;
const ESCAPE_16: i16 = i16::MIN;
const ESCAPE_32: i32 = i32::MIN;

/// Compress `pixels` with the byte-offset scheme.
pub fn compress(pixels: &[i32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() + pixels.len() / 8);
    let mut previous = 0i64;

    for &pixel in pixels {
        let current = pixel as i64;
        let delta = current - previous;
        previous = current;

        if (-127..=127).contains(&delta) {
            out.push(delta as i8 as u8);
            continue;
        }
        out.push(ESCAPE_8);
        if (-32767..=32767).contains(&delta) {
            out.extend_from_slice(&(delta as i16).to_le_bytes());
            continue;
        }
        out.extend_from_slice(&ESCAPE_16.to_le_bytes());
        if (-2_147_483_647..=2_147_483_647).contains(&delta) {
            out.extend_from_slice(&(delta as i32).to_le_bytes());
            continue;
        }
        out.extend_from_slice(&ESCAPE_32.to_le_bytes());
        out.extend_from_slice(&delta.to_le_bytes());
    }

    out
}

/// Decompress a byte-offset stream holding exactly `count` pixels.
pub fn decompress(data: &[u8], count: usize) -> Result<Vec<i32>> {
    let mut cursor = Cursor::new(data);
    let mut pixels = Vec::with_capacity(count);
    let mut current = 0i64;

    let truncated = |_| ConvertError::Container("byte-offset stream truncated".into());

    while pixels.len() < count {
        let first = cursor.read_u8().map_err(truncated)?;
        let delta = if first != ESCAPE_8 {
            first as i8 as i64
        } else {
            let d16 = cursor.read_i16::<LittleEndian>().map_err(truncated)?;
            if d16 != ESCAPE_16 {
                d16 as i64
            } else {
                let d32 = cursor.read_i32::<LittleEndian>().map_err(truncated)?;
                if d32 != ESCAPE_32 {
                    d32 as i64
                } else {
                    cursor.read_i64::<LittleEndian>().map_err(truncated)?
                }
            }
        };
        current += delta;
        let pixel = i32::try_from(current).map_err(|_| {
            ConvertError::Container(format!("decoded pixel {current} overflows 32 bits"))
        })?;
        pixels.push(pixel);
    }

    Ok(pixels)
}
