//! miniCBF record writer and reader.
//!
//! A record holds one data block (`image_1`) with an SLS_1.0 text header and
//! a MIME-framed binary section containing the byte-offset compressed pixel
//! array.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};

use crate::consts::CBF_PADDING;
use crate::error::{ConvertError, Result};
use crate::io::byte_offset;

const CBF_MAGIC: &str = "###CBF: VERSION 1.5, eiger2cbf";
const HEADER_CONVENTION: &str = "SLS_1.0";
const MIME_BOUNDARY: &str = "--CIF-BINARY-FORMAT-SECTION--";
const BINARY_START: [u8; 4] = [0x0c, 0x1a, 0x04, 0xd5];
const ELEMENT_TYPE: &str = "signed 32-bit integer";

/// Options for [`CbfRecord::write_to`].
#[derive(Clone, Copy, Debug)]
pub struct WriteOptions {
    /// Emit a `Content-MD5` digest of the compressed payload.
    pub digest: bool,
    /// Pad the binary section with 4095 zero bytes.
    pub pad_4k: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            digest: true,
            pad_4k: true,
        }
    }
}

#[derive(Clone, Debug)]
struct PixelArray {
    data: Vec<i32>,
    width: usize,
    height: usize,
}

/// A single crystallographic image record under construction.
#[derive(Clone, Debug, Default)]
pub struct CbfRecord {
    header_text: String,
    pixels: Option<PixelArray>,
}

impl CbfRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_header_text(&mut self, text: &str) {
        self.header_text = text.to_string();
    }

    /// Attach a signed pixel array, fastest dimension first (`width`), to be
    /// written with byte-offset compression.
    pub fn set_pixel_array(&mut self, data: Vec<i32>, width: usize, height: usize) -> Result<()> {
        if data.len() != width * height {
            return Err(ConvertError::Dimension {
                path: "array_data.data".into(),
                found: vec![data.len()],
                expected: format!("{width}x{height}"),
            });
        }
        self.pixels = Some(PixelArray {
            data,
            width,
            height,
        });
        Ok(())
    }

    /// Serialize the record.
    pub fn write_to<W: Write>(&self, w: &mut W, options: WriteOptions) -> Result<()> {
        let pixels = self.pixels.as_ref().ok_or_else(|| {
            ConvertError::Container("record has no pixel array".into())
        })?;
        let compressed = byte_offset::compress(&pixels.data);

        write!(w, "{CBF_MAGIC}\r\n\r\ndata_image_1\r\n\r\n")?;
        write!(
            w,
            "_array_data.header_convention \"{HEADER_CONVENTION}\"\r\n_array_data.header_contents\r\n;\r\n"
        )?;
        for line in self.header_text.trim_start_matches(['\r', '\n']).lines() {
            write!(w, "{line}\r\n")?;
        }
        write!(w, ";\r\n\r\n")?;

        write!(w, "_array_data.data\r\n;\r\n{MIME_BOUNDARY}\r\n")?;
        write!(
            w,
            "Content-Type: application/octet-stream;\r\n     conversions=\"x-CBF_BYTE_OFFSET\"\r\n"
        )?;
        write!(w, "Content-Transfer-Encoding: BINARY\r\n")?;
        write!(w, "X-Binary-Size: {}\r\n", compressed.len())?;
        write!(w, "X-Binary-ID: 1\r\n")?;
        write!(w, "X-Binary-Element-Type: \"{ELEMENT_TYPE}\"\r\n")?;
        write!(w, "X-Binary-Element-Byte-Order: LITTLE_ENDIAN\r\n")?;
        if options.digest {
            let digest = Md5::digest(&compressed);
            write!(w, "Content-MD5: {}\r\n", STANDARD.encode(digest))?;
        }
        write!(w, "X-Binary-Number-of-Elements: {}\r\n", pixels.data.len())?;
        write!(w, "X-Binary-Size-Fastest-Dimension: {}\r\n", pixels.width)?;
        write!(w, "X-Binary-Size-Second-Dimension: {}\r\n", pixels.height)?;
        let padding = if options.pad_4k { CBF_PADDING } else { 0 };
        write!(w, "X-Binary-Size-Padding: {padding}\r\n\r\n")?;

        w.write_all(&BINARY_START)?;
        w.write_all(&compressed)?;
        w.write_all(&vec![0u8; padding])?;

        write!(w, "\r\n{MIME_BOUNDARY}--\r\n;\r\n\r\n")?;
        w.flush()?;
        Ok(())
    }
}

/// A record read back from its serialized form.
#[derive(Clone, Debug)]
pub struct ParsedRecord {
    pub header_text: String,
    pub pixels: Vec<i32>,
    pub width: usize,
    pub height: usize,
}

/// Parse a serialized record, verifying its digest when present.
pub fn parse_record(bytes: &[u8]) -> Result<ParsedRecord> {
    let binary_at = find(bytes, &BINARY_START)
        .ok_or_else(|| malformed("missing binary section marker"))?;
    let text = String::from_utf8_lossy(&bytes[..binary_at]);

    let header_text = text
        .split_once("_array_data.header_contents\r\n;\r\n")
        .and_then(|(_, rest)| match rest.strip_prefix(";\r\n") {
            Some(after) => Some(("", after)),
            None => rest.split_once("\r\n;\r\n"),
        })
        .map(|(contents, _)| contents.replace("\r\n", "\n"))
        .ok_or_else(|| malformed("missing header contents"))?;

    let field = |name: &str| -> Option<&str> {
        text.lines()
            .find_map(|line| line.strip_prefix(name))
            .map(str::trim)
    };
    let number = |name: &str| -> Result<usize> {
        field(name)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| malformed(&format!("missing {name}")))
    };

    let size = number("X-Binary-Size:")?;
    let count = number("X-Binary-Number-of-Elements:")?;
    let width = number("X-Binary-Size-Fastest-Dimension:")?;
    let height = number("X-Binary-Size-Second-Dimension:")?;

    let start = binary_at + BINARY_START.len();
    let payload = bytes
        .get(start..start + size)
        .ok_or_else(|| malformed("binary section shorter than X-Binary-Size"))?;

    if let Some(expected) = field("Content-MD5:") {
        let actual = STANDARD.encode(Md5::digest(payload));
        if actual != expected {
            return Err(malformed("Content-MD5 mismatch"));
        }
    }

    let pixels = byte_offset::decompress(payload, count)?;
    Ok(ParsedRecord {
        header_text,
        pixels,
        width,
        height,
    })
}

fn malformed(what: &str) -> ConvertError {
    ConvertError::Container(format!("malformed CBF record: {what}"))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
