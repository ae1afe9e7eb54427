use tracing::{info, warn};

use crate::consts::{OVERLOADED_PIXEL, UNDEFINED_PIXEL};
use crate::error::Result;
use crate::frame::{try_alloc, ClassifiedFrame, PixelMask, RawFrame};
use crate::io::container::ContainerReader;
use crate::metadata::paths;

/// Load the detector pixel mask. A mask whose length does not match the
/// pixel grid is discarded.
pub fn load_pixel_mask(
    reader: &dyn ContainerReader,
    pixel_count: usize,
    error_value: u32,
) -> PixelMask {
    match reader.read_flag_array(paths::PIXEL_MASK) {
        Some(flags) if flags.len() == pixel_count => {
            let flagged = flags.iter().filter(|&&f| f != 0).count();
            info!(flagged, "Loaded {}", paths::PIXEL_MASK);
            PixelMask::Present(flags)
        }
        Some(flags) => {
            warn!(
                len = flags.len(),
                pixel_count, "Pixel mask does not match the detector grid; ignoring it"
            );
            warn_value_masking(error_value);
            PixelMask::Absent
        }
        None => {
            warn!("Failed to read the pixel mask from {}", paths::PIXEL_MASK);
            warn_value_masking(error_value);
            PixelMask::Absent
        }
    }
}

fn warn_value_masking(error_value: u32) {
    warn!(
        error_value,
        "Pixels whose intensity equals 2^bit_depth - 1 are converted to -1; \
         this might mask overloaded (saturated) pixels as well"
    );
}

/// Classify one pixel.
///
/// Mask flag 1 gives -1. Without a mask, a value equal to `error_value`
/// gives -1. A mask flag above 1 gives -2. Anything else passes through.
#[inline]
pub fn classify_pixel(raw: u32, flag: Option<u32>, error_value: u32) -> i32 {
    match flag {
        Some(1) => UNDEFINED_PIXEL,
        Some(f) if f > 1 => OVERLOADED_PIXEL,
        Some(_) => raw as i32,
        None if raw == error_value => UNDEFINED_PIXEL,
        None => raw as i32,
    }
}

/// Classify every pixel of `raw` into `out`. Both slices, and the mask when
/// present, have the same length.
pub fn classify_into(raw: &[u32], mask: &PixelMask, error_value: u32, out: &mut [i32]) {
    debug_assert_eq!(raw.len(), out.len());
    match mask.flags() {
        Some(flags) => {
            debug_assert_eq!(flags.len(), raw.len());
            for ((o, &r), &f) in out.iter_mut().zip(raw).zip(flags) {
                *o = classify_pixel(r, Some(f), error_value);
            }
        }
        None => {
            for (o, &r) in out.iter_mut().zip(raw) {
                *o = classify_pixel(r, None, error_value);
            }
        }
    }
}

/// Classify a whole frame into a freshly allocated signed buffer.
pub fn classify(raw: &RawFrame, mask: &PixelMask, error_value: u32) -> Result<ClassifiedFrame> {
    let mut data = try_alloc("classified frame", raw.data.len(), 0i32)?;
    classify_into(&raw.data, mask, error_value, &mut data);
    Ok(ClassifiedFrame {
        data,
        width: raw.width,
        height: raw.height,
    })
}
