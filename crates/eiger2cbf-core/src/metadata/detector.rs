use tracing::info;

use crate::consts::{DEFAULT_BIT_DEPTH, DEFAULT_SENSOR_THICKNESS, UNRESOLVED};
use crate::error::{ConvertError, Result};
use crate::io::container::ContainerReader;

use super::fields;

/// Detector and beamline description shared read-only by every frame worker.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorMetadata {
    pub description: String,
    pub serial_number: String,
    pub software_version: String,
    pub bit_depth: u32,
    /// Largest representable pixel value, `2^bit_depth - 1`.
    pub error_value: u32,
    /// Inclusive count-rate cutoff written to the header.
    pub countrate_cutoff: i64,
    /// Meters.
    pub sensor_thickness: f64,
    /// Meters.
    pub pixel_size: f64,
    /// Meters, -1 when unresolved.
    pub detector_distance: f64,
    /// Angstrom, -1 when unresolved.
    pub wavelength: f64,
    /// Seconds.
    pub count_time: f64,
    /// Seconds.
    pub frame_time: f64,
    /// Degrees per frame, 0 when unresolved.
    pub oscillation_width: f64,
    pub beam_center_x: i64,
    pub beam_center_y: i64,
    pub xpixels: usize,
    pub ypixels: usize,
    pub nimages: u64,
    pub ntrigger: u64,
}

impl DetectorMetadata {
    /// Resolve every field from the container.
    ///
    /// Missing fields fall back to their documented defaults; only a missing
    /// or non-positive pixel grid is an error.
    pub fn resolve(reader: &dyn ContainerReader) -> Result<Self> {
        let xpixels = fields::x_pixels().resolve(reader, -1).value;
        let ypixels = fields::y_pixels().resolve(reader, -1).value;
        if xpixels <= 0 || ypixels <= 0 {
            return Err(ConvertError::InvalidDimensions { xpixels, ypixels });
        }

        let bit_depth = fields::bit_depth()
            .resolve(reader, DEFAULT_BIT_DEPTH as i64)
            .value as u32;
        let error_value = error_value_for(bit_depth);

        let countrate_cutoff = fields::countrate_cutoff()
            .resolve(reader, error_value as i64 - 1)
            .value;

        let metadata = Self {
            description: fields::description().resolve(reader, String::new()).value,
            serial_number: fields::serial_number().resolve(reader, String::new()).value,
            software_version: fields::software_version()
                .resolve(reader, String::new())
                .value,
            bit_depth,
            error_value,
            countrate_cutoff,
            sensor_thickness: fields::sensor_thickness()
                .resolve(reader, DEFAULT_SENSOR_THICKNESS)
                .value,
            pixel_size: fields::pixel_size().resolve(reader, UNRESOLVED).value,
            detector_distance: fields::detector_distance()
                .resolve(reader, UNRESOLVED)
                .value,
            wavelength: fields::wavelength().resolve(reader, UNRESOLVED).value,
            count_time: fields::count_time().resolve(reader, UNRESOLVED).value,
            frame_time: fields::frame_time().resolve(reader, UNRESOLVED).value,
            oscillation_width: fields::oscillation_width().resolve(reader, 0.0).value,
            beam_center_x: fields::beam_center_x().resolve(reader, -1).value,
            beam_center_y: fields::beam_center_y().resolve(reader, -1).value,
            xpixels: xpixels as usize,
            ypixels: ypixels as usize,
            nimages: fields::nimages().resolve(reader, 0).value as u64,
            ntrigger: fields::ntrigger().resolve(reader, 1).value as u64,
        };

        info!(
            xpixels = metadata.xpixels,
            ypixels = metadata.ypixels,
            bit_depth = metadata.bit_depth,
            error_value = metadata.error_value,
            total_frames = metadata.total_frames(),
            "Detector metadata resolved"
        );
        Ok(metadata)
    }

    /// Frame count reported by the detector (`nimages * ntrigger`).
    ///
    /// Some firmware under-reports `nimages`, so frames past this count are
    /// still attempted.
    pub fn total_frames(&self) -> u64 {
        self.nimages * self.ntrigger
    }

    pub fn pixel_count(&self) -> usize {
        self.xpixels * self.ypixels
    }
}

/// Largest value representable with `bit_depth` bits.
pub fn error_value_for(bit_depth: u32) -> u32 {
    ((1u64 << bit_depth) - 1) as u32
}
