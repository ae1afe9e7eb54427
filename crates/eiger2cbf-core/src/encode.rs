use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::consts::{FRAME_NUMBER_DIGITS, OUTPUT_EXTENSION};
use crate::error::Result;
use crate::frame::ClassifiedFrame;
use crate::io::cbf::{CbfRecord, WriteOptions};
use crate::metadata::DetectorMetadata;

/// Header text, classified pixels and destination of one output image.
#[derive(Clone, Debug)]
pub struct OutputRecord {
    pub header: String,
    pub frame: ClassifiedFrame,
    pub path: PathBuf,
}

impl OutputRecord {
    /// Wrap the header and pixels in a CBF record.
    pub fn into_cbf(self) -> Result<CbfRecord> {
        let mut record = CbfRecord::new();
        record.set_header_text(&self.header);
        record.set_pixel_array(self.frame.data, self.frame.width, self.frame.height)?;
        Ok(record)
    }

    /// Write the record to its file with digest and 4K padding, returning the path.
    pub fn write(self) -> Result<PathBuf> {
        let path = self.path.clone();
        let record = self.into_cbf()?;
        let mut writer = BufWriter::new(File::create(&path)?);
        record.write_to(&mut writer, WriteOptions::default())?;
        Ok(path)
    }
}

/// Pixel size in whole micrometers; the small offset keeps 75e-6 from
/// truncating to 74.
fn pixel_size_um(pixel_size: f64) -> i64 {
    (pixel_size * 1e6 + 1e-6).trunc() as i64
}

/// Build the SLS_1.0 header for one frame. Field order is fixed.
pub fn format_header(metadata: &DetectorMetadata, start_angle: f64) -> String {
    let pixel_um = pixel_size_um(metadata.pixel_size);
    format!(
        "\n\
         # Detector: {}, S/N {}\n\
         # Pixel_size {}e-6 m x {}e-6 m\n\
         # Silicon sensor, thickness {:.6} m\n\
         # Exposure_time {:.6} s\n\
         # Exposure_period {:.6} s\n\
         # Count_cutoff {} counts\n\
         # Wavelength {:.6} A\n\
         # Detector_distance {:.6} m\n\
         # Beam_xy ({}, {}) pixels\n\
         # Start_angle {:.6} deg.\n\
         # Angle_increment {:.6} deg.\n",
        metadata.description,
        metadata.serial_number,
        pixel_um,
        pixel_um,
        metadata.sensor_thickness,
        metadata.count_time,
        metadata.frame_time,
        metadata.countrate_cutoff,
        metadata.wavelength,
        metadata.detector_distance,
        metadata.beam_center_x,
        metadata.beam_center_y,
        start_angle,
        metadata.oscillation_width,
    )
}

/// `<prefix><zero-padded output number>.cbf`
pub fn output_file_name(prefix: &str, output_number: i64) -> String {
    format!(
        "{prefix}{output_number:0width$}.{OUTPUT_EXTENSION}",
        width = FRAME_NUMBER_DIGITS
    )
}

/// Assemble the output record for one classified frame.
pub fn encode(
    metadata: &DetectorMetadata,
    start_angle: f64,
    output_number: i64,
    frame: ClassifiedFrame,
    prefix: &str,
) -> OutputRecord {
    OutputRecord {
        header: format_header(metadata, start_angle),
        frame,
        path: PathBuf::from(output_file_name(prefix, output_number)),
    }
}
