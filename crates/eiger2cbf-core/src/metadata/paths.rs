//! Dataset locations in EIGER master files, across firmware revisions.

pub const NIMAGES: &str = "/entry/instrument/detector/detectorSpecific/nimages";
pub const NTRIGGER: &str = "/entry/instrument/detector/detectorSpecific/ntrigger";

pub const DESCRIPTION: &str = "/entry/instrument/detector/description";
pub const DETECTOR_NUMBER: &str = "/entry/instrument/detector/detector_number";
pub const SOFTWARE_VERSION: &str = "/entry/instrument/detector/detectorSpecific/software_version";
pub const BIT_DEPTH: &str = "/entry/instrument/detector/bit_depth_image";

/// Firmware >= 1.5.
pub const SATURATION_VALUE: &str = "/entry/instrument/detector/detectorSpecific/saturation_value";
/// Firmware 1.4; the stored threshold is exclusive.
pub const COUNT_CUTOFF: &str =
    "/entry/instrument/detector/detectorSpecific/countrate_correction_count_cutoff";
/// Firmware < 1.4, per-module copy.
pub const MODULE_COUNT_CUTOFF: &str =
    "/entry/instrument/detector/detectorSpecific/detectorModule_000/countrate_correction_count_cutoff";

pub const SENSOR_THICKNESS: &str = "/entry/instrument/detector/sensor_thickness";
pub const X_PIXELS: &str = "/entry/instrument/detector/detectorSpecific/x_pixels_in_detector";
pub const Y_PIXELS: &str = "/entry/instrument/detector/detectorSpecific/y_pixels_in_detector";
pub const BEAM_CENTER_X: &str = "/entry/instrument/detector/beam_center_x";
pub const BEAM_CENTER_Y: &str = "/entry/instrument/detector/beam_center_y";
pub const COUNT_TIME: &str = "/entry/instrument/detector/count_time";
pub const FRAME_TIME: &str = "/entry/instrument/detector/frame_time";
pub const X_PIXEL_SIZE: &str = "/entry/instrument/detector/x_pixel_size";

/// Firmware >= 1.7.
pub const DISTANCE: &str = "/entry/instrument/detector/distance";
/// Firmware < 1.7.
pub const DETECTOR_DISTANCE: &str = "/entry/instrument/detector/detector_distance";

/// Firmware >= 1.7.
pub const SAMPLE_INCIDENT_WAVELENGTH: &str = "/entry/sample/beam/incident_wavelength";
pub const BEAM_WAVELENGTH: &str = "/entry/instrument/beam/wavelength";
pub const MONOCHROMATOR_WAVELENGTH: &str = "/entry/instrument/monochromator/wavelength";
/// Firmware 1.6.
pub const BEAM_INCIDENT_WAVELENGTH: &str = "/entry/instrument/beam/incident_wavelength";

pub const OMEGA_RANGE_AVERAGE: &str = "/entry/sample/goniometer/omega_range_average";
pub const OMEGA: &str = "/entry/sample/goniometer/omega";
pub const PIXEL_MASK: &str = "/entry/instrument/detector/detectorSpecific/pixel_mask";

pub const ENTRY: &str = "/entry";
pub const ENTRY_DATA: &str = "/entry/data";
