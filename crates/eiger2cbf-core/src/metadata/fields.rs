//! Candidate chains for every metadata field.

use super::paths;
use super::resolver::{
    any_float, any_int, non_empty, positive_float, positive_int, Candidate, FieldSpec,
};

/// Stored cutoffs are exclusive thresholds; the header wants the inclusive count.
fn inclusive(cutoff: i64) -> i64 {
    cutoff + 1
}

fn valid_bit_depth(depth: &i64) -> bool {
    (1..=32).contains(depth)
}

pub fn nimages() -> FieldSpec<i64> {
    FieldSpec::new("nimages", positive_int)
        .at(paths::NIMAGES)
        .on_fallback("nimages not present; the detected frame count is 0")
}

pub fn ntrigger() -> FieldSpec<i64> {
    FieldSpec::new("ntrigger", positive_int).at(paths::NTRIGGER)
}

pub fn description() -> FieldSpec<String> {
    FieldSpec::new("description", non_empty).at(paths::DESCRIPTION)
}

pub fn serial_number() -> FieldSpec<String> {
    FieldSpec::new("detector_number", non_empty).at(paths::DETECTOR_NUMBER)
}

pub fn software_version() -> FieldSpec<String> {
    FieldSpec::new("software_version", non_empty).at(paths::SOFTWARE_VERSION)
}

pub fn bit_depth() -> FieldSpec<i64> {
    FieldSpec::new("bit_depth_image", valid_bit_depth)
        .at(paths::BIT_DEPTH)
        .on_fallback("bit_depth_image is not available; assuming 16 bit")
}

/// Saturation value (firmware >= 1.5), then the exclusive count cutoff
/// (firmware 1.4), then the per-module cutoff (older firmware).
pub fn countrate_cutoff() -> FieldSpec<i64> {
    FieldSpec::new("count cutoff", positive_int)
        .at(paths::SATURATION_VALUE)
        .candidate(Candidate::at(paths::COUNT_CUTOFF).with_transform(inclusive))
        .candidate(
            Candidate::at(paths::MODULE_COUNT_CUTOFF)
                .with_transform(inclusive)
                .deprecated(),
        )
        .on_fallback(
            "count cutoff not present; writing an arbitrary large number instead. \
             You might want to change the OVERLOAD setting in subsequent processing",
        )
}

pub fn sensor_thickness() -> FieldSpec<f64> {
    FieldSpec::new("sensor_thickness", positive_float)
        .at(paths::SENSOR_THICKNESS)
        .on_fallback("sensor_thickness is not available; assuming 450 um")
}

pub fn x_pixels() -> FieldSpec<i64> {
    FieldSpec::new("x_pixels_in_detector", positive_int).at(paths::X_PIXELS)
}

pub fn y_pixels() -> FieldSpec<i64> {
    FieldSpec::new("y_pixels_in_detector", positive_int).at(paths::Y_PIXELS)
}

pub fn beam_center_x() -> FieldSpec<i64> {
    FieldSpec::new("beam_center_x", any_int).at(paths::BEAM_CENTER_X)
}

pub fn beam_center_y() -> FieldSpec<i64> {
    FieldSpec::new("beam_center_y", any_int).at(paths::BEAM_CENTER_Y)
}

pub fn count_time() -> FieldSpec<f64> {
    FieldSpec::new("count_time", any_float).at(paths::COUNT_TIME)
}

pub fn frame_time() -> FieldSpec<f64> {
    FieldSpec::new("frame_time", any_float).at(paths::FRAME_TIME)
}

pub fn pixel_size() -> FieldSpec<f64> {
    FieldSpec::new("x_pixel_size", positive_float).at(paths::X_PIXEL_SIZE)
}

/// Firmware >= 1.7 stores `distance`; older firmware `detector_distance`.
pub fn detector_distance() -> FieldSpec<f64> {
    FieldSpec::new("detector distance", positive_float)
        .at(paths::DISTANCE)
        .at(paths::DETECTOR_DISTANCE)
        .on_fallback("detector distance was not defined; the header field is set to -1")
}

pub fn wavelength() -> FieldSpec<f64> {
    FieldSpec::new("wavelength", positive_float)
        .at(paths::SAMPLE_INCIDENT_WAVELENGTH)
        .at(paths::BEAM_WAVELENGTH)
        .at(paths::MONOCHROMATOR_WAVELENGTH)
        .at(paths::BEAM_INCIDENT_WAVELENGTH)
        .on_fallback("wavelength was not defined; the header field is set to -1")
}

pub fn oscillation_width() -> FieldSpec<f64> {
    FieldSpec::new("omega_range_average", positive_float)
        .at(paths::OMEGA_RANGE_AVERAGE)
        .on_fallback("oscillation width was not defined; Start_angle will read 0 for every frame")
}
