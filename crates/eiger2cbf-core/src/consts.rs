/// Default number of frames converted concurrently.
pub const DEFAULT_WORKERS: usize = 32;

/// Bit depth assumed when the container does not report one.
pub const DEFAULT_BIT_DEPTH: u32 = 16;

/// Sensor thickness assumed when the container does not report one (meters).
pub const DEFAULT_SENSOR_THICKNESS: f64 = 450e-6;

/// Value written for distance and wavelength when no candidate resolves.
pub const UNRESOLVED: f64 = -1.0;

/// Oscillation widths below this are treated as zero (degrees).
pub const MIN_OSCILLATION_WIDTH: f64 = 1e-6;

/// Pixel value for undefined or explicitly masked pixels.
pub const UNDEFINED_PIXEL: i32 = -1;

/// Pixel value for pixels flagged by a module fault code (mask value > 1).
pub const OVERLOADED_PIXEL: i32 = -2;

/// Digits in the zero-padded output frame number.
pub const FRAME_NUMBER_DIGITS: usize = 6;

/// Output record file extension.
pub const OUTPUT_EXTENSION: &str = "cbf";

/// Bytes of padding appended after the binary section.
pub const CBF_PADDING: usize = 4095;
