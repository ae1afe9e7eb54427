#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use eiger2cbf_core::io::memory::MemoryContainer;
use eiger2cbf_core::metadata::paths;
use tracing_subscriber::fmt::MakeWriter;

pub const WIDTH: usize = 6;
pub const HEIGHT: usize = 4;

/// Metadata as written by firmware >= 1.7, without image data.
pub fn firmware_1_8_metadata(width: usize, height: usize, nimages: i64) -> MemoryContainer {
    MemoryContainer::new()
        .with_int(paths::NIMAGES, nimages)
        .with_int(paths::NTRIGGER, 1)
        .with_text(paths::DESCRIPTION, "Dectris EIGER 9M")
        .with_text(paths::DETECTOR_NUMBER, "E-18-0102")
        .with_text(paths::SOFTWARE_VERSION, "1.8.0")
        .with_int(paths::BIT_DEPTH, 16)
        .with_int(paths::SATURATION_VALUE, 12440)
        .with_float(paths::SENSOR_THICKNESS, 450e-6)
        .with_int(paths::X_PIXELS, width as i64)
        .with_int(paths::Y_PIXELS, height as i64)
        .with_float(paths::BEAM_CENTER_X, 3.0)
        .with_float(paths::BEAM_CENTER_Y, 2.0)
        .with_float(paths::COUNT_TIME, 0.099)
        .with_float(paths::FRAME_TIME, 0.1)
        .with_float(paths::X_PIXEL_SIZE, 75e-6)
        .with_float(paths::DISTANCE, 0.2)
        .with_float(paths::SAMPLE_INCIDENT_WAVELENGTH, 0.9793)
        .with_float(paths::OMEGA_RANGE_AVERAGE, 0.1)
}

/// Deterministic frame content; `seed` distinguishes frames.
pub fn frame_pixels(width: usize, height: usize, seed: u32) -> Vec<u32> {
    (0..(width * height) as u32)
        .map(|i| (i * 7 + seed * 13) % 1000)
        .collect()
}

/// Store `frames` in rank-3 blocks of `per_block` frames under `group`,
/// numbering blocks from `origin`. The last block may be partial.
pub fn with_blocks(
    mut container: MemoryContainer,
    group: &str,
    origin: u64,
    per_block: usize,
    frames: &[Vec<u32>],
    width: usize,
    height: usize,
) -> MemoryContainer {
    for (i, chunk) in frames.chunks(per_block).enumerate() {
        let data: Vec<u32> = chunk.iter().flatten().copied().collect();
        let path = format!("{}/data_{:06}", group, origin + i as u64);
        container = container
            .with_pixels(&path, &[chunk.len(), height, width], data)
            .expect("block shape matches data");
    }
    container
}

/// A complete firmware 1.8 dataset with `count` frames, an omega table
/// starting at `omega_start` and blocks of `per_block` frames from data_000001.
pub fn dataset(count: usize, per_block: usize, omega_start: f64) -> MemoryContainer {
    let frames: Vec<Vec<u32>> = (0..count)
        .map(|i| frame_pixels(WIDTH, HEIGHT, i as u32))
        .collect();
    let omega: Vec<f64> = (0..count).map(|i| omega_start + 0.1 * i as f64).collect();
    let container = firmware_1_8_metadata(WIDTH, HEIGHT, count as i64)
        .with_floats(paths::OMEGA, omega);
    with_blocks(container, paths::ENTRY_DATA, 1, per_block, &frames, WIDTH, HEIGHT)
}

/// Shared buffer collecting formatted log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber scoped to this thread and return its log lines.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let lines = buffer.contents().lines().map(str::to_string).collect();
    (out, lines)
}

/// Warning lines containing `message`.
pub fn warnings<'a>(lines: &'a [String], message: &str) -> Vec<&'a String> {
    lines
        .iter()
        .filter(|l| l.contains("WARN") && l.contains(message))
        .collect()
}
