use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_WORKERS;
use crate::error::{ConvertError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Master file of the dataset.
    pub input: PathBuf,
    /// Output file prefix; derived from `input` when absent.
    pub prefix: Option<String>,
    /// First frame to convert (1-based).
    pub first_frame: Option<u64>,
    /// Last frame to convert, inclusive.
    pub last_frame: Option<u64>,
    /// Number output files by rotation angle instead of acquisition order.
    pub renumber: bool,
    /// Frames converted concurrently.
    pub workers: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            prefix: None,
            first_frame: None,
            last_frame: None,
            renumber: true,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ConversionConfig {
    /// The configured prefix, or one derived from the input file name.
    pub fn output_prefix(&self) -> String {
        self.prefix
            .clone()
            .unwrap_or_else(|| derive_prefix(&self.input))
    }

    /// Inclusive frame range to convert given the detected frame count.
    ///
    /// No bounds means every detected frame; a start alone means that single
    /// frame; an end alone starts from frame 1.
    pub fn frame_range(&self, total_frames: u64) -> Result<FrameRange> {
        let (first, last) = match (self.first_frame, self.last_frame) {
            (None, None) => (1, total_frames),
            (Some(first), None) => (first, first),
            (None, Some(last)) => (1, last),
            (Some(first), Some(last)) => (first, last),
        };
        FrameRange::new(first, last)
    }
}

/// Inclusive, 1-based range of frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    pub first: u64,
    pub last: u64,
}

impl FrameRange {
    pub fn new(first: u64, last: u64) -> Result<Self> {
        if first < 1 || first > last {
            return Err(ConvertError::InvalidRange {
                from: first as i64,
                to: last as i64,
            });
        }
        Ok(Self { first, last })
    }

    pub fn len(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn frames(&self) -> std::ops::RangeInclusive<u64> {
        self.first..=self.last
    }
}

/// Output prefix for a master file: its name up to `master.`
/// (`insu6_1_master.h5` gives `insu6_1_`), or the file stem plus `_`.
pub fn derive_prefix(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(pos) = name.find("master.") {
        return name[..pos].to_string();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}_")
}
