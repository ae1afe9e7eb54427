use std::path::PathBuf;

use crate::error::ConvertError;

use super::config::FrameRange;

/// Conversion stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionStage {
    Analyzing,
    Converting,
}

impl std::fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analyzing => write!(f, "Analyzing file"),
            Self::Converting => write!(f, "Converting frames"),
        }
    }
}

/// Thread-safe progress reporting for a conversion run.
///
/// `advance` is called from worker threads in completion order, not frame
/// order. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn begin_stage(&self, _stage: ConversionStage, _total_items: Option<usize>) {}

    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_conversion` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A frame that was written successfully.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertedFrame {
    pub frame: u64,
    pub output_number: i64,
    pub start_angle: f64,
    pub path: PathBuf,
}

/// A frame that could not be converted.
#[derive(Debug)]
pub struct FrameFailure {
    pub frame: u64,
    pub error: ConvertError,
}

#[derive(Debug)]
pub(super) enum FrameOutcome {
    Converted(ConvertedFrame),
    Failed(FrameFailure),
}

/// Result of a conversion run, sorted by input frame number.
#[derive(Debug)]
pub struct ConversionSummary {
    pub range: FrameRange,
    /// Frame count reported by the detector.
    pub reported_frames: u64,
    pub converted: Vec<ConvertedFrame>,
    pub failed: Vec<FrameFailure>,
}

impl ConversionSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Frames whose output number differs from their input number.
    pub fn renumbered(&self) -> impl Iterator<Item = &ConvertedFrame> {
        self.converted
            .iter()
            .filter(|c| c.output_number != c.frame as i64)
    }
}
