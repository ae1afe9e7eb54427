pub mod config;
mod orchestrator;
mod plan;
mod types;
mod worker;

pub use orchestrator::{run_conversion, run_conversion_reported, ConversionScheduler};
pub use plan::ConversionPlan;
pub use types::{
    ConversionStage, ConversionSummary, ConvertedFrame, FrameFailure, ProgressReporter,
};
