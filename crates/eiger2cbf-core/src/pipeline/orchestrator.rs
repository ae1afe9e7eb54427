use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::dispatcher::{self, Dispatch};
use tracing::{error, info};

use crate::error::{ConvertError, Result};
use crate::io::container::ContainerReader;

use super::config::{ConversionConfig, FrameRange};
use super::plan::ConversionPlan;
use super::types::{
    ConversionStage, ConversionSummary, FrameFailure, FrameOutcome, NoOpReporter,
    ProgressReporter,
};
use super::worker::convert_frame;

/// Runs per-frame conversions on a bounded worker pool.
///
/// A failed frame is logged and recorded; it never stops the other frames.
/// Only allocation failure aborts the run.
pub struct ConversionScheduler<'a> {
    reader: &'a dyn ContainerReader,
    plan: &'a ConversionPlan,
    prefix: String,
    workers: usize,
}

impl<'a> ConversionScheduler<'a> {
    pub fn new(
        reader: &'a dyn ContainerReader,
        plan: &'a ConversionPlan,
        prefix: impl Into<String>,
        workers: usize,
    ) -> Self {
        Self {
            reader,
            plan,
            prefix: prefix.into(),
            workers: workers.max(1),
        }
    }

    /// Convert every frame in `range`.
    pub fn run(
        &self,
        range: FrameRange,
        reporter: &Arc<dyn ProgressReporter>,
    ) -> Result<ConversionSummary> {
        let reported = self.plan.metadata.total_frames();
        if range.last > reported {
            info!(
                last = range.last,
                nimages = reported,
                "Requested range extends past the reported frame count"
            );
        }
        info!(
            first = range.first,
            last = range.last,
            workers = self.workers,
            "Going to convert frames"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| ConvertError::WorkerPool(e.to_string()))?;

        let total = range.len();
        reporter.begin_stage(ConversionStage::Converting, Some(total));
        let done = AtomicUsize::new(0);
        // Pool threads log through the caller's subscriber.
        let dispatch: Dispatch = dispatcher::get_default(|d| d.clone());

        let outcomes: Vec<FrameOutcome> = pool.install(|| {
            range
                .frames()
                .into_par_iter()
                .map(|frame| {
                    let outcome = dispatcher::with_default(&dispatch, || {
                        self.convert_isolated(frame, total, range.first)
                    });
                    let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
                    reporter.advance(completed);
                    outcome
                })
                .collect::<Result<Vec<FrameOutcome>>>()
        })?;
        reporter.finish_stage();

        let mut summary = ConversionSummary {
            range,
            reported_frames: reported,
            converted: Vec::new(),
            failed: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                FrameOutcome::Converted(c) => summary.converted.push(c),
                FrameOutcome::Failed(f) => summary.failed.push(f),
            }
        }
        summary.converted.sort_by_key(|c| c.frame);
        summary.failed.sort_by_key(|f| f.frame);

        info!(
            converted = summary.converted.len(),
            failed = summary.failed.len(),
            "All done"
        );
        Ok(summary)
    }

    /// Convert one frame, turning every error except allocation failure into
    /// a recorded failure.
    fn convert_isolated(&self, frame: u64, total: usize, first: u64) -> Result<FrameOutcome> {
        info!(
            frame,
            "Converting frame {} ({} / {})",
            frame,
            frame - first + 1,
            total
        );
        match convert_frame(self.reader, self.plan, &self.prefix, frame) {
            Ok(converted) => Ok(FrameOutcome::Converted(converted)),
            Err(e @ ConvertError::Allocation { .. }) => Err(e),
            Err(e) => {
                error!(frame, error = %e, "Frame conversion failed");
                Ok(FrameOutcome::Failed(FrameFailure { frame, error: e }))
            }
        }
    }
}

/// Analyze the container and convert the configured frame range, reporting
/// progress through `reporter`.
pub fn run_conversion_reported(
    reader: &dyn ContainerReader,
    config: &ConversionConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<ConversionSummary> {
    reporter.begin_stage(ConversionStage::Analyzing, None);
    let plan = ConversionPlan::analyze(reader, config.renumber)?;
    reporter.finish_stage();

    let range = config.frame_range(plan.metadata.total_frames())?;
    let prefix = config.output_prefix();
    info!(prefix = %prefix, "Output prefix");

    ConversionScheduler::new(reader, &plan, prefix, config.workers).run(range, &reporter)
}

/// Analyze the container and convert the configured frame range.
pub fn run_conversion(
    reader: &dyn ContainerReader,
    config: &ConversionConfig,
) -> Result<ConversionSummary> {
    let reporter: Arc<dyn ProgressReporter> = Arc::new(NoOpReporter);
    run_conversion_reported(reader, config, reporter)
}
