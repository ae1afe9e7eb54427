use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::encode::encode;
use crate::error::Result;
use crate::frame::RawFrame;
use crate::io::container::ContainerReader;

use super::plan::ConversionPlan;
use super::types::ConvertedFrame;

/// Convert one frame end to end. Every buffer is owned by this call.
pub(super) fn convert_frame(
    reader: &dyn ContainerReader,
    plan: &ConversionPlan,
    prefix: &str,
    frame: u64,
) -> Result<ConvertedFrame> {
    let reported = plan.metadata.total_frames();
    if frame > reported {
        // Some firmware under-reports nimages, so the frame is still attempted.
        warn!(
            frame,
            nimages = reported,
            "Frame number is bigger than the reported frame count"
        );
    }

    let start_angle = plan.angles.angle_for(frame);
    let output_number = plan.angles.output_number(frame, start_angle);

    let address = plan.blocks.block_for(frame);
    let dataset = plan.blocks.dataset_path(&address);
    debug!(frame, dataset = %dataset, offset = address.offset, "Reading frame");

    let (width, height) = (plan.metadata.xpixels, plan.metadata.ypixels);
    let pixels = reader.read_frame(&dataset, address.offset, height, width)?;
    let raw = RawFrame::new(pixels, width, height);
    let classified = classify(&raw, &plan.mask, plan.metadata.error_value)?;
    drop(raw);

    let record = encode(&plan.metadata, start_angle, output_number, classified, prefix);
    let path = record.write()?;
    info!(
        frame,
        output_number,
        start_angle,
        path = %path.display(),
        "Frame converted"
    );

    Ok(ConvertedFrame {
        frame,
        output_number,
        start_angle,
        path,
    })
}
