use tracing::info;

use crate::angle::{load_angle_table, AngleResolver};
use crate::block::BlockIndex;
use crate::classify::load_pixel_mask;
use crate::error::Result;
use crate::frame::PixelMask;
use crate::io::container::ContainerReader;
use crate::metadata::DetectorMetadata;

/// Everything resolved once per run and shared read-only by the workers.
#[derive(Clone, Debug)]
pub struct ConversionPlan {
    pub metadata: DetectorMetadata,
    pub angles: AngleResolver,
    pub mask: PixelMask,
    pub blocks: BlockIndex,
}

impl ConversionPlan {
    /// Resolve metadata, load the angle table and pixel mask, and probe the
    /// block layout.
    pub fn analyze(reader: &dyn ContainerReader, renumber: bool) -> Result<Self> {
        let metadata = DetectorMetadata::resolve(reader)?;
        let table = load_angle_table(reader, metadata.total_frames());
        let angles = AngleResolver::new(table, metadata.oscillation_width, renumber);
        if !renumber {
            info!("Renumbering based on angle disabled");
        }
        let mask = load_pixel_mask(reader, metadata.pixel_count(), metadata.error_value);
        let blocks = BlockIndex::detect(reader)?;
        info!("File analysis completed");
        Ok(Self {
            metadata,
            angles,
            mask,
            blocks,
        })
    }
}
