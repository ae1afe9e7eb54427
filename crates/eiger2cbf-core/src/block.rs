use tracing::info;

use crate::error::{ConvertError, Result};
use crate::frame::FrameAddress;
use crate::io::container::{join, ContainerReader};
use crate::metadata::paths;

/// Maps logical frame numbers onto the data blocks that store them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockIndex {
    /// Group holding the `data_NNNNNN` datasets.
    pub group: String,
    /// Number of the first block, 0 or 1.
    pub origin: u64,
    pub frames_per_block: usize,
}

impl BlockIndex {
    pub fn new(group: impl Into<String>, origin: u64, frames_per_block: usize) -> Result<Self> {
        if frames_per_block == 0 {
            return Err(ConvertError::Dimension {
                path: group.into(),
                found: vec![0],
                expected: "at least one frame per block".into(),
            });
        }
        Ok(Self {
            group: group.into(),
            origin,
            frames_per_block,
        })
    }

    /// Probe the container for the block layout.
    ///
    /// Blocks live under `/entry/data`, or directly under `/entry` in files
    /// without that group. Numbering starts at 0 if `data_000000` exists and
    /// at 1 otherwise; the first block's leading dimension is the number of
    /// frames per block.
    pub fn detect(reader: &dyn ContainerReader) -> Result<Self> {
        if !reader.exists(paths::ENTRY) {
            return Err(ConvertError::Container(format!(
                "{} does not exist",
                paths::ENTRY
            )));
        }
        let group = if reader.exists(paths::ENTRY_DATA) {
            paths::ENTRY_DATA
        } else {
            paths::ENTRY
        };

        let origin = if reader.exists(&join(group, "data_000000")) {
            0
        } else {
            1
        };
        info!(group, origin, "This dataset starts from data_{:06}", origin);

        let first = join(group, &FrameAddress { block: origin, offset: 0 }.block_name());
        let shape = reader.shape(&first)?;
        if shape.len() != 3 {
            return Err(ConvertError::Dimension {
                path: first,
                found: shape,
                expected: "rank 3 (frame, row, column)".into(),
            });
        }
        info!(frames_per_block = shape[0], "Images per data block");

        Self::new(group, origin, shape[0])
    }

    /// Address of 1-based frame number `frame`.
    pub fn block_for(&self, frame: u64) -> FrameAddress {
        debug_assert!(frame >= 1, "frame numbers are 1-based");
        let index = frame - 1;
        let per_block = self.frames_per_block as u64;
        FrameAddress {
            block: self.origin + index / per_block,
            offset: (index % per_block) as usize,
        }
    }

    /// Full dataset path of the block holding `address`.
    pub fn dataset_path(&self, address: &FrameAddress) -> String {
        join(&self.group, &address.block_name())
    }
}
