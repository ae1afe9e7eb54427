use ndarray::ArrayView2;

use crate::error::{ConvertError, Result};

/// Physical location of one frame: which data block and which slice within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameAddress {
    pub block: u64,
    pub offset: usize,
}

impl FrameAddress {
    /// Dataset name of the block holding this frame, e.g. `data_000001`.
    pub fn block_name(&self) -> String {
        format!("data_{:06}", self.block)
    }
}

/// One detector exposure as read from its storage block.
/// Pixels are row-major, shape = (height, width).
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub data: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl RawFrame {
    pub fn new(data: Vec<u32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }
}

/// Signed pixel buffer after mask and saturation classification.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedFrame {
    pub data: Vec<i32>,
    pub width: usize,
    pub height: usize,
}

impl ClassifiedFrame {
    pub fn view(&self) -> ArrayView2<'_, i32> {
        ArrayView2::from_shape((self.height, self.width), &self.data)
            .expect("classified frame length matches its dimensions")
    }
}

/// Per-frame oscillation start angles (degrees), indexed by frame number - 1.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AngleTable {
    #[default]
    Absent,
    Present(Vec<f64>),
}

impl AngleTable {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Angle of the first physical frame, the origin for renumbering.
    pub fn first(&self) -> Option<f64> {
        match self {
            Self::Present(angles) => angles.first().copied(),
            Self::Absent => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Present(angles) => angles.len(),
            Self::Absent => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detector-supplied per-pixel flags.
///
/// A flag of 1 marks a dead or gap pixel; values above 1 are module fault
/// codes (2, 4, 8, 16).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PixelMask {
    #[default]
    Absent,
    Present(Vec<u32>),
}

impl PixelMask {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn flags(&self) -> Option<&[u32]> {
        match self {
            Self::Present(flags) => Some(flags),
            Self::Absent => None,
        }
    }
}

/// Allocate a buffer of `len` copies of `fill`, reporting failure instead of aborting.
pub(crate) fn try_alloc<T: Clone>(what: &'static str, len: usize, fill: T) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ConvertError::Allocation {
            what,
            elements: len,
        })?;
    buf.resize(len, fill);
    Ok(buf)
}
