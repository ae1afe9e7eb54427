use tracing::{info, warn};

use crate::consts::MIN_OSCILLATION_WIDTH;
use crate::frame::AngleTable;
use crate::io::container::ContainerReader;
use crate::metadata::paths;

/// Load the per-frame omega start angles, if the container has them.
pub fn load_angle_table(reader: &dyn ContainerReader, expected_frames: u64) -> AngleTable {
    match reader.read_float_array(paths::OMEGA) {
        Some(angles) if !angles.is_empty() => {
            if (angles.len() as u64) < expected_frames {
                warn!(
                    len = angles.len(),
                    expected_frames, "Angle table is shorter than the reported frame count"
                );
            }
            info!(len = angles.len(), first = angles[0], "Loaded {}", paths::OMEGA);
            AngleTable::Present(angles)
        }
        _ => {
            warn!(
                path = paths::OMEGA,
                "Oscillation start not defined; start angles are synthesized from the oscillation width"
            );
            AngleTable::Absent
        }
    }
}

/// Per-frame start angles and angle-based output numbering.
#[derive(Clone, Debug)]
pub struct AngleResolver {
    table: AngleTable,
    oscillation_width: f64,
    renumber: bool,
}

impl AngleResolver {
    pub fn new(table: AngleTable, oscillation_width: f64, renumber: bool) -> Self {
        Self {
            table,
            oscillation_width,
            renumber,
        }
    }

    /// Start angle of 1-based frame `frame`, in degrees.
    ///
    /// With a table this is `table[frame - 1]`; frames past its end continue
    /// the sweep from `table[0]` in steps of the oscillation width. Without a
    /// table it is `oscillation_width * frame`, the behavior of firmware that
    /// did not record omega.
    pub fn angle_for(&self, frame: u64) -> f64 {
        match &self.table {
            AngleTable::Present(angles) => {
                let index = frame.saturating_sub(1) as usize;
                if let Some(&angle) = angles.get(index) {
                    return angle;
                }
                let origin = angles.first().copied().unwrap_or(0.0);
                let angle = origin + self.oscillation_width * index as f64;
                warn!(
                    frame,
                    len = angles.len(),
                    angle,
                    "Frame has no entry in the angle table; extrapolating its start angle"
                );
                angle
            }
            AngleTable::Absent => self.oscillation_width * frame as f64,
        }
    }

    /// Output frame number for `frame` starting at `start_angle`.
    ///
    /// When renumbering is enabled, the oscillation width is non-zero and an
    /// angle table is present, this is
    /// `round((start_angle - table[0]) / width) + 1`; otherwise `frame`.
    pub fn output_number(&self, frame: u64, start_angle: f64) -> i64 {
        if !self.renumbers() {
            return frame as i64;
        }
        match self.table.first() {
            Some(origin) => ((start_angle - origin) / self.oscillation_width).round() as i64 + 1,
            None => frame as i64,
        }
    }

    /// Whether output numbers follow rotation angle rather than acquisition order.
    pub fn renumbers(&self) -> bool {
        self.renumber && self.oscillation_width >= MIN_OSCILLATION_WIDTH
    }
}
