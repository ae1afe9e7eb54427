mod detector;
pub mod fields;
pub mod paths;
mod resolver;

pub use detector::{error_value_for, DetectorMetadata};
pub use resolver::{Candidate, FieldSpec, FieldValue, Resolved};
