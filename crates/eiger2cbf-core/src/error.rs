use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Container error: {0}")]
    Container(String),

    #[error("Invalid pixel grid: {xpixels}x{ypixels}")]
    InvalidDimensions { xpixels: i64, ypixels: i64 },

    #[error("Dimension of {path} is {found:?}, expected {expected}")]
    Dimension {
        path: String,
        found: Vec<usize>,
        expected: String,
    },

    #[error("Failed to allocate {what} ({elements} elements)")]
    Allocation { what: &'static str, elements: usize },

    #[error("Invalid frame range {from}..={to}")]
    InvalidRange { from: i64, to: i64 },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
