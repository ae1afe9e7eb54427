use crate::error::Result;

/// Read access to a hierarchical detector container.
///
/// Scalar and array reads return `None` when the path is absent or holds a
/// value of an incompatible type; callers decide on the fallback. Frame reads
/// are independent per call and must be safe to issue from several worker
/// threads at once.
pub trait ContainerReader: Send + Sync {
    /// Whether a group or dataset exists at `path`.
    fn exists(&self, path: &str) -> bool;

    fn read_int(&self, path: &str) -> Option<i64>;

    fn read_float(&self, path: &str) -> Option<f64>;

    fn read_text(&self, path: &str) -> Option<String>;

    /// Read a whole numeric dataset as a flat sequence of floats.
    fn read_float_array(&self, path: &str) -> Option<Vec<f64>>;

    /// Read a whole integer dataset as a flat sequence of unsigned flags.
    fn read_flag_array(&self, path: &str) -> Option<Vec<u32>>;

    /// Dimensions of the dataset at `path`.
    fn shape(&self, path: &str) -> Result<Vec<usize>>;

    /// Read the `offset`-th slice of a rank-3 (frame, row, column) dataset.
    ///
    /// The returned buffer is row-major and holds exactly `height * width` pixels.
    fn read_frame(&self, path: &str, offset: usize, height: usize, width: usize)
        -> Result<Vec<u32>>;
}

/// Join a group path and a child name.
pub fn join(group: &str, name: &str) -> String {
    format!("{}/{}", group.trim_end_matches('/'), name)
}
