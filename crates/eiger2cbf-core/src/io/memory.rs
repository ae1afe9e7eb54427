use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis, IxDyn};

use crate::error::{ConvertError, Result};
use crate::io::container::ContainerReader;

/// A single dataset held by [`MemoryContainer`].
#[derive(Clone, Debug)]
pub enum Node {
    Int(i64),
    Float(f64),
    Text(String),
    FloatArray(Vec<f64>),
    FlagArray(Vec<u32>),
    /// Pixel data; image blocks are rank-3 (frame, row, column).
    Pixels(ArrayD<u32>),
}

/// In-memory container keyed by absolute dataset path.
///
/// Groups are implicit: a group exists when any dataset lives below it.
/// Integer reads of float datasets truncate, matching the HDF5 type
/// conversion the on-disk reader relies on.
#[derive(Clone, Debug, Default)]
pub struct MemoryContainer {
    nodes: BTreeMap<String, Node>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, node: Node) -> &mut Self {
        self.nodes.insert(path.into(), node);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<Node> {
        self.nodes.remove(path)
    }

    pub fn with_int(mut self, path: &str, value: i64) -> Self {
        self.insert(path, Node::Int(value));
        self
    }

    pub fn with_float(mut self, path: &str, value: f64) -> Self {
        self.insert(path, Node::Float(value));
        self
    }

    pub fn with_text(mut self, path: &str, value: &str) -> Self {
        self.insert(path, Node::Text(value.to_string()));
        self
    }

    pub fn with_floats(mut self, path: &str, values: Vec<f64>) -> Self {
        self.insert(path, Node::FloatArray(values));
        self
    }

    pub fn with_flags(mut self, path: &str, values: Vec<u32>) -> Self {
        self.insert(path, Node::FlagArray(values));
        self
    }

    /// Add a pixel dataset of the given shape, filled from `data` in row-major order.
    pub fn with_pixels(mut self, path: &str, shape: &[usize], data: Vec<u32>) -> Result<Self> {
        let array = ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|e| {
            ConvertError::Container(format!("{path}: pixel data does not fit {shape:?}: {e}"))
        })?;
        self.insert(path, Node::Pixels(array));
        Ok(self)
    }

    fn node(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }
}

impl ContainerReader for MemoryContainer {
    fn exists(&self, path: &str) -> bool {
        if self.nodes.contains_key(path) {
            return true;
        }
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.nodes
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(&prefix))
    }

    fn read_int(&self, path: &str) -> Option<i64> {
        match self.node(path)? {
            Node::Int(v) => Some(*v),
            Node::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    fn read_float(&self, path: &str) -> Option<f64> {
        match self.node(path)? {
            Node::Float(v) => Some(*v),
            Node::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn read_text(&self, path: &str) -> Option<String> {
        match self.node(path)? {
            Node::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn read_float_array(&self, path: &str) -> Option<Vec<f64>> {
        match self.node(path)? {
            Node::FloatArray(v) => Some(v.clone()),
            Node::Float(v) => Some(vec![*v]),
            _ => None,
        }
    }

    fn read_flag_array(&self, path: &str) -> Option<Vec<u32>> {
        match self.node(path)? {
            Node::FlagArray(v) => Some(v.clone()),
            Node::Pixels(a) => Some(a.iter().copied().collect()),
            _ => None,
        }
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>> {
        match self.node(path) {
            Some(Node::Pixels(a)) => Ok(a.shape().to_vec()),
            Some(Node::FlagArray(v)) => Ok(vec![v.len()]),
            Some(Node::FloatArray(v)) => Ok(vec![v.len()]),
            Some(_) => Ok(Vec::new()),
            None => Err(ConvertError::Container(format!("failed to open {path}"))),
        }
    }

    fn read_frame(
        &self,
        path: &str,
        offset: usize,
        height: usize,
        width: usize,
    ) -> Result<Vec<u32>> {
        let array = match self.node(path) {
            Some(Node::Pixels(a)) => a,
            Some(_) => {
                return Err(ConvertError::Container(format!(
                    "{path} does not hold pixel data"
                )))
            }
            None => return Err(ConvertError::Container(format!("failed to open {path}"))),
        };

        let shape = array.shape();
        if shape.len() != 3 || shape[1] != height || shape[2] != width {
            return Err(ConvertError::Dimension {
                path: path.to_string(),
                found: shape.to_vec(),
                expected: format!("[*, {height}, {width}]"),
            });
        }
        if offset >= shape[0] {
            return Err(ConvertError::Container(format!(
                "{path}: frame offset {offset} beyond {} stored frames",
                shape[0]
            )));
        }

        Ok(array.index_axis(Axis(0), offset).iter().copied().collect())
    }
}
