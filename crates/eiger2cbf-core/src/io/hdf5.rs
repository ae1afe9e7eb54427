//! HDF5 master-file access.
//!
//! Compressed data blocks (LZ4, bitshuffle) are decoded by HDF5 filter
//! plugins; point `HDF5_PLUGIN_PATH` at them before opening a file. The HDF5
//! library serializes its own calls, so concurrent frame reads are safe.

use std::path::Path;

use hdf5::types::{FixedAscii, FixedUnicode, H5Type, VarLenAscii, VarLenUnicode};
use hdf5::{Dataset, File};

use crate::error::{ConvertError, Result};
use crate::io::container::ContainerReader;

pub struct Hdf5Container {
    file: File,
}

impl Hdf5Container {
    /// Open a master file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ConvertError::Container(format!("failed to open {}: {e}", path.display()))
        })?;
        Ok(Self { file })
    }

    fn dataset(&self, path: &str) -> Option<Dataset> {
        if !self.exists(path) {
            return None;
        }
        self.file.dataset(path).ok()
    }

    fn first<T: H5Type + Clone>(&self, path: &str) -> Option<T> {
        self.dataset(path)?.read_raw::<T>().ok()?.into_iter().next()
    }
}

fn container_err(path: &str, e: hdf5::Error) -> ConvertError {
    ConvertError::Container(format!("{path}: {e}"))
}

impl ContainerReader for Hdf5Container {
    fn exists(&self, path: &str) -> bool {
        // Probe component by component; H5Lexists fails on missing intermediates.
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current.push('/');
            current.push_str(part);
            if !self.file.link_exists(&current) {
                return false;
            }
        }
        true
    }

    fn read_int(&self, path: &str) -> Option<i64> {
        self.first::<i64>(path)
    }

    fn read_float(&self, path: &str) -> Option<f64> {
        self.first::<f64>(path)
    }

    fn read_text(&self, path: &str) -> Option<String> {
        let ds = self.dataset(path)?;
        if let Ok(v) = ds.read_raw::<VarLenUnicode>() {
            return v.first().map(|s| s.as_str().to_string());
        }
        if let Ok(v) = ds.read_raw::<VarLenAscii>() {
            return v.first().map(|s| s.as_str().to_string());
        }
        if let Ok(v) = ds.read_raw::<FixedAscii<256>>() {
            return v.first().map(|s| s.as_str().to_string());
        }
        ds.read_raw::<FixedUnicode<256>>()
            .ok()?
            .first()
            .map(|s| s.as_str().to_string())
    }

    fn read_float_array(&self, path: &str) -> Option<Vec<f64>> {
        self.dataset(path)?.read_raw::<f64>().ok()
    }

    fn read_flag_array(&self, path: &str) -> Option<Vec<u32>> {
        self.dataset(path)?.read_raw::<u32>().ok()
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>> {
        let ds = self
            .file
            .dataset(path)
            .map_err(|e| container_err(path, e))?;
        Ok(ds.shape())
    }

    fn read_frame(
        &self,
        path: &str,
        offset: usize,
        height: usize,
        width: usize,
    ) -> Result<Vec<u32>> {
        let ds = self
            .file
            .dataset(path)
            .map_err(|e| container_err(path, e))?;
        let shape = ds.shape();
        if shape.len() != 3 || shape[1] != height || shape[2] != width {
            return Err(ConvertError::Dimension {
                path: path.to_string(),
                found: shape,
                expected: format!("[*, {height}, {width}]"),
            });
        }
        let slice = ds
            .read_slice_2d::<u32, _>((offset, .., ..))
            .map_err(|e| container_err(path, e))?;
        Ok(slice.iter().copied().collect())
    }
}
