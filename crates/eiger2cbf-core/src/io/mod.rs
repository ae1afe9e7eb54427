pub mod byte_offset;
pub mod cbf;
pub mod container;
#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod memory;
