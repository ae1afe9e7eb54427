pub mod angle;
pub mod block;
pub mod classify;
pub mod consts;
pub mod encode;
pub mod error;
pub mod frame;
pub mod io;
pub mod metadata;
pub mod pipeline;
