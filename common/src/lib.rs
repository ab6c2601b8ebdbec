//! Shared building blocks: 2D buffers with reflective sampling and logging setup.

pub mod buffer2;
pub mod log_setup;

pub use buffer2::{reflect_coord, Buffer2};
