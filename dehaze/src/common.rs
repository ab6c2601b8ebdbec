//! Shared buffer types re-exported from the workspace `common` crate.

pub use common::buffer2::{reflect_coord, Buffer2};
