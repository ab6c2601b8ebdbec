//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dehaze::prelude::*;
//! ```

// Pipeline
pub use crate::{DehazeResult, Dehazer, Diagnostics, Stage};

// Configuration
pub use crate::{Config, Error, KernelSelection, Result};

// Inspection
pub use crate::{AtmosphericLight, Buffer2, EdgeCategory, EdgeCounts, TransmissionStats};
