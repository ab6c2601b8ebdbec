//! Dehaze - single-image haze removal with the dark channel prior.
//!
//! The pipeline takes a 512x512 image of packed `0x00RRGGBB` words and
//! produces the dehazed image as interleaved 8-bit RGB:
//! - Atmospheric light from the brightest eroded dark-channel pixel
//! - Edge-adaptive 3x3 smoothing to estimate the transmission map
//! - Scene recovery with a transmission floor
//! - Saturation correction toward the atmospheric light
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dehaze::{Config, Dehazer};
//!
//! let config = Config::load("dehaze.yaml")?;
//! let mut dehazer = Dehazer::from_config(config);
//! let result = dehazer.process(&packed)?;
//!
//! println!(
//!     "A = {:?}, {} diagonal edges",
//!     result.diagnostics.atmospheric_light.rgb,
//!     result.diagnostics.edge_counts.diagonal
//! );
//! ```

pub(crate) mod common;
pub mod config;
pub mod constants;
pub mod dark_channel;
pub mod edge;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod planar;
pub mod recovery;
pub mod saturation;
pub mod transmission;

#[cfg(test)]
pub mod testing;

pub mod prelude;

// ============================================================================
// Pipeline
// ============================================================================

pub use pipeline::{DehazeResult, Dehazer, Diagnostics, Scratch, Stage};

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{Config, KernelSelection};
pub use constants::{IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH, OUTPUT_BYTES};
pub use error::{Error, Result};

// ============================================================================
// Stage types
// ============================================================================

pub use crate::common::Buffer2;
pub use dark_channel::AtmosphericLight;
pub use edge::{EdgeCategory, EdgeCounts};
pub use planar::{Channel, PlanarImage};
pub use saturation::SaturationCorrector;
pub use transmission::{KernelPlanes, SmoothingKernel, TransmissionStats};
