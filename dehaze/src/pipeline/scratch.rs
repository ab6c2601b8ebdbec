//! Working buffers for one pipeline instance.
//!
//! Every buffer is acquired up front so an allocation failure surfaces before
//! any stage runs. The arena is reused by later invocations.

use std::collections::TryReserveError;

use crate::common::Buffer2;
use crate::edge::EdgeCategory;
use crate::error::{Error, Result};
use crate::planar::PlanarImage;
use crate::transmission::KernelPlanes;

#[derive(Debug)]
pub struct Scratch {
    width: usize,
    height: usize,
    /// Unpacked input image.
    pub(crate) image: PlanarImage,
    /// Kernel outputs. The box-kernel planes double as min-filter scratch.
    pub(crate) filtered: KernelPlanes,
    /// Per-pixel dark channel prime.
    pub(crate) dark_channel: Buffer2<f32>,
    pub(crate) edges: Buffer2<EdgeCategory>,
    pub(crate) transmission: Buffer2<f32>,
    pub(crate) radiance: PlanarImage,
}

fn exhausted(buffer: &'static str) -> impl FnOnce(TryReserveError) -> Error {
    move |source| Error::ResourceExhaustion { buffer, source }
}

impl Scratch {
    /// Acquire all working buffers for a `width` x `height` image.
    pub fn try_new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            width,
            height,
            image: PlanarImage::try_new_default(width, height).map_err(exhausted("planar"))?,
            filtered: KernelPlanes::try_new_default(width, height)
                .map_err(exhausted("filtered"))?,
            dark_channel: Buffer2::try_new_default(width, height)
                .map_err(exhausted("dark channel"))?,
            edges: Buffer2::try_new_default(width, height).map_err(exhausted("edge map"))?,
            transmission: Buffer2::try_new_default(width, height)
                .map_err(exhausted("transmission"))?,
            radiance: PlanarImage::try_new_default(width, height)
                .map_err(exhausted("radiance"))?,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn matches_dimensions(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }
}
