//! Atmospheric-light estimation from the dark channel.
//!
//! Each channel is eroded with a 3x3 minimum filter; the per-pixel minimum
//! across the three eroded planes is the "dark channel prime". The brightest
//! dark-channel pixel marks the haziest spot, and its original color scaled
//! by sigma becomes the atmospheric light.

#[cfg(test)]
mod tests;

use rayon::prelude::*;

use crate::common::Buffer2;
use crate::constants::{ATMOSPHERIC_LIGHT_MAX, ATMOSPHERIC_LIGHT_MIN};
use crate::filter::min_filter_3x3;
use crate::planar::PlanarImage;

/// Estimated atmospheric light and the pixel it was taken from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericLight {
    /// RGB components, each in `[1e-3, 255]`.
    pub rgb: [f32; 3],
    pub row: usize,
    pub col: usize,
}

impl AtmosphericLight {
    /// Build from a raw color: `color * sigma`, clamped per component.
    pub fn from_color(color: [f32; 3], sigma: f32, row: usize, col: usize) -> Self {
        Self {
            rgb: color.map(|c| (c * sigma).clamp(ATMOSPHERIC_LIGHT_MIN, ATMOSPHERIC_LIGHT_MAX)),
            row,
            col,
        }
    }
}

/// Dark channel prime at pixel `i`: the minimum of the three eroded planes.
#[inline]
pub fn dark_channel_prime(eroded: &PlanarImage, i: usize) -> f32 {
    let [r, g, b] = eroded.rgb(i);
    min3(r, g, b)
}

/// Index and value of the largest element; the first occurrence wins ties.
///
/// Returns `(0, -inf)` for an empty sequence.
pub fn argmax_first<I>(values: I) -> (usize, f32)
where
    I: IntoIterator<Item = f32>,
{
    let mut max_val = f32::NEG_INFINITY;
    let mut max_idx = 0;
    for (i, v) in values.into_iter().enumerate() {
        if v > max_val {
            max_val = v;
            max_idx = i;
        }
    }
    (max_idx, max_val)
}

/// Fill `output` with the dark channel prime of every pixel of `eroded`.
pub fn dark_channel_map(eroded: &PlanarImage, output: &mut Buffer2<f32>) {
    assert!(
        eroded.planes[0].same_dimensions(output),
        "Dark channel dimensions mismatch"
    );

    output
        .pixels_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, out)| *out = dark_channel_prime(eroded, i));
}

/// Estimate the atmospheric light of `image`.
///
/// `eroded` receives the three min-filtered planes and is reused as scratch.
/// `dark_channel` keeps the per-pixel dark channel prime for inspection.
pub fn estimate_atmospheric_light(
    image: &PlanarImage,
    sigma: f32,
    eroded: &mut PlanarImage,
    dark_channel: &mut Buffer2<f32>,
) -> AtmosphericLight {
    for (input, output) in image.planes.iter().zip(eroded.planes.iter_mut()) {
        min_filter_3x3(input, output);
    }
    dark_channel_map(eroded, dark_channel);

    // Sequential row-major scan: the tie-break depends on visiting order.
    let (max_idx, max_val) = argmax_first(dark_channel.iter().copied());

    let width = image.width();
    let light = AtmosphericLight::from_color(
        image.rgb(max_idx),
        sigma,
        max_idx / width,
        max_idx % width,
    );

    tracing::debug!(
        "Dark channel maximum {:.1} at ({}, {})",
        max_val,
        light.row,
        light.col
    );

    light
}

#[inline]
pub(crate) fn min3(a: f32, b: f32, c: f32) -> f32 {
    let mut m = a;
    if b < m {
        m = b;
    }
    if c < m {
        m = c;
    }
    m
}
