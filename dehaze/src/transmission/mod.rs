//! Edge-adaptive transmission estimation.
//!
//! Three 3x3 smoothing kernels are run over every channel. Each pixel then
//! takes the filtered color of the kernel its edge category maps to, divides
//! it by the atmospheric light, and converts the smallest ratio into a
//! transmission value `t = clamp(1 - omega' * min_ratio, 0, 1)`.

#[cfg(test)]
mod tests;

use std::collections::TryReserveError;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::Buffer2;
use crate::config::{Config, KernelSelection};
use crate::dark_channel::{min3, AtmosphericLight};
use crate::edge::EdgeCategory;
use crate::filter::{convolve_3x3, Window3x3};
use crate::planar::PlanarImage;

/// Fixed 3x3 smoothing kernels, each normalized to unit sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingKernel {
    /// Uniform 3x3 average.
    Box,
    /// `1 2 1 / 2 4 2 / 1 2 1` over 16.
    Center,
    /// `2 1 2 / 1 4 1 / 2 1 2` over 16.
    Corner,
}

impl SmoothingKernel {
    pub const ALL: [SmoothingKernel; 3] = [
        SmoothingKernel::Box,
        SmoothingKernel::Center,
        SmoothingKernel::Corner,
    ];

    #[inline]
    fn slot(self) -> usize {
        match self {
            SmoothingKernel::Box => 0,
            SmoothingKernel::Center => 1,
            SmoothingKernel::Corner => 2,
        }
    }

    /// Row-major weights. Each integer weight is divided by the kernel total in f32.
    pub fn weights(self) -> Window3x3 {
        let (raw, total): ([f32; 9], f32) = match self {
            SmoothingKernel::Box => ([1.0; 9], 9.0),
            SmoothingKernel::Center => ([1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0], 16.0),
            SmoothingKernel::Corner => ([2.0, 1.0, 2.0, 1.0, 4.0, 1.0, 2.0, 1.0, 2.0], 16.0),
        };
        raw.map(|w| w / total)
    }
}

/// One filtered [`PlanarImage`] per smoothing kernel.
#[derive(Debug, Clone)]
pub struct KernelPlanes {
    planes: [PlanarImage; 3],
}

impl KernelPlanes {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self {
            planes: std::array::from_fn(|_| PlanarImage::new_default(width, height)),
        }
    }

    pub fn try_new_default(width: usize, height: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            planes: [
                PlanarImage::try_new_default(width, height)?,
                PlanarImage::try_new_default(width, height)?,
                PlanarImage::try_new_default(width, height)?,
            ],
        })
    }

    #[inline]
    pub fn get(&self, kernel: SmoothingKernel) -> &PlanarImage {
        &self.planes[kernel.slot()]
    }

    #[inline]
    pub fn get_mut(&mut self, kernel: SmoothingKernel) -> &mut PlanarImage {
        &mut self.planes[kernel.slot()]
    }

    /// Convolve every channel of `image` with `kernel`.
    pub fn compute(&mut self, image: &PlanarImage, kernel: SmoothingKernel) {
        let weights = kernel.weights();
        let target = self.get_mut(kernel);
        for (input, output) in image.planes.iter().zip(target.planes.iter_mut()) {
            convolve_3x3(input, &weights, output);
        }
    }
}

/// Summary of a transmission map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransmissionStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Pixels whose transmission is below the recovery floor.
    pub below_floor: usize,
}

impl TransmissionStats {
    pub fn from_map(map: &Buffer2<f32>, t0: f32) -> Self {
        if map.is_empty() {
            return Self::default();
        }

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut below_floor = 0;
        for &t in map.iter() {
            min = min.min(t);
            max = max.max(t);
            sum += t as f64;
            if t < t0 {
                below_floor += 1;
            }
        }

        Self {
            min,
            max,
            mean: (sum / map.len() as f64) as f32,
            below_floor,
        }
    }
}

/// Transmission from one filtered color: `clamp(1 - omega' * min_c(P_c / A_c), 0, 1)`.
#[inline]
pub fn transmission_from_filtered(filtered: [f32; 3], light: &[f32; 3], omega_prime: f32) -> f32 {
    let min_ratio = min3(
        filtered[0] / light[0],
        filtered[1] / light[1],
        filtered[2] / light[2],
    );
    (1.0 - omega_prime * min_ratio).clamp(0.0, 1.0)
}

/// Estimate the transmission map of `image` into `output`.
///
/// `filtered` holds the kernel outputs; with a fixed kernel only that kernel's
/// planes are computed.
pub fn estimate_transmission(
    image: &PlanarImage,
    light: &AtmosphericLight,
    edges: &Buffer2<EdgeCategory>,
    config: &Config,
    filtered: &mut KernelPlanes,
    output: &mut Buffer2<f32>,
) {
    assert!(
        image.planes[0].same_dimensions(output) && edges.same_dimensions(output),
        "Transmission dimensions mismatch"
    );

    match config.kernel_selection {
        KernelSelection::EdgeAdaptive => {
            for kernel in SmoothingKernel::ALL {
                filtered.compute(image, kernel);
            }
        }
        KernelSelection::Fixed(kernel) => filtered.compute(image, kernel),
    }

    let filtered = &*filtered;
    let rgb = light.rgb;
    let omega_prime = config.omega_prime as f32;
    let selection = config.kernel_selection;

    output
        .pixels_mut()
        .par_iter_mut()
        .zip(edges.pixels().par_iter())
        .enumerate()
        .for_each(|(i, (t, &category))| {
            let kernel = match selection {
                KernelSelection::EdgeAdaptive => category.kernel(),
                KernelSelection::Fixed(kernel) => kernel,
            };
            *t = transmission_from_filtered(filtered.get(kernel).rgb(i), &rgb, omega_prime);
        });
}
