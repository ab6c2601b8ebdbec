//! Saturation correction and 8-bit interleaved packing.
//!
//! Each recovered channel value `J` is mapped to
//! `(A/255)^beta * (J/255)^(1 - beta) * 255`, which pulls the output toward the
//! atmospheric light and restores saturation lost to the haze.

use rayon::prelude::*;

use crate::constants::NORMALIZED_LIGHT_MIN;
use crate::dark_channel::AtmosphericLight;
use crate::planar::PlanarImage;

/// Per-run saturation curve with the light-dependent factor precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationCorrector {
    light_beta: [f32; 3],
    one_minus_beta: f32,
}

impl SaturationCorrector {
    pub fn new(light: &AtmosphericLight, beta: f32) -> Self {
        Self {
            light_beta: light
                .rgb
                .map(|a| (a / 255.0).clamp(NORMALIZED_LIGHT_MIN, 1.0).powf(beta)),
            one_minus_beta: 1.0 - beta,
        }
    }

    /// Correct one channel value and round it to a byte.
    #[inline]
    pub fn correct(&self, radiance: f32, channel: usize) -> u8 {
        let normalized = (radiance / 255.0).clamp(0.0, 1.0);
        let corrected = self.light_beta[channel] * normalized.powf(self.one_minus_beta);
        ((corrected * 255.0).clamp(0.0, 255.0) + 0.5) as u8
    }
}

/// Correct every pixel of `radiance` and write interleaved `R, G, B` bytes to `output`.
pub fn correct_and_pack(
    radiance: &PlanarImage,
    light: &AtmosphericLight,
    beta: f32,
    output: &mut [u8],
) {
    assert_eq!(
        output.len(),
        radiance.len() * 3,
        "Output buffer must hold 3 bytes per pixel"
    );

    let corrector = SaturationCorrector::new(light, beta);
    output
        .par_chunks_mut(3)
        .enumerate()
        .for_each(|(i, rgb)| {
            for (c, byte) in rgb.iter_mut().enumerate() {
                *byte = corrector.correct(radiance.planes[c][i], c);
            }
        });
}
