//! Scene-radiance recovery by inverting the haze model.

use rayon::prelude::*;

use crate::common::Buffer2;
use crate::dark_channel::AtmosphericLight;
use crate::planar::PlanarImage;

/// Transmission actually divided by: `t` when it exceeds the floor, `t0` otherwise.
#[inline]
pub fn effective_transmission(t: f32, t0: f32) -> f32 {
    if t > t0 {
        t
    } else {
        t0
    }
}

/// `J = (I - A) / max(t, t0) + A` for one channel value. Not clamped.
#[inline]
pub fn recover_value(intensity: f32, light: f32, t: f32, t0: f32) -> f32 {
    (intensity - light) / effective_transmission(t, t0) + light
}

/// Recover scene radiance for every pixel and channel of `image` into `output`.
///
/// Values may fall outside `[0, 255]`; clamping is left to saturation correction.
pub fn recover_scene_radiance(
    image: &PlanarImage,
    light: &AtmosphericLight,
    transmission: &Buffer2<f32>,
    t0: f32,
    output: &mut PlanarImage,
) {
    assert!(
        image.planes[0].same_dimensions(transmission)
            && image.planes[0].same_dimensions(&output.planes[0]),
        "Recovery dimensions mismatch"
    );

    for ((input, out), &a) in image
        .planes
        .iter()
        .zip(output.planes.iter_mut())
        .zip(light.rgb.iter())
    {
        out.pixels_mut()
            .par_iter_mut()
            .zip(input.pixels().par_iter())
            .zip(transmission.pixels().par_iter())
            .for_each(|((j, &i), &t)| *j = recover_value(i, a, t, t0));
    }
}
