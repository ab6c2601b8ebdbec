//! Synthetic images and test setup shared by the unit tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::Buffer2;
use crate::planar::PlanarImage;

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Pack an 8-bit RGB triple into a pixel word (top byte left zero).
#[inline]
pub fn pack_rgb([r, g, b]: [u8; 3]) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Packed words for an image whose every pixel is `rgb`.
pub fn uniform_packed(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u32> {
    vec![pack_rgb(rgb); width * height]
}

/// Packed words generated per pixel by `f(x, y)`.
pub fn packed_from_fn<F>(width: usize, height: usize, f: F) -> Vec<u32>
where
    F: Fn(usize, usize) -> [u8; 3],
{
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| pack_rgb(f(x, y)))
        .collect()
}

/// Planar image generated per pixel by `f(x, y)`.
pub fn planar_from_fn<F>(width: usize, height: usize, f: F) -> PlanarImage
where
    F: Fn(usize, usize) -> [f32; 3],
{
    let mut image = PlanarImage::new_default(width, height);
    for y in 0..height {
        for x in 0..width {
            let rgb = f(x, y);
            for (plane, value) in image.planes.iter_mut().zip(rgb) {
                plane[(x, y)] = value;
            }
        }
    }
    image
}

/// Planar image with every channel holding the same 3x3 grid (row-major).
pub fn gray_3x3(grid: [f32; 9]) -> PlanarImage {
    let plane = Buffer2::new(3, 3, grid.to_vec());
    PlanarImage::from_planes(plane.clone(), plane.clone(), plane)
}

/// Seeded random packed image; the top byte is randomized too.
pub fn random_packed(width: usize, height: usize, seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height).map(|_| rng.random::<u32>()).collect()
}

/// Forward haze model `I = J * t + A * (1 - t)` on one 8-bit channel value.
#[inline]
pub fn haze(j: f32, t: f32, a: f32) -> f32 {
    j * t + a * (1.0 - t)
}
