//! 3x3 neighborhood filters with reflective boundary extension.
//!
//! Every filter samples the same window: offsets -1..=1 on both axes, with
//! out-of-range coordinates mirrored by [`reflect_coord`]. Output pixels depend
//! only on their own input window, so rows are filled in parallel.


use rayon::prelude::*;

use crate::common::{reflect_coord, Buffer2};
use crate::constants::ROWS_PER_CHUNK;

/// 3x3 window in row-major order: index 4 is the center pixel.
pub type Window3x3 = [f32; 9];

/// Fill `output` row by row in parallel chunks.
///
/// `f(y, row)` receives the row index and that row's output slice.
pub(crate) fn par_rows<T, F>(output: &mut [T], width: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    output
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, row) in chunk.chunks_mut(width).enumerate() {
                f(y_start + local_y, row);
            }
        });
}

/// Gather the reflective 3x3 neighborhood around `(x, y)`.
#[inline]
pub fn neighborhood_3x3(plane: &Buffer2<f32>, x: usize, y: usize) -> Window3x3 {
    let width = plane.width();
    let height = plane.height();
    let cols = [
        reflect_coord(x as isize - 1, width),
        x,
        reflect_coord(x as isize + 1, width),
    ];
    let rows = [
        reflect_coord(y as isize - 1, height),
        y,
        reflect_coord(y as isize + 1, height),
    ];

    let mut window = [0.0f32; 9];
    for (r, &row) in rows.iter().enumerate() {
        let offset = row * width;
        for (c, &col) in cols.iter().enumerate() {
            window[r * 3 + c] = plane[offset + col];
        }
    }
    window
}

/// 3x3 minimum filter (morphological erosion).
pub fn min_filter_3x3(input: &Buffer2<f32>, output: &mut Buffer2<f32>) {
    assert!(input.same_dimensions(output), "Filter dimensions mismatch");

    let width = input.width();
    par_rows(output.pixels_mut(), width, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let window = neighborhood_3x3(input, x, y);
            *out = window.iter().copied().fold(window[4], f32::min);
        }
    });
}

/// Convolve with a 3x3 kernel given in row-major order.
///
/// Products are accumulated in kernel order starting from zero, so the result
/// is deterministic regardless of how rows are scheduled.
pub fn convolve_3x3(input: &Buffer2<f32>, kernel: &Window3x3, output: &mut Buffer2<f32>) {
    assert!(input.same_dimensions(output), "Filter dimensions mismatch");

    let width = input.width();
    par_rows(output.pixels_mut(), width, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let window = neighborhood_3x3(input, x, y);
            let mut sum = 0.0f32;
            for (&value, &weight) in window.iter().zip(kernel.iter()) {
                sum += value * weight;
            }
            *out = sum;
        }
    });
}
