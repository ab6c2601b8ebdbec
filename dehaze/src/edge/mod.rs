//! Per-pixel edge classification.
//!
//! Opposite neighbor pairs in the 3x3 window are compared per channel:
//!
//! ```text
//!   0 1 2     diagonal-1 (backslash): 0 vs 8
//!   3 . 5     diagonal-2 (slash):     2 vs 6
//!   6 7 8     axis: 1 vs 7 (vertical), 3 vs 5 (horizontal)
//! ```
//!
//! Each score is the largest absolute difference over the three channels.
//! Diagonal edges take priority over axis edges.


use crate::common::Buffer2;
use crate::filter::{neighborhood_3x3, par_rows, Window3x3};
use crate::planar::PlanarImage;
use crate::transmission::SmoothingKernel;

/// Discrete local-gradient class of a pixel. Stored as one byte per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EdgeCategory {
    #[default]
    Smooth = 0,
    AxisEdge = 1,
    DiagonalEdge = 2,
}

impl EdgeCategory {
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Smoothing kernel used for pixels of this category.
    #[inline]
    pub fn kernel(self) -> SmoothingKernel {
        match self {
            EdgeCategory::Smooth => SmoothingKernel::Box,
            EdgeCategory::AxisEdge => SmoothingKernel::Center,
            EdgeCategory::DiagonalEdge => SmoothingKernel::Corner,
        }
    }
}

/// Number of pixels in each edge category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeCounts {
    pub smooth: usize,
    pub axis: usize,
    pub diagonal: usize,
}

impl EdgeCounts {
    pub fn from_map(map: &Buffer2<EdgeCategory>) -> Self {
        let mut counts = Self::default();
        for &category in map.iter() {
            match category {
                EdgeCategory::Smooth => counts.smooth += 1,
                EdgeCategory::AxisEdge => counts.axis += 1,
                EdgeCategory::DiagonalEdge => counts.diagonal += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.smooth + self.axis + self.diagonal
    }
}

/// Difference scores of one pixel, already maximized over channels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeScores {
    pub diagonal_1: f32,
    pub diagonal_2: f32,
    pub axis: f32,
}

impl EdgeScores {
    /// Scores for one pixel from its per-channel windows.
    pub fn from_windows(windows: &[Window3x3; 3]) -> Self {
        let max_diff = |a: usize, b: usize| {
            windows
                .iter()
                .map(|w| (w[a] - w[b]).abs())
                .fold(0.0f32, f32::max)
        };
        Self {
            diagonal_1: max_diff(0, 8),
            diagonal_2: max_diff(2, 6),
            axis: max_diff(1, 7).max(max_diff(3, 5)),
        }
    }

    /// Apply the threshold; a difference equal to the threshold counts as an edge.
    #[inline]
    pub fn classify(&self, threshold: f32) -> EdgeCategory {
        if self.diagonal_1 >= threshold || self.diagonal_2 >= threshold {
            EdgeCategory::DiagonalEdge
        } else if self.axis >= threshold {
            EdgeCategory::AxisEdge
        } else {
            EdgeCategory::Smooth
        }
    }
}

/// Classify one pixel from its three per-channel 3x3 windows.
#[inline]
pub fn classify_neighborhood(windows: &[Window3x3; 3], threshold: f32) -> EdgeCategory {
    EdgeScores::from_windows(windows).classify(threshold)
}

/// Classify every pixel of `image` into `output`.
pub fn classify_edges(image: &PlanarImage, threshold: f32, output: &mut Buffer2<EdgeCategory>) {
    assert!(
        image.planes[0].same_dimensions(output),
        "Edge map dimensions mismatch"
    );

    let width = image.width();
    par_rows(output.pixels_mut(), width, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let windows = image
                .planes
                .each_ref()
                .map(|plane| neighborhood_3x3(plane, x, y));
            *out = classify_neighborhood(&windows, threshold);
        }
    });
}
