use std::collections::TryReserveError;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice;

/// Row-major 2D buffer. Element `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

/// Maps a possibly out-of-range coordinate back into `0..n` by mirroring
/// around the edge sample (the edge itself is not repeated).
///
/// `-1 -> 1`, `-2 -> 2`, `n -> n - 2`, `n + 1 -> n - 3`.
/// Valid for offsets of at most `n - 1` past either edge; `n` must be >= 2.
#[inline]
pub fn reflect_coord(c: isize, n: usize) -> usize {
    debug_assert!(n >= 2, "reflection needs at least 2 samples, got {n}");
    let n = n as isize;
    let r = if c < 0 {
        -c
    } else if c >= n {
        2 * n - c - 2
    } else {
        c
    };
    debug_assert!((0..n).contains(&r), "coordinate {c} reflects outside 0..{n}");
    r as usize
}

impl<T> Buffer2<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.pixels[y * self.width + x]
    }

    /// Sample with reflective boundary extension on both axes.
    #[inline]
    pub fn get_reflect(&self, x: isize, y: isize) -> &T {
        let x = reflect_coord(x, self.width);
        let y = reflect_coord(y, self.height);
        &self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
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
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn same_dimensions<U>(&self, other: &Buffer2<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T: Default + Clone> Buffer2<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, T::default())
    }

    /// Like [`Buffer2::new_default`], but reports allocation failure instead of aborting.
    pub fn try_new_default(width: usize, height: usize) -> Result<Self, TryReserveError> {
        Self::try_new_filled(width, height, T::default())
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn try_new_filled(
        width: usize,
        height: usize,
        value: T,
    ) -> Result<Self, TryReserveError> {
        let len = width * height;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        pixels.resize(len, value);
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<T> Index<usize> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.pixels[idx]
    }
}

impl<T> IndexMut<usize> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.pixels[idx]
    }
}

impl<T> Deref for Buffer2<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl<T> DerefMut for Buffer2<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

impl<'a, T> IntoIterator for &'a Buffer2<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}
