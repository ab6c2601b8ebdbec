//! Packed-pixel to planar float conversion.
//!
//! Input words carry red in bits 23..16, green in 15..8 and blue in 7..0.
//! The top byte is ignored.


use std::collections::TryReserveError;

use rayon::prelude::*;

use crate::common::Buffer2;

/// Color channel index into a [`PlanarImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Bit offset of this channel within a packed pixel word.
    #[inline]
    pub fn shift(self) -> u32 {
        match self {
            Channel::Red => 16,
            Channel::Green => 8,
            Channel::Blue => 0,
        }
    }
}

/// Three single-channel float planes of equal size.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarImage {
    pub planes: [Buffer2<f32>; 3],
}

impl PlanarImage {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self {
            planes: std::array::from_fn(|_| Buffer2::new_default(width, height)),
        }
    }

    /// Like [`PlanarImage::new_default`], but reports allocation failure instead of aborting.
    pub fn try_new_default(width: usize, height: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            planes: [
                Buffer2::try_new_default(width, height)?,
                Buffer2::try_new_default(width, height)?,
                Buffer2::try_new_default(width, height)?,
            ],
        })
    }

    pub fn from_planes(r: Buffer2<f32>, g: Buffer2<f32>, b: Buffer2<f32>) -> Self {
        assert!(
            r.same_dimensions(&g) && r.same_dimensions(&b),
            "channel planes must share dimensions"
        );
        Self { planes: [r, g, b] }
    }

    /// Unpack a full buffer of packed words into a freshly allocated image.
    pub fn from_packed(packed: &[u32], width: usize, height: usize) -> Self {
        let mut image = Self::new_default(width, height);
        unpack_packed_rgb(packed, &mut image);
        image
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.planes[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes[0].is_empty()
    }

    #[inline]
    pub fn channel(&self, channel: Channel) -> &Buffer2<f32> {
        &self.planes[channel as usize]
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: Channel) -> &mut Buffer2<f32> {
        &mut self.planes[channel as usize]
    }

    /// RGB triple at linear pixel index `i`.
    #[inline]
    pub fn rgb(&self, i: usize) -> [f32; 3] {
        [self.planes[0][i], self.planes[1][i], self.planes[2][i]]
    }
}

#[inline]
fn unpack_channel(word: u32, channel: Channel) -> f32 {
    ((word >> channel.shift()) & 0xFF) as f32
}

/// Split packed pixel words into the three planes of `output`.
///
/// Every 8-bit value is exactly representable in f32, so reading a plane back
/// and casting to `u8` reproduces the input byte.
pub fn unpack_packed_rgb(packed: &[u32], output: &mut PlanarImage) {
    assert_eq!(
        packed.len(),
        output.len(),
        "Packed pixel count must match width * height"
    );

    for channel in Channel::ALL {
        output
            .channel_mut(channel)
            .pixels_mut()
            .par_iter_mut()
            .zip(packed.par_iter())
            .for_each(|(out, &word)| *out = unpack_channel(word, channel));
    }
}
