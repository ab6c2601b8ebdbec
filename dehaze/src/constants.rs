//! Fixed image geometry and default algorithm parameters.

/// Width of the images produced by the acquisition side.
pub const IMAGE_WIDTH: usize = 512;
/// Height of the images produced by the acquisition side.
pub const IMAGE_HEIGHT: usize = 512;
/// Pixels per image.
pub const IMAGE_PIXELS: usize = IMAGE_WIDTH * IMAGE_HEIGHT;
/// Bytes in the interleaved RGB output stream.
pub const OUTPUT_BYTES: usize = IMAGE_PIXELS * 3;

/// Atmospheric-light scale (SIGMA).
pub const DEFAULT_SIGMA: f64 = 0.875;
/// Edge sensitivity (D_THRESHOLD).
pub const DEFAULT_EDGE_THRESHOLD: f64 = 80.0;
/// Transmission weight (OMEGA_PRIME).
pub const DEFAULT_OMEGA_PRIME: f64 = 0.9375;
/// Transmission floor applied during recovery (T0).
pub const DEFAULT_T0: f64 = 0.25;
/// Saturation-correction exponent (BETA).
pub const DEFAULT_BETA: f64 = 0.3;

/// Lower clamp of every atmospheric-light component.
pub const ATMOSPHERIC_LIGHT_MIN: f32 = 1e-3;
/// Upper clamp of every atmospheric-light component.
pub const ATMOSPHERIC_LIGHT_MAX: f32 = 255.0;
/// Smallest normalized atmospheric light used as a power base.
pub const NORMALIZED_LIGHT_MIN: f32 = 1e-6;

/// Rows handed to one rayon task. 8 rows of a 512-wide f32 plane is 16KB.
pub(crate) const ROWS_PER_CHUNK: usize = 8;
