//! The dehazing pipeline: six strictly sequential stages over one image.
//!
//! ```text
//! packed u32 -> [1] unpack -> [2] atmospheric light -> [3] edge map
//!            -> [4] transmission -> [5] recovery -> [6] correct + pack -> RGB bytes
//! ```

mod scratch;

// =============================================================================
// Imports
// =============================================================================

use std::time::{Duration, Instant};

use crate::common::Buffer2;
use crate::config::Config;
use crate::constants::{IMAGE_HEIGHT, IMAGE_WIDTH};
use crate::dark_channel::{estimate_atmospheric_light, AtmosphericLight};
use crate::edge::{classify_edges, EdgeCategory, EdgeCounts};
use crate::error::{Error, Result};
use crate::planar::unpack_packed_rgb;
use crate::recovery::recover_scene_radiance;
use crate::saturation::correct_and_pack;
use crate::transmission::{estimate_transmission, SmoothingKernel, TransmissionStats};

pub use scratch::Scratch;

/// Pipeline state. Every invocation walks the same linear sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Converting,
    EstimatingLight,
    ClassifyingEdges,
    EstimatingTransmission,
    Recovering,
    Correcting,
    Done,
}

impl Stage {
    /// 1-based position of a working stage, `None` for `Idle` and `Done`.
    pub fn step(self) -> Option<usize> {
        match self {
            Stage::Idle | Stage::Done => None,
            Stage::Converting => Some(1),
            Stage::EstimatingLight => Some(2),
            Stage::ClassifyingEdges => Some(3),
            Stage::EstimatingTransmission => Some(4),
            Stage::Recovering => Some(5),
            Stage::Correcting => Some(6),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Converting => "Unpacking RGB planes",
            Stage::EstimatingLight => "Estimating atmospheric light",
            Stage::ClassifyingEdges => "Classifying edges",
            Stage::EstimatingTransmission => "Estimating transmission",
            Stage::Recovering => "Recovering scene radiance",
            Stage::Correcting => "Correcting saturation",
            Stage::Done => "done",
        }
    }
}

const STAGE_COUNT: usize = 6;

/// Output bytes plus diagnostics of one invocation.
#[derive(Debug, Clone)]
pub struct DehazeResult {
    /// Interleaved `R, G, B` bytes, row-major.
    pub pixels: Vec<u8>,
    pub diagnostics: Diagnostics,
}

/// Per-invocation statistics for inspection and tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub atmospheric_light: AtmosphericLight,
    pub edge_counts: EdgeCounts,
    pub transmission: TransmissionStats,
    pub elapsed: Duration,
}

// =============================================================================
// Dehazer
// =============================================================================

/// Single-image dehazer owning its configuration and working buffers.
///
/// Buffers are acquired on the first call to [`Dehazer::process`] or
/// [`Dehazer::process_into`] and reused afterwards. Taking `&mut self` keeps
/// invocations on one instance serialized; use one instance per thread to
/// dehaze images concurrently.
///
/// # Example
///
/// ```rust,ignore
/// use dehaze::{Config, Dehazer};
///
/// let mut dehazer = Dehazer::from_config(Config::default());
/// let result = dehazer.process(&packed)?;
/// println!("A = {:?}", result.diagnostics.atmospheric_light.rgb);
/// ```
#[derive(Debug)]
pub struct Dehazer {
    config: Config,
    width: usize,
    height: usize,
    stage: Stage,
    scratch: Option<Scratch>,
}

impl Default for Dehazer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dehazer {
    /// Dehazer for 512x512 images with default parameters.
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Dehazer for 512x512 images. Panics on out-of-range parameters.
    pub fn from_config(config: Config) -> Self {
        config.validate();
        Self::with_valid_config(config)
    }

    /// Like [`Dehazer::from_config`], but out-of-range parameters are
    /// returned as [`Error::InvalidConfig`].
    pub fn try_from_config(config: Config) -> Result<Self> {
        config.check()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: Config) -> Self {
        Self {
            config,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            stage: Stage::Idle,
            scratch: None,
        }
    }

    /// Use a different image size. Both axes need at least 2 pixels for the
    /// reflective boundary.
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Result<Self> {
        let fits = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(3))
            .is_some();
        if width < 2 || height < 2 || !fits {
            return Err(Error::InvalidDimensions { width, height });
        }
        self.width = width;
        self.height = height;
        self.scratch = None;
        Ok(self)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current pipeline state; `Done` after a successful run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Transmission map of the last successful run.
    pub fn transmission_map(&self) -> Option<&Buffer2<f32>> {
        self.completed_scratch().map(|s| &s.transmission)
    }

    /// Dark channel prime of the last successful run.
    pub fn dark_channel_map(&self) -> Option<&Buffer2<f32>> {
        self.completed_scratch().map(|s| &s.dark_channel)
    }

    /// Edge categories of the last successful run.
    pub fn edge_map(&self) -> Option<&Buffer2<EdgeCategory>> {
        self.completed_scratch().map(|s| &s.edges)
    }

    fn completed_scratch(&self) -> Option<&Scratch> {
        match self.stage {
            Stage::Done => self.scratch.as_ref(),
            _ => None,
        }
    }

    /// Dehaze `packed` (one `0x00RRGGBB` word per pixel, row-major) into a new
    /// byte buffer.
    pub fn process(&mut self, packed: &[u32]) -> Result<DehazeResult> {
        let len = self.width * self.height * 3;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|source| Error::ResourceExhaustion {
                buffer: "output",
                source,
            })?;
        pixels.resize(len, 0);

        let diagnostics = self.process_into(packed, &mut pixels)?;
        Ok(DehazeResult {
            pixels,
            diagnostics,
        })
    }

    /// Dehaze `packed` into a caller-provided buffer of `width * height * 3` bytes.
    ///
    /// On error nothing has been written to `output`.
    pub fn process_into(&mut self, packed: &[u32], output: &mut [u8]) -> Result<Diagnostics> {
        let pixels = self.width * self.height;
        if packed.len() != pixels {
            return Err(Error::InvalidInput {
                expected: pixels,
                actual: packed.len(),
            });
        }
        if output.len() != pixels * 3 {
            return Err(Error::InvalidInput {
                expected: pixels * 3,
                actual: output.len(),
            });
        }

        self.stage = Stage::Idle;
        let mut scratch = match self.scratch.take() {
            Some(scratch) if scratch.matches_dimensions(self.width, self.height) => scratch,
            _ => Scratch::try_new(self.width, self.height)?,
        };

        let diagnostics = self.run(&mut scratch, packed, output);
        self.scratch = Some(scratch);
        Ok(diagnostics)
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        if let Some(step) = stage.step() {
            tracing::debug!("[{}/{}] {}", step, STAGE_COUNT, stage.description());
        }
    }

    fn run(&mut self, scratch: &mut Scratch, packed: &[u32], output: &mut [u8]) -> Diagnostics {
        let start = Instant::now();
        let config = self.config.clone();

        self.enter(Stage::Converting);
        unpack_packed_rgb(packed, &mut scratch.image);

        self.enter(Stage::EstimatingLight);
        let light = estimate_atmospheric_light(
            &scratch.image,
            config.sigma as f32,
            scratch.filtered.get_mut(SmoothingKernel::Box),
            &mut scratch.dark_channel,
        );

        self.enter(Stage::ClassifyingEdges);
        classify_edges(&scratch.image, config.edge_threshold as f32, &mut scratch.edges);
        let edge_counts = EdgeCounts::from_map(&scratch.edges);

        self.enter(Stage::EstimatingTransmission);
        estimate_transmission(
            &scratch.image,
            &light,
            &scratch.edges,
            &config,
            &mut scratch.filtered,
            &mut scratch.transmission,
        );
        let transmission = TransmissionStats::from_map(&scratch.transmission, config.t0 as f32);

        self.enter(Stage::Recovering);
        recover_scene_radiance(
            &scratch.image,
            &light,
            &scratch.transmission,
            config.t0 as f32,
            &mut scratch.radiance,
        );

        self.enter(Stage::Correcting);
        correct_and_pack(&scratch.radiance, &light, config.beta as f32, output);

        self.enter(Stage::Done);
        let elapsed = start.elapsed();
        let diagnostics = Diagnostics {
            atmospheric_light: light,
            edge_counts,
            transmission,
            elapsed,
        };
        log_summary(&diagnostics, self.width, self.height);
        diagnostics
    }
}

fn log_summary(diagnostics: &Diagnostics, width: usize, height: usize) {
    let light = &diagnostics.atmospheric_light;
    let edges = &diagnostics.edge_counts;
    let elapsed_ms = diagnostics.elapsed.as_secs_f64() * 1000.0;
    let mpixels_per_sec =
        (width * height) as f64 / 1e6 / diagnostics.elapsed.as_secs_f64().max(1e-9);

    tracing::info!(
        "Dehazed {}x{} in {:.2}ms ({:.1} Mpixel/s): A = ({:.2}, {:.2}, {:.2}) at row {} col {}, edges smooth/axis/diagonal = {}/{}/{}",
        width,
        height,
        elapsed_ms,
        mpixels_per_sec,
        light.rgb[0],
        light.rgb[1],
        light.rgb[2],
        light.row,
        light.col,
        edges.smooth,
        edges.axis,
        edges.diagonal
    );

    let below_floor = diagnostics.transmission.below_floor;
    if below_floor * 2 > edges.total() {
        tracing::warn!(
            below_floor,
            total = edges.total(),
            "Transmission floor reached by most pixels; recovery is dominated by t0"
        );
    }
}
