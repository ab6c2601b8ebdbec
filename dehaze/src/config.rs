//! Configuration for the dehazing pipeline.
//!
//! [`Config`] carries the five tunable constants of the haze model plus the
//! kernel-selection policy. Every field has a default, so a YAML file only
//! needs to list the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BETA, DEFAULT_EDGE_THRESHOLD, DEFAULT_OMEGA_PRIME, DEFAULT_SIGMA, DEFAULT_T0,
};
use crate::error::{Error, Result};
use crate::transmission::SmoothingKernel;

/// How the transmission estimator picks a smoothing kernel per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelSelection {
    /// Kernel chosen by the pixel's edge category.
    #[default]
    EdgeAdaptive,
    /// One kernel for every pixel; the edge map is still computed for diagnostics.
    Fixed(SmoothingKernel),
}

/// Pipeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scale applied to the brightest dark-channel pixel to form the atmospheric light.
    pub sigma: f64,
    /// Minimum opposite-neighbor difference that marks a pixel as an edge.
    pub edge_threshold: f64,
    /// Weight of the normalized dark channel in `t = 1 - omega' * min_ratio`.
    pub omega_prime: f64,
    /// Transmission floor applied at recovery time.
    pub t0: f64,
    /// Saturation-correction exponent.
    pub beta: f64,
    pub kernel_selection: KernelSelection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            omega_prime: DEFAULT_OMEGA_PRIME,
            t0: DEFAULT_T0,
            beta: DEFAULT_BETA,
            kernel_selection: KernelSelection::default(),
        }
    }
}

impl Config {
    /// Check parameter ranges, reporting the first violation.
    pub fn check(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        if !(self.sigma > 0.0 && self.sigma <= 1.0) {
            return invalid(format!("sigma must be in (0, 1], got {}", self.sigma));
        }
        if self.edge_threshold.is_nan() || self.edge_threshold < 0.0 {
            return invalid(format!(
                "edge_threshold must be non-negative, got {}",
                self.edge_threshold
            ));
        }
        if !(self.omega_prime > 0.0 && self.omega_prime <= 1.0) {
            return invalid(format!(
                "omega_prime must be in (0, 1], got {}",
                self.omega_prime
            ));
        }
        // A zero floor would let recovery divide by zero.
        if !(self.t0 > 0.0 && self.t0 <= 1.0) {
            return invalid(format!("t0 must be in (0, 1], got {}", self.t0));
        }
        if !(0.0..1.0).contains(&self.beta) {
            return invalid(format!("beta must be in [0, 1), got {}", self.beta));
        }
        Ok(())
    }

    /// Validate parameter ranges. Panics on the first violation.
    pub fn validate(&self) {
        if let Err(e) = self.check() {
            panic!("{}", e);
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Read a YAML config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn with_kernel_selection(mut self, kernel_selection: KernelSelection) -> Self {
        self.kernel_selection = kernel_selection;
        self
    }
}
