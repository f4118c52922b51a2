//! Reconstruction settings, read once at setup.
//!
//! `WenoConfig` is serde-enabled so it can be filled from a partial
//! dictionary (JSON, TOML, ...). Missing expert factors fall back to their
//! defaults: `p = 4`, `dm = 1000`, `eps = 1e-5`.

use crate::reconstruct::weights::WeightCombiner;
use crate::weno_error::WenoError;
use serde::{Deserialize, Serialize};

/// Default sharpening exponent.
pub const DEFAULT_P: f64 = 4.0;
/// Default central-stencil bias.
pub const DEFAULT_DM: f64 = 1000.0;
/// Default smoothness regularizer.
pub const DEFAULT_EPS: f64 = 10e-6;

fn default_p() -> f64 {
    DEFAULT_P
}
fn default_dm() -> f64 {
    DEFAULT_DM
}
fn default_eps() -> f64 {
    DEFAULT_EPS
}

/// Polynomial order and nonlinear-weight expert factors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WenoConfig {
    /// Order of the reconstructed polynomials (>= 1).
    pub pol_order: usize,
    /// Sharpening exponent applied to `eps + indicator`.
    #[serde(default = "default_p")]
    pub p: f64,
    /// Linear weight of the central stencil relative to sectorial ones.
    #[serde(default = "default_dm")]
    pub dm: f64,
    /// Regularizer keeping weights finite for vanishing indicators.
    #[serde(default = "default_eps")]
    pub eps: f64,
}

impl Default for WenoConfig {
    fn default() -> Self {
        Self::new(2)
    }
}

impl WenoConfig {
    /// Configuration of the given order with default expert factors.
    pub fn new(pol_order: usize) -> Self {
        Self {
            pol_order,
            p: DEFAULT_P,
            dm: DEFAULT_DM,
            eps: DEFAULT_EPS,
        }
    }

    pub fn with_p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    pub fn with_dm(mut self, dm: f64) -> Self {
        self.dm = dm;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Reject orders below one and non-positive or non-finite factors.
    pub fn validate(&self) -> Result<(), WenoError> {
        if self.pol_order < 1 {
            return Err(WenoError::InvalidConfig(format!(
                "pol_order must be >= 1, got {}",
                self.pol_order
            )));
        }
        for (name, v) in [("p", self.p), ("dm", self.dm), ("eps", self.eps)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(WenoError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Weight combiner carrying this configuration's factors.
    pub fn combiner(&self) -> Result<WeightCombiner, WenoError> {
        self.validate()?;
        Ok(WeightCombiner::new(self.p, self.dm, self.eps))
    }
}
