//! Tuning knobs for a contour run.

use serde::{Deserialize, Serialize};

use crate::error::{ContourError, Result};

/// Default snapping tolerance between a sample and the level
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Options shared by every level of a contour run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourOptions {
    /// A crossing within this distance of a sample snaps onto the sample
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Size of a dedicated worker pool (`None` = rayon's global pool)
    #[serde(default)]
    pub threads: Option<usize>,

    /// Return an empty level without scanning when no sample crosses it
    #[serde(default = "default_skip_uncrossed")]
    pub skip_uncrossed_levels: bool,
}

fn default_epsilon() -> f64 { DEFAULT_EPSILON }
fn default_skip_uncrossed() -> bool { true }

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            threads: None,
            skip_uncrossed_levels: default_skip_uncrossed(),
        }
    }
}

impl ContourOptions {
    /// Run on a dedicated pool of `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Use a different snapping tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Reject option values no run could use.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ContourError::configuration(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        if self.threads == Some(0) {
            return Err(ContourError::configuration("threads must be at least 1"));
        }
        Ok(())
    }
}
