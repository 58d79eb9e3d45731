//! Allocation tuning parameters.
//!
//! Every default can be overridden through the builder methods or by
//! deserializing a JSON object (missing fields keep their defaults).

use serde::{Deserialize, Serialize};

/// Tuning parameters for [`TeamAllocator`](crate::allocator::TeamAllocator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Maximum number of local search passes (default: 50).
    pub max_iterations: usize,
    /// A swap is accepted only when its combined move score is below this
    /// value (default: -0.1).
    pub acceptance_threshold: f64,
    /// Upper limit = configured minimum + this offset (default: 1).
    pub upper_limit_offset: usize,
    /// Seed for the local search shuffle. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            acceptance_threshold: -0.1,
            upper_limit_offset: 1,
            seed: None,
        }
    }
}

impl AllocationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of local search passes.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the swap acceptance threshold.
    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    /// Sets the upper limit offset.
    pub fn with_upper_limit_offset(mut self, offset: usize) -> Self {
        self.upper_limit_offset = offset;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
