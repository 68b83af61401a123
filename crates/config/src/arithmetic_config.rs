// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How p-adic arithmetic reports precision destroyed by cancellation.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum PrecisionMode {
    /// Report the surviving digits only, e.g. `O(p^m)` with fewer significant digits.
    #[default]
    Honest,
    /// Backfill lost digits with non-zero pseudo-random digits so the relative
    /// precision stays fixed, the way floating point numbers behave.
    FixedRelative {
        /// Seed for the digit generator. Equal seeds give equal fills.
        seed: u64,
    },
}

/// The precision settings threaded through p-adic arithmetic.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct PrecisionConfig {
    /// Honest or fixed-relative precision
    pub mode: PrecisionMode,
    /// Emit a warning whenever a value ends up with no significant digits
    pub warn_on_total_loss: bool,
}

impl PrecisionConfig {
    pub fn honest() -> Self {
        Self::default()
    }

    pub fn fixed_relative(seed: u64) -> Self {
        Self {
            mode: PrecisionMode::FixedRelative { seed },
            warn_on_total_loss: false,
        }
    }

    pub fn with_total_loss_warning(mut self, enabled: bool) -> Self {
        self.warn_on_total_loss = enabled;
        self
    }
}

/// Rational reconstruction algorithm.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReconstructionAlgorithm {
    /// Maximal quotient rational reconstruction (Monagan)
    #[default]
    Mqrr,
    /// Lattice Gauss reduction
    Lgrr,
    /// Extended Euclidean rational reconstruction (Wang)
    Eearr,
}

impl fmt::Display for ReconstructionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconstructionAlgorithm::Mqrr => "MQRR",
            ReconstructionAlgorithm::Lgrr => "LGRR",
            ReconstructionAlgorithm::Eearr => "EEARR",
        };
        write!(f, "{name}")
    }
}

/// What a bounded reconstruction does when no fraction satisfies its bound.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Return `None`
    #[default]
    Sentinel,
    /// Return an error
    Error,
}

/// Options for turning residues back into fractions.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ReconstructionConfig {
    pub algorithm: ReconstructionAlgorithm,
    pub on_failure: FailureMode,
    /// Initial MQRR threshold. Defaults to `2 * ceil(log2(m))` when unset.
    pub mqrr_threshold: Option<u64>,
    /// Reject EEARR results whose denominator exceeds `sqrt(m / 2)`
    pub strict_bound: bool,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            algorithm: ReconstructionAlgorithm::Mqrr,
            on_failure: FailureMode::Sentinel,
            mqrr_threshold: None,
            strict_bound: true,
        }
    }
}

impl ReconstructionConfig {
    pub fn with_algorithm(mut self, algorithm: ReconstructionAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_failure_mode(mut self, on_failure: FailureMode) -> Self {
        self.on_failure = on_failure;
        self
    }
}

/// Top level configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ArithmeticConfig {
    pub precision: PrecisionConfig,
    pub reconstruction: ReconstructionConfig,
}
