//! The uncovered/collision energy shared by annealing and genetic search.
//!
//! `energy = alpha * uncovered + beta * (collisions + foreign)` where
//! - `uncovered` counts domain vertices no codeword reaches,
//! - `collisions` sums `count - 1` over every hypercube vertex reached by
//!   `count >= 2` codewords,
//! - `foreign` counts codewords outside the domain.
//!
//! Collisions are counted over the whole hypercube, so two codewords at
//! distance 1 or 2 always collide somewhere. Energy zero therefore implies
//! distance at least 3, full coverage and membership: a perfect code.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lucas_model::{Code, Domain, InvalidInput};

use super::{check_code_width, closed_ball, SearchError};

/// Penalty weights. Both must be positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnergyWeights {
    /// Cost per uncovered domain vertex.
    pub alpha: f64,
    /// Cost per collision or foreign codeword.
    pub beta: f64,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

impl EnergyWeights {
    pub fn validate(&self) -> Result<(), SearchError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SearchError::Config(format!(
                    "energy weight {name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn value(&self, uncovered: u64, collisions: u64, foreign: u64) -> f64 {
        self.alpha * uncovered as f64 + self.beta * (collisions + foreign) as f64
    }
}

/// Energy of a code together with its integer components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Energy {
    pub uncovered: u64,
    pub collisions: u64,
    pub foreign: u64,
    pub value: f64,
}

impl Energy {
    pub fn new(uncovered: u64, collisions: u64, foreign: u64, weights: &EnergyWeights) -> Self {
        Self {
            uncovered,
            collisions,
            foreign,
            value: weights.value(uncovered, collisions, foreign),
        }
    }

    /// Exact zero test on the integer components.
    pub fn is_zero(&self) -> bool {
        self.uncovered == 0 && self.collisions == 0 && self.foreign == 0
    }
}

/// Energy of `code` in `domain`.
///
/// Work is proportional to `|code| * n` once the domain size is cached.
pub fn energy(
    code: &Code,
    domain: &Domain,
    weights: &EnergyWeights,
) -> Result<Energy, InvalidInput> {
    check_code_width(code, domain)?;
    let n = domain.n();
    let size = domain.size()? as u64;

    let mut counts: HashMap<u64, u64> = HashMap::new();
    let mut foreign = 0u64;
    for word in code.bits() {
        if !domain.contains_bits(word) {
            foreign += 1;
        }
        for u in closed_ball(word, n) {
            *counts.entry(u).or_insert(0) += 1;
        }
    }

    let covered = counts.keys().filter(|&&u| domain.contains_bits(u)).count() as u64;
    let collisions = counts.values().map(|&c| c - 1).sum();
    Ok(Energy::new(size - covered, collisions, foreign, weights))
}
