//! Parallel annealing race over seeds.
//!
//! Attempts run on the rayon pool and share one stop flag. The first
//! attempt to verify a perfect code raises it; the others return their
//! best-so-far at the next check.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use lucas_model::Domain;

use crate::budget::SearchBudget;
use crate::strategy::anneal::{anneal_until, AnnealConfig, AnnealOutcome};
use crate::strategy::SearchError;

/// Result of a race.
#[derive(Debug, Clone, Serialize)]
pub struct RaceOutcome {
    /// Index into `attempts` of the first perfect attempt in seed order.
    pub winner: Option<usize>,
    /// One outcome per seed, in seed order.
    pub attempts: Vec<AnnealOutcome>,
}

impl RaceOutcome {
    /// The winner, or else the attempt with the lowest energy.
    pub fn best(&self) -> Option<&AnnealOutcome> {
        match self.winner {
            Some(i) => self.attempts.get(i),
            None => self
                .attempts
                .iter()
                .min_by(|a, b| a.energy.value.total_cmp(&b.energy.value)),
        }
    }
}

/// Anneal once per seed in parallel; first verified success stops the rest.
pub fn race_anneal(
    domain: &Domain,
    config: &AnnealConfig,
    seeds: &[u64],
    budget: &SearchBudget,
) -> Result<RaceOutcome, SearchError> {
    if seeds.is_empty() {
        return Err(SearchError::Config("race needs at least one seed".into()));
    }
    config.validate()?;
    // Build the membership table once, before the attempts share it.
    domain.members()?;
    info!(attempts = seeds.len(), "annealing race started");

    let stop = AtomicBool::new(false);
    let attempts = seeds
        .par_iter()
        .map(|&seed| {
            let attempt = AnnealConfig {
                seed,
                ..config.clone()
            };
            let outcome = anneal_until(domain, &attempt, budget, &stop)?;
            if outcome.perfect {
                stop.store(true, Ordering::Relaxed);
            }
            Ok(outcome)
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    let winner = attempts.iter().position(|a| a.perfect);
    info!(?winner, "annealing race finished");
    Ok(RaceOutcome { winner, attempts })
}
