//! Strategy 4: simulated annealing.
//!
//! The state is a code over domain members. A move toggles one uniformly
//! random member in or out of the code. Moves that do not raise the energy
//! are always taken; others are taken with probability `exp(-dE / T)`.
//! After every move the temperature is multiplied by the cooling rate.
//!
//! The energy is maintained incrementally from a dense array of coverage
//! counts over all 2^n patterns, so a move costs O(n).

use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lucas_code::{is_perfect_code, sphere_bound};
use lucas_model::{Code, Domain, InvalidInput, MAX_ENUMERATION_WIDTH};

use super::energy::{Energy, EnergyWeights};
use super::{check_code_width, closed_ball, SearchError};
use crate::budget::{BudgetChecker, SearchBudget, StopReason};
use crate::rng::{run_rng, ANNEAL_STREAM};

/// Moves between two progress log lines.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Starting code for annealing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum InitialCode {
    Empty,
    /// Distinct random members; `size` defaults to the sphere bound.
    Random { size: Option<usize> },
    /// A given code. Codewords outside the domain are dropped.
    Seed { code: Code },
}

impl Default for InitialCode {
    fn default() -> Self {
        Self::Random { size: None }
    }
}

/// Configuration for simulated annealing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnealConfig {
    pub initial_temperature: f64,
    /// Multiplier applied after every move, in (0, 1).
    pub cooling_rate: f64,
    /// Stop once the temperature falls below this.
    pub min_temperature: f64,
    pub max_iterations: u64,
    pub weights: EnergyWeights,
    pub seed: u64,
    pub initial: InitialCode,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 2.0,
            cooling_rate: 0.9995,
            min_temperature: 1e-3,
            max_iterations: 200_000,
            weights: EnergyWeights::default(),
            seed: 0,
            initial: InitialCode::default(),
        }
    }
}

impl AnnealConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(SearchError::Config(format!(
                "cooling rate must lie in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(SearchError::Config(format!(
                "initial temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.min_temperature >= 0.0) {
            return Err(SearchError::Config(format!(
                "minimum temperature must be non-negative, got {}",
                self.min_temperature
            )));
        }
        self.weights.validate()
    }
}

/// Result of an annealing run.
#[derive(Debug, Clone, Serialize)]
pub struct AnnealOutcome {
    /// True iff the best code has zero energy and passed the oracle.
    pub perfect: bool,
    /// Lowest-energy code observed.
    pub code: Code,
    pub energy: Energy,
    pub iterations: u64,
    pub final_temperature: f64,
    pub stop: StopReason,
    pub seed: u64,
}

/// Code plus incrementally maintained energy components.
struct AnnealState<'a> {
    domain: &'a Domain,
    weights: EnergyWeights,
    code: Code,
    counts: Vec<u8>,
    uncovered: u64,
    collisions: u64,
    foreign: u64,
}

impl<'a> AnnealState<'a> {
    fn new(domain: &'a Domain, code: Code, weights: EnergyWeights) -> Result<Self, InvalidInput> {
        let n = domain.n();
        if n > MAX_ENUMERATION_WIDTH {
            return Err(InvalidInput::EnumerationTooLarge {
                n,
                max: MAX_ENUMERATION_WIDTH,
            });
        }
        let mut state = Self {
            domain,
            weights,
            code: Code::new(n)?,
            counts: vec![0u8; 1usize << n],
            uncovered: domain.size()? as u64,
            collisions: 0,
            foreign: 0,
        };
        for word in code.bits() {
            state.toggle(word);
        }
        Ok(state)
    }

    /// Energy components after toggling `c`, without applying it.
    fn components_after(&self, c: u64) -> (u64, u64, u64) {
        let n = self.domain.n();
        let adding = !self.code.contains_bits(c);
        let (mut uncovered, mut collisions) = (self.uncovered, self.collisions);
        for u in closed_ball(c, n) {
            let k = self.counts[u as usize];
            let member = self.domain.contains_bits(u);
            if adding {
                match k {
                    0 if member => uncovered -= 1,
                    0 => {}
                    _ => collisions += 1,
                }
            } else {
                match k {
                    1 if member => uncovered += 1,
                    1 => {}
                    _ => collisions -= 1,
                }
            }
        }
        let foreign = match (self.domain.contains_bits(c), adding) {
            (true, _) => self.foreign,
            (false, true) => self.foreign + 1,
            (false, false) => self.foreign - 1,
        };
        (uncovered, collisions, foreign)
    }

    fn delta(&self, c: u64) -> f64 {
        let (uncovered, collisions, foreign) = self.components_after(c);
        self.weights.value(uncovered, collisions, foreign) - self.energy().value
    }

    fn toggle(&mut self, c: u64) {
        let (uncovered, collisions, foreign) = self.components_after(c);
        let added = self.code.toggle_bits(c);
        for u in closed_ball(c, self.domain.n()) {
            let slot = &mut self.counts[u as usize];
            *slot = if added { *slot + 1 } else { *slot - 1 };
        }
        self.uncovered = uncovered;
        self.collisions = collisions;
        self.foreign = foreign;
    }

    fn energy(&self) -> Energy {
        Energy::new(self.uncovered, self.collisions, self.foreign, &self.weights)
    }
}

fn initial_code(
    domain: &Domain,
    members: &[u64],
    initial: &InitialCode,
    rng: &mut ChaCha8Rng,
) -> Result<Code, InvalidInput> {
    let n = domain.n();
    match initial {
        InitialCode::Empty => Code::new(n),
        InitialCode::Random { size } => {
            let size = match size {
                Some(size) => *size,
                None => sphere_bound(domain)?,
            };
            Code::from_bits(n, members.choose_multiple(rng, size).copied())
        }
        InitialCode::Seed { code } => {
            check_code_width(code, domain)?;
            let mut code = code.clone();
            code.retain_bits(|w| domain.contains_bits(w));
            Ok(code)
        }
    }
}

/// Run simulated annealing to completion.
pub fn anneal(
    domain: &Domain,
    config: &AnnealConfig,
    budget: &SearchBudget,
) -> Result<AnnealOutcome, SearchError> {
    anneal_until(domain, config, budget, &AtomicBool::new(false))
}

/// Run simulated annealing until done or until `stop` is raised.
pub fn anneal_until(
    domain: &Domain,
    config: &AnnealConfig,
    budget: &SearchBudget,
    stop: &AtomicBool,
) -> Result<AnnealOutcome, SearchError> {
    config.validate()?;
    let members = domain.members()?;
    let mut rng = run_rng(config.seed, ANNEAL_STREAM);
    let start = initial_code(domain, members, &config.initial, &mut rng)?;
    let mut state = AnnealState::new(domain, start, config.weights)?;
    let checker = BudgetChecker::new(budget.clone());

    info!(
        n = domain.n(),
        s = domain.s(),
        seed = config.seed,
        initial_size = state.code.len(),
        initial_energy = state.energy().value,
        "annealing started"
    );

    let mut best_code = state.code.clone();
    let mut best = state.energy();
    let mut temperature = config.initial_temperature;
    let mut iterations = 0u64;

    let stop_reason = loop {
        if best.is_zero() {
            break StopReason::Solved;
        }
        if temperature < config.min_temperature {
            break StopReason::Cooled;
        }
        if iterations >= config.max_iterations {
            break StopReason::IterationLimit;
        }
        if let Some(reason) = checker.check(iterations) {
            break reason;
        }
        if stop.load(Ordering::Relaxed) {
            break StopReason::Cancelled;
        }

        let c = members[rng.gen_range(0..members.len())];
        let delta = state.delta(c);
        if delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
            state.toggle(c);
            let current = state.energy();
            if current.value < best.value {
                best = current;
                best_code = state.code.clone();
            }
        }

        temperature *= config.cooling_rate;
        iterations += 1;
        if iterations % PROGRESS_INTERVAL == 0 {
            debug!(
                iterations,
                temperature,
                energy = state.energy().value,
                best = best.value,
                "annealing progress"
            );
        }
    };

    let perfect = best.is_zero() && is_perfect_code(&best_code, domain)?;
    let reason = match (perfect, stop_reason) {
        (true, _) => StopReason::Solved,
        (false, StopReason::Solved) => {
            warn!(size = best_code.len(), "zero-energy code failed verification");
            StopReason::Exhausted
        }
        (false, other) => other,
    };
    info!(
        perfect,
        iterations,
        best_energy = best.value,
        size = best_code.len(),
        stop = ?reason,
        "annealing finished"
    );

    Ok(AnnealOutcome {
        perfect,
        code: best_code,
        energy: best,
        iterations,
        final_temperature: temperature,
        stop: reason,
        seed: config.seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::energy::energy;

    #[test]
    fn test_incremental_energy_matches_full_recount() {
        let domain = Domain::new(7, 5).unwrap();
        let weights = EnergyWeights {
            alpha: 1.5,
            beta: 3.0,
        };
        let members = domain.members().unwrap().to_vec();
        let mut state = AnnealState::new(&domain, Code::new(7).unwrap(), weights).unwrap();
        let mut rng = run_rng(7, ANNEAL_STREAM);
        for _ in 0..500 {
            let c = members[rng.gen_range(0..members.len())];
            let predicted = state.energy().value + state.delta(c);
            state.toggle(c);
            let full = energy(&state.code, &domain, &weights).unwrap();
            assert_eq!(state.energy(), full);
            assert!((predicted - full.value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seed_drops_foreign_codewords() {
        let domain = Domain::new(3, 3).unwrap();
        let seed = Code::from_bits(3, [0b111, 0b010]).unwrap();
        let mut rng = run_rng(0, ANNEAL_STREAM);
        let members = domain.members().unwrap();
        let code =
            initial_code(&domain, members, &InitialCode::Seed { code: seed }, &mut rng).unwrap();
        assert_eq!(code.bits().collect::<Vec<_>>(), vec![0b010]);
    }

    #[test]
    fn test_validate_rejects_bad_cooling_rate() {
        for rate in [0.0, 1.0, 1.5, f64::NAN] {
            let config = AnnealConfig {
                cooling_rate: rate,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(SearchError::Config(_))));
        }
        assert!(AnnealConfig::default().validate().is_ok());
    }
}
