//! Strategy 5: genetic search with an optional memetic step.
//!
//! Individuals are codes over domain members, scored by the annealing
//! energy (lower is fitter). Each generation keeps the `elitism` best
//! individuals, then breeds the rest from binary tournaments with uniform
//! crossover over the union of both parents and an add/remove mutation.
//! With `local_search_steps > 0` every child is improved before it joins
//! the population: a step removes one codeword of a random close pair, or
//! failing that adds a random member near a random uncovered vertex.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lucas_code::{close_pairs, coverage_report, is_perfect_code};
use lucas_model::{Code, Domain, InvalidInput};

use super::energy::{energy, Energy, EnergyWeights};
use super::SearchError;
use crate::budget::{BudgetChecker, SearchBudget, StopReason};
use crate::rng::{run_rng, GENETIC_STREAM};

/// Generations between two progress log lines.
const PROGRESS_INTERVAL: u64 = 10;

/// Configuration for genetic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: u64,
    /// Probability that a child is mutated, in [0, 1].
    pub mutation_rate: f64,
    /// Individuals copied unchanged into the next generation.
    pub elitism: usize,
    /// Memetic improvement steps per child; 0 disables the memetic step.
    pub local_search_steps: usize,
    /// Size of the random starting codes. Defaults to `ceil(|V| / (n + 1))`.
    pub initial_size: Option<usize>,
    pub weights: EnergyWeights,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 64,
            generations: 500,
            mutation_rate: 0.1,
            elitism: 4,
            local_search_steps: 0,
            initial_size: None,
            weights: EnergyWeights::default(),
            seed: 0,
        }
    }
}

impl GeneticConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.population_size < 2 {
            return Err(SearchError::Config(format!(
                "population must hold at least 2 individuals, got {}",
                self.population_size
            )));
        }
        if self.elitism >= self.population_size {
            return Err(SearchError::Config(format!(
                "elitism {} leaves no room for children in a population of {}",
                self.elitism, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SearchError::Config(format!(
                "mutation rate must lie in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        self.weights.validate()
    }
}

/// Result of a genetic search.
#[derive(Debug, Clone, Serialize)]
pub struct GeneticOutcome {
    pub perfect: bool,
    /// Lowest-energy individual observed.
    pub code: Code,
    pub energy: Energy,
    pub generations: u64,
    pub stop: StopReason,
    pub seed: u64,
}

struct Individual {
    code: Code,
    energy: Energy,
}

/// Breeding context shared by one run.
struct Breeder<'a> {
    domain: &'a Domain,
    members: &'a [u64],
    config: &'a GeneticConfig,
    rng: ChaCha8Rng,
}

impl Breeder<'_> {
    fn random_code(&mut self, size: usize) -> Result<Code, InvalidInput> {
        Code::from_bits(
            self.domain.n(),
            self.members.choose_multiple(&mut self.rng, size).copied(),
        )
    }

    /// Index of the fitter of two random individuals; ties keep the first draw.
    fn tournament(&mut self, population: &[Individual]) -> usize {
        let i = self.rng.gen_range(0..population.len());
        let j = self.rng.gen_range(0..population.len());
        if population[j].energy.value < population[i].energy.value {
            j
        } else {
            i
        }
    }

    /// Each gene of the union comes from a coin-chosen parent, if that
    /// parent carries it.
    fn crossover(&mut self, a: &Code, b: &Code) -> Result<Code, InvalidInput> {
        let pool = a.union(b)?;
        let mut child = Code::new(self.domain.n())?;
        for gene in pool.bits() {
            let parent = if self.rng.gen::<f64>() < 0.5 { a } else { b };
            if parent.contains_bits(gene) {
                child.insert_bits(gene);
            }
        }
        Ok(child)
    }

    fn mutate(&mut self, code: &mut Code) {
        if self.rng.gen::<f64>() >= self.config.mutation_rate {
            return;
        }
        if code.len() > 1 && self.rng.gen::<f64>() < 0.5 {
            let words: Vec<u64> = code.bits().collect();
            if let Some(&victim) = words.choose(&mut self.rng) {
                code.remove_bits(victim);
            }
        } else if let Some(&gene) = self.members.choose(&mut self.rng) {
            code.insert_bits(gene);
        }
    }

    fn improve(&mut self, code: &mut Code) -> Result<(), InvalidInput> {
        for _ in 0..self.config.local_search_steps {
            let pairs = close_pairs(code);
            if let Some((a, b)) = pairs.choose(&mut self.rng) {
                let victim = if self.rng.gen::<bool>() { a } else { b };
                code.remove_bits(victim.bits());
                continue;
            }

            let report = coverage_report(code, self.domain)?;
            let uncovered: Vec<u64> = report.uncovered_bits().collect();
            let Some(&target) = uncovered.choose(&mut self.rng) else {
                break;
            };
            let near: Vec<u64> = std::iter::once(target)
                .chain(self.domain.neighbor_bits(target))
                .collect();
            if let Some(&gene) = near.choose(&mut self.rng) {
                code.insert_bits(gene);
            }
        }
        Ok(())
    }
}

fn evaluate(
    codes: Vec<Code>,
    domain: &Domain,
    weights: &EnergyWeights,
) -> Result<Vec<Individual>, InvalidInput> {
    codes
        .into_par_iter()
        .map(|code| {
            let energy = energy(&code, domain, weights)?;
            Ok(Individual { code, energy })
        })
        .collect()
}

/// Index of the lowest-energy individual; ties go to the lowest index.
fn fittest(population: &[Individual]) -> usize {
    population
        .iter()
        .enumerate()
        .fold(0, |best, (i, ind)| {
            if ind.energy.value < population[best].energy.value {
                i
            } else {
                best
            }
        })
}

/// Run the genetic search to completion.
pub fn genetic_search(
    domain: &Domain,
    config: &GeneticConfig,
    budget: &SearchBudget,
) -> Result<GeneticOutcome, SearchError> {
    genetic_search_until(domain, config, budget, &AtomicBool::new(false))
}

/// Run the genetic search until done or until `stop` is raised.
pub fn genetic_search_until(
    domain: &Domain,
    config: &GeneticConfig,
    budget: &SearchBudget,
    stop: &AtomicBool,
) -> Result<GeneticOutcome, SearchError> {
    config.validate()?;
    let members = domain.members()?;
    let initial_size = config
        .initial_size
        .unwrap_or_else(|| members.len().div_ceil(domain.n() as usize + 1));
    let checker = BudgetChecker::new(budget.clone());
    let mut breeder = Breeder {
        domain,
        members,
        config,
        rng: run_rng(config.seed, GENETIC_STREAM),
    };

    info!(
        n = domain.n(),
        s = domain.s(),
        seed = config.seed,
        population = config.population_size,
        initial_size,
        memetic = config.local_search_steps > 0,
        "genetic search started"
    );

    let codes = (0..config.population_size)
        .map(|_| breeder.random_code(initial_size))
        .collect::<Result<Vec<_>, _>>()?;
    let mut population = evaluate(codes, domain, &config.weights)?;
    let first = fittest(&population);
    let mut best = population[first].energy;
    let mut best_code = population[first].code.clone();
    let mut generation = 0u64;

    let reason = loop {
        let leader = fittest(&population);
        let leader_energy = population[leader].energy;
        if leader_energy.value < best.value {
            best = leader_energy;
            best_code = population[leader].code.clone();
        }
        if leader_energy.is_zero() {
            if is_perfect_code(&population[leader].code, domain)? {
                break StopReason::Solved;
            }
            warn!(generation, "zero-energy individual failed verification");
        }
        if generation % PROGRESS_INTERVAL == 0 {
            debug!(
                generation,
                best = leader_energy.value,
                uncovered = leader_energy.uncovered,
                collisions = leader_energy.collisions,
                size = population[leader].code.len(),
                "genetic progress"
            );
        }

        if generation >= config.generations {
            break StopReason::IterationLimit;
        }
        if let Some(reason) = checker.check(generation) {
            break reason;
        }
        if stop.load(Ordering::Relaxed) {
            break StopReason::Cancelled;
        }

        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| population[a].energy.value.total_cmp(&population[b].energy.value));
        let mut next: Vec<Code> = ranked
            .iter()
            .take(config.elitism)
            .map(|&i| population[i].code.clone())
            .collect();

        while next.len() < config.population_size {
            let a = breeder.tournament(&population);
            let b = breeder.tournament(&population);
            let mut child = breeder.crossover(&population[a].code, &population[b].code)?;
            breeder.mutate(&mut child);
            breeder.improve(&mut child)?;
            next.push(child);
        }

        population = evaluate(next, domain, &config.weights)?;
        generation += 1;
    };

    let perfect = reason == StopReason::Solved;
    info!(perfect, generation, best_energy = best.value, ?reason, "genetic search finished");

    Ok(GeneticOutcome {
        perfect,
        code: best_code,
        energy: best,
        generations: generation,
        stop: reason,
        seed: config.seed,
    })
}
