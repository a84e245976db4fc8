//! Strategy dispatch and the run report.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use lucas_code::{sphere_bound, HammingCode};
use lucas_explore::{
    coset_shift_search, coset_shift_search_par, genetic_search, partition_and_splice,
    puncture_and_repair, race_anneal, CosetShiftConfig, CosetShiftOutcome, GeneticOutcome,
    RaceOutcome, RepairOutcome, SpliceOutcome,
};
use lucas_model::{Code, Domain};

use crate::config::{RunConfig, SeedSource, StrategyConfig};
use crate::error::RunError;

/// The strategy-specific result of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyOutcome {
    CosetShift(CosetShiftOutcome),
    PunctureRepair(RepairOutcome),
    PartitionSplice(SpliceOutcome),
    Anneal(RaceOutcome),
    Genetic(GeneticOutcome),
}

impl StrategyOutcome {
    /// True iff the final code passed the perfect-code oracle.
    pub fn is_perfect(&self) -> bool {
        match self {
            Self::CosetShift(outcome) => outcome.is_found(),
            Self::PunctureRepair(outcome) => outcome.is_perfect(),
            Self::PartitionSplice(outcome) => outcome.perfect,
            Self::Anneal(outcome) => outcome.winner.is_some(),
            Self::Genetic(outcome) => outcome.perfect,
        }
    }

    /// The code the strategy ended with, perfect or not.
    pub fn code(&self) -> Option<&Code> {
        match self {
            Self::CosetShift(outcome) => outcome.code(),
            Self::PunctureRepair(outcome) => Some(&outcome.code),
            Self::PartitionSplice(outcome) => Some(&outcome.code),
            Self::Anneal(outcome) => outcome.best().map(|attempt| &attempt.code),
            Self::Genetic(outcome) => Some(&outcome.code),
        }
    }
}

/// Summary of one run, serializable as the engine's response.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub n: u32,
    pub s: u32,
    pub strategy: &'static str,
    pub domain_size: usize,
    pub sphere_bound: usize,
    pub perfect: bool,
    pub code: Option<Code>,
    pub elapsed_secs: f64,
    pub outcome: StrategyOutcome,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String, RunError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Validate a run request against its limits and run the chosen strategy.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    config.limits.check_width(config.n)?;
    let domain = Domain::new(config.n, config.s)?;
    let domain_size = domain.size()?;
    let bound = sphere_bound(&domain)?;
    let start = Instant::now();

    info!(
        n = config.n,
        s = config.s,
        strategy = config.strategy.name(),
        domain_size,
        sphere_bound = bound,
        "run started"
    );

    let outcome = match &config.strategy {
        StrategyConfig::CosetShift(params) => {
            let hamming = HammingCode::for_width(config.n)?;
            StrategyOutcome::CosetShift(coset_shift_search_par(&domain, &hamming, params)?)
        }
        StrategyConfig::PunctureRepair { seed, repair } => {
            let base = seed_code(&domain, seed)?;
            StrategyOutcome::PunctureRepair(puncture_and_repair(&base, &domain, repair)?)
        }
        StrategyConfig::PartitionSplice(params) => {
            StrategyOutcome::PartitionSplice(partition_and_splice(&domain, params)?)
        }
        StrategyConfig::Anneal {
            config: params,
            seeds,
        } => {
            let seeds = if seeds.is_empty() {
                vec![params.seed]
            } else {
                seeds.clone()
            };
            config.limits.check_attempts(seeds.len())?;
            let mut seen = BTreeSet::new();
            if let Some(dup) = seeds.iter().find(|&&seed| !seen.insert(seed)) {
                return Err(RunError::Config(format!("seed {dup} listed twice")));
            }
            StrategyOutcome::Anneal(race_anneal(&domain, params, &seeds, &config.budget)?)
        }
        StrategyConfig::Genetic(params) => {
            StrategyOutcome::Genetic(genetic_search(&domain, params, &config.budget)?)
        }
    };

    let perfect = outcome.is_perfect();
    let code = outcome.code().cloned();
    let elapsed_secs = start.elapsed().as_secs_f64();
    info!(
        perfect,
        size = code.as_ref().map_or(0, Code::len),
        elapsed_secs,
        "run finished"
    );

    Ok(RunReport {
        n: config.n,
        s: config.s,
        strategy: config.strategy.name(),
        domain_size,
        sphere_bound: bound,
        perfect,
        code,
        elapsed_secs,
        outcome,
    })
}

/// Resolve the starting code for puncture-and-repair.
fn seed_code(domain: &Domain, seed: &SeedSource) -> Result<Code, RunError> {
    match seed {
        SeedSource::Code { code } => Ok(code.clone()),
        SeedSource::Lines { text } => Ok(Code::parse_lines(domain.n(), text)?),
        SeedSource::Auto { max_weight } => {
            // Past the width every run length admits the whole cube already.
            let s = if domain.is_unconstrained() {
                domain.s()
            } else {
                domain.s() + 1
            };
            let n = domain.n();
            let wider = Domain::new(n, s)?;
            let hamming = HammingCode::for_width(n)?;
            let params = CosetShiftConfig {
                max_weight: *max_weight,
                restrict: true,
            };
            match coset_shift_search(&wider, &hamming, &params)? {
                CosetShiftOutcome::Found { shift, code, .. } => {
                    debug!(%shift, size = code.len(), "seed code derived");
                    Ok(code)
                }
                CosetShiftOutcome::Exhausted { .. } => Err(RunError::NoSeed { n, s }),
            }
        }
    }
}
