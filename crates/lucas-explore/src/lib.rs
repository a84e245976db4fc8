//! Code-discovery strategies for perfect codes in generalized Lucas cubes.
//!
//! Every strategy takes a [`lucas_model::Domain`] plus its own parameter
//! struct and reports success only when [`lucas_code::is_perfect_code`]
//! accepts the result.

pub mod budget;
pub mod race;
pub mod rng;
pub mod strategy;

pub use budget::{BudgetChecker, SearchBudget, StopReason};
pub use race::{race_anneal, RaceOutcome};
pub use strategy::anneal::{anneal, anneal_until, AnnealConfig, AnnealOutcome, InitialCode};
pub use strategy::coset_shift::{
    coset_shift_search, coset_shift_search_par, CosetShiftConfig, CosetShiftOutcome,
};
pub use strategy::energy::{energy, Energy, EnergyWeights};
pub use strategy::genetic::{genetic_search, genetic_search_until, GeneticConfig, GeneticOutcome};
pub use strategy::repair::{puncture_and_repair, RepairConfig, RepairOutcome, RepairStatus};
pub use strategy::splice::{
    partition_and_splice, partition_by_weight, PartitionReport, PartitionSolver, SpliceConfig,
    SpliceOutcome,
};
pub use strategy::SearchError;
