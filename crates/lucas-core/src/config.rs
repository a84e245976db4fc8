//! JSON run configuration.
//!
//! ```json
//! {
//!   "n": 7,
//!   "s": 5,
//!   "strategy": { "kind": "puncture_repair" },
//!   "budget": { "max_wall_millis": 60000 }
//! }
//! ```
//!
//! Every strategy field falls back to its default when omitted.

use serde::{Deserialize, Serialize};

use lucas_explore::{
    AnnealConfig, CosetShiftConfig, GeneticConfig, RepairConfig, SearchBudget, SpliceConfig,
};
use lucas_model::Code;

use crate::error::RunError;
use crate::limits::EngineLimits;

/// A complete run request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub n: u32,
    pub s: u32,
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub limits: EngineLimits,
    #[serde(default)]
    pub budget: SearchBudget,
}

/// Which strategy to run, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StrategyConfig {
    CosetShift(CosetShiftConfig),
    PunctureRepair {
        #[serde(default)]
        seed: SeedSource,
        #[serde(default)]
        repair: RepairConfig,
    },
    PartitionSplice(SpliceConfig),
    Anneal {
        #[serde(default)]
        config: AnnealConfig,
        /// One attempt per seed, raced in parallel. Empty means a single
        /// attempt with `config.seed`.
        #[serde(default)]
        seeds: Vec<u64>,
    },
    Genetic(GeneticConfig),
}

impl StrategyConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CosetShift(_) => "coset_shift",
            Self::PunctureRepair { .. } => "puncture_repair",
            Self::PartitionSplice(_) => "partition_splice",
            Self::Anneal { .. } => "anneal",
            Self::Genetic(_) => "genetic",
        }
    }
}

/// Where puncture-and-repair gets its starting code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case", deny_unknown_fields)]
pub enum SeedSource {
    /// A perfect code of Λn(1^(s+1)) found by restricted coset shifting.
    Auto { max_weight: u32 },
    Code { code: Code },
    /// One codeword per line.
    Lines { text: String },
}

impl Default for SeedSource {
    fn default() -> Self {
        Self::Auto { max_weight: 1 }
    }
}

/// Parse a run configuration, rejecting documents over the default size limit.
pub fn parse_config(json: &str) -> Result<RunConfig, RunError> {
    parse_config_with(json, &EngineLimits::default())
}

pub fn parse_config_with(json: &str, limits: &EngineLimits) -> Result<RunConfig, RunError> {
    limits.check_config_size(json.len())?;
    Ok(serde_json::from_str(json)?)
}
