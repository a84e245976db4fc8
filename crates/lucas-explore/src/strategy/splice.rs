//! Strategy 3: partition-and-splice.
//!
//! Splits the domain at a weight threshold `t` into V_low (weight <= t) and
//! V_high (weight > t), solves each part as its own covering problem, and
//! takes the union. Only the global oracle decides success; a failed splice
//! is reported so callers can retry with another threshold.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lucas_code::{
    coverage_report, enumerate_shift_vectors, is_perfect_code, CoverageSummary, HammingCode,
};
use lucas_model::{Code, Domain, InvalidInput, Vertex};

use super::repair::greedy_repair;
use super::{closed_ball, SearchError};

/// How each partition is solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum PartitionSolver {
    /// Best Hamming coset per partition, restricted to the partition.
    Coset { max_weight: u32 },
    /// Best coset, then greedy repair inside the partition.
    CosetThenRepair { max_weight: u32 },
    /// Greedy repair from an empty code.
    Repair,
}

impl Default for PartitionSolver {
    fn default() -> Self {
        Self::CosetThenRepair { max_weight: 2 }
    }
}

impl PartitionSolver {
    fn coset_weight(&self) -> Option<u32> {
        match self {
            Self::Coset { max_weight } | Self::CosetThenRepair { max_weight } => Some(*max_weight),
            Self::Repair => None,
        }
    }
}

/// Configuration for partition-and-splice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpliceConfig {
    /// Weight threshold: V_low holds the members of weight <= threshold.
    pub threshold: u32,
    pub solver: PartitionSolver,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            threshold: 1,
            solver: PartitionSolver::default(),
        }
    }
}

/// What happened in one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionReport {
    /// Domain vertices in the partition.
    pub vertices: usize,
    /// Codewords chosen for the partition.
    pub codewords: usize,
    /// Coset shift picked for the partition, if a coset solver ran.
    pub shift: Option<Vertex>,
    /// Partition vertices covered exactly once by the partition's own code.
    pub covered_once: usize,
    pub repaired: usize,
    pub stuck: usize,
}

/// Result of partition-and-splice.
#[derive(Debug, Clone, Serialize)]
pub struct SpliceOutcome {
    pub threshold: u32,
    pub perfect: bool,
    pub code: Code,
    pub low: PartitionReport,
    pub high: PartitionReport,
    pub coverage: CoverageSummary,
}

/// Members of weight <= `threshold`, then the rest, both ascending.
pub fn partition_by_weight(
    domain: &Domain,
    threshold: u32,
) -> Result<(Vec<u64>, Vec<u64>), InvalidInput> {
    Ok(domain
        .members()?
        .iter()
        .copied()
        .partition(|bits| bits.count_ones() <= threshold))
}

/// Partition vertices reached by exactly one codeword of `code`.
fn covered_once(code: &Code, part: &[u64], n: u32) -> usize {
    part.iter()
        .filter(|&&v| closed_ball(v, n).filter(|&u| code.contains_bits(u)).count() == 1)
        .count()
}

/// The coset of `hamming` that covers the most of `part` exactly once,
/// keeping only the codewords inside `part`. Ties go to the earlier shift.
fn best_coset(
    hamming: &HammingCode,
    part: &[u64],
    max_weight: u32,
) -> Result<(Vertex, Code), InvalidInput> {
    let n = hamming.width();
    let mut seen = vec![false; 1usize << hamming.r()];
    let mut best: Option<(usize, Vertex, Code)> = None;

    for shift in enumerate_shift_vectors(n, max_weight)? {
        let syndrome = hamming.syndrome(shift.bits()) as usize;
        if std::mem::replace(&mut seen[syndrome], true) {
            continue;
        }
        let offset = shift.bits();
        let sub = Code::from_bits(
            n,
            hamming
                .as_code()
                .bits()
                .map(|w| w ^ offset)
                .filter(|w| part.binary_search(w).is_ok()),
        )?;
        let score = covered_once(&sub, part, n);
        if best.as_ref().map_or(true, |(top, _, _)| score > *top) {
            best = Some((score, shift, sub));
        }
    }

    match best {
        Some((_, shift, sub)) => Ok((shift, sub)),
        // the zero shift is always enumerated
        None => Ok((Vertex::zero(n)?, Code::new(n)?)),
    }
}

fn solve_partition(
    domain: &Domain,
    hamming: Option<&HammingCode>,
    part: &[u64],
    solver: &PartitionSolver,
) -> Result<(Code, PartitionReport), InvalidInput> {
    let n = domain.n();
    let (shift, mut code) = match (solver.coset_weight(), hamming) {
        (Some(max_weight), Some(hamming)) => {
            let (shift, code) = best_coset(hamming, part, max_weight)?;
            (Some(shift), code)
        }
        _ => (None, Code::new(n)?),
    };

    let (repaired, stuck) = match solver {
        PartitionSolver::Coset { .. } => (0, 0),
        PartitionSolver::CosetThenRepair { .. } | PartitionSolver::Repair => {
            let repair = greedy_repair(domain, part, &mut code, None)?;
            (repair.added.len(), repair.stuck.len())
        }
    };

    let report = PartitionReport {
        vertices: part.len(),
        codewords: code.len(),
        shift,
        covered_once: covered_once(&code, part, n),
        repaired,
        stuck,
    };
    Ok((code, report))
}

/// Solve V_low and V_high independently and verify their union.
pub fn partition_and_splice(
    domain: &Domain,
    config: &SpliceConfig,
) -> Result<SpliceOutcome, SearchError> {
    let hamming = match config.solver.coset_weight() {
        Some(_) => Some(HammingCode::for_width(domain.n())?),
        None => None,
    };
    let (low_part, high_part) = partition_by_weight(domain, config.threshold)?;
    info!(
        n = domain.n(),
        s = domain.s(),
        threshold = config.threshold,
        low = low_part.len(),
        high = high_part.len(),
        "partition and splice started"
    );

    let (low_code, low) = solve_partition(domain, hamming.as_ref(), &low_part, &config.solver)?;
    debug!(codewords = low.codewords, covered_once = low.covered_once, "low partition solved");
    let (high_code, high) = solve_partition(domain, hamming.as_ref(), &high_part, &config.solver)?;
    debug!(codewords = high.codewords, covered_once = high.covered_once, "high partition solved");

    let code = low_code.union(&high_code)?;
    let perfect = is_perfect_code(&code, domain)?;
    let coverage = coverage_report(&code, domain)?.summary();
    info!(perfect, size = code.len(), "partition and splice finished");

    Ok(SpliceOutcome {
        threshold: config.threshold,
        perfect,
        code,
        low,
        high,
        coverage,
    })
}
