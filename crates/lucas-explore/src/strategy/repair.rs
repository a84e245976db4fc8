//! Strategy 2: puncture-and-repair.
//!
//! Starts from a perfect code of the looser domain Λn(1^(s+1)), drops the
//! codewords that the tighter domain forbids and greedily re-covers the
//! vertices they leave uncovered.
//!
//! The greedy step always targets the smallest uncovered vertex `u`. Its
//! candidates are the vertices of `u`'s closed neighborhood that lie in the
//! target set and sit at distance at least 3 from every codeword. The
//! candidate covering the most uncovered vertices wins, ties going to the
//! lowest vertex. When `u` has no legal candidate it is recorded as stuck
//! and left uncovered. Legality only shrinks as codewords are added, so a
//! stuck vertex never becomes coverable later.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lucas_code::{coverage_report, is_perfect_code, CoverageSummary};
use lucas_model::{Code, Domain, InvalidInput, Vertex, MAX_ENUMERATION_WIDTH};

use super::{check_code_width, closed_ball, has_close_codeword, SearchError};

/// Configuration for puncture-and-repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairConfig {
    /// Stop after this many additions. `None` repairs until no move is left.
    pub max_additions: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    /// The repaired code passed the oracle.
    Perfect,
    /// Legal moves ran out first; the code is the best partial answer.
    Partial,
}

/// Result of puncture-and-repair.
#[derive(Debug, Clone, Serialize)]
pub struct RepairOutcome {
    pub status: RepairStatus,
    pub code: Code,
    /// Seed codewords outside the target domain.
    pub removed: Vec<Vertex>,
    /// Codewords added by the repair, in order.
    pub added: Vec<Vertex>,
    /// Uncovered vertices that had no legal candidate.
    pub stuck: Vec<Vertex>,
    pub coverage: CoverageSummary,
}

impl RepairOutcome {
    pub fn is_perfect(&self) -> bool {
        self.status == RepairStatus::Perfect
    }
}

/// Bookkeeping from one greedy pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct GreedyRepair {
    pub added: Vec<u64>,
    pub stuck: Vec<u64>,
}

/// Greedily cover the vertices of `targets`, choosing new codewords only
/// from `targets`.
///
/// `targets` must be domain members in ascending order. `code` is extended
/// in place.
pub(crate) fn greedy_repair(
    domain: &Domain,
    targets: &[u64],
    code: &mut Code,
    max_additions: Option<usize>,
) -> Result<GreedyRepair, InvalidInput> {
    check_code_width(code, domain)?;
    let n = domain.n();
    if n > MAX_ENUMERATION_WIDTH {
        return Err(InvalidInput::EnumerationTooLarge {
            n,
            max: MAX_ENUMERATION_WIDTH,
        });
    }

    let size = 1usize << n;
    let mut in_targets = vec![false; size];
    for &t in targets {
        in_targets[t as usize] = true;
    }
    let mut counts = vec![0u8; size];
    for word in code.bits() {
        for u in closed_ball(word, n) {
            counts[u as usize] = counts[u as usize].saturating_add(1);
        }
    }

    let mut pending: BTreeSet<u64> = targets
        .iter()
        .copied()
        .filter(|&t| counts[t as usize] == 0)
        .collect();
    let mut result = GreedyRepair::default();

    while let Some(target) = pending.first().copied() {
        if max_additions.is_some_and(|max| result.added.len() >= max) {
            debug!(added = result.added.len(), "repair addition cap reached");
            break;
        }

        let best = closed_ball(target, n)
            .filter(|&c| in_targets[c as usize] && !has_close_codeword(code, c, n))
            .map(|c| {
                let gain = closed_ball(c, n)
                    .filter(|&u| in_targets[u as usize] && counts[u as usize] == 0)
                    .count();
                (gain, c)
            })
            .max_by_key(|&(gain, c)| (gain, Reverse(c)));

        match best {
            Some((gain, c)) => {
                code.insert_bits(c);
                for u in closed_ball(c, n) {
                    counts[u as usize] = counts[u as usize].saturating_add(1);
                    pending.remove(&u);
                }
                result.added.push(c);
                debug!(codeword = c, gain, remaining = pending.len(), "repair added codeword");
            }
            None => {
                pending.remove(&target);
                result.stuck.push(target);
                debug!(vertex = target, "no legal candidate for uncovered vertex");
            }
        }
    }

    Ok(result)
}

/// Puncture `base` to `domain` and greedily repair coverage.
///
/// `base` is meant to be a perfect code of the next looser domain, but any
/// code of the right width is accepted; the oracle decides the status.
pub fn puncture_and_repair(
    base: &Code,
    domain: &Domain,
    config: &RepairConfig,
) -> Result<RepairOutcome, SearchError> {
    check_code_width(base, domain)?;
    let members = domain.members()?;
    info!(
        n = domain.n(),
        s = domain.s(),
        seed_size = base.len(),
        "puncture and repair started"
    );

    let mut code = base.clone();
    code.retain_bits(|word| domain.contains_bits(word));
    let removed: Vec<Vertex> = base
        .iter()
        .filter(|word| !domain.contains_bits(word.bits()))
        .collect();

    let repair = greedy_repair(domain, members, &mut code, config.max_additions)?;
    let coverage = coverage_report(&code, domain)?.summary();
    let status = if is_perfect_code(&code, domain)? {
        RepairStatus::Perfect
    } else {
        RepairStatus::Partial
    };

    info!(
        removed = removed.len(),
        added = repair.added.len(),
        stuck = repair.stuck.len(),
        size = code.len(),
        ?status,
        "puncture and repair finished"
    );

    let zero = Vertex::zero(domain.n())?;
    Ok(RepairOutcome {
        status,
        removed,
        added: repair.added.iter().map(|&b| zero.with_bits(b)).collect(),
        stuck: repair.stuck.iter().map(|&b| zero.with_bits(b)).collect(),
        coverage,
        code,
    })
}
