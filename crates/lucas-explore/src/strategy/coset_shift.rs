//! Strategy 1: Hamming coset shifting.
//!
//! Walks shift vectors in increasing weight (ascending value within a
//! weight class) and tests each coset `H + v` with the oracle. Two shifts
//! with the same syndrome produce the same coset, so only the first shift
//! of each syndrome is tested; the rest are counted as skipped. The result
//! is deterministic and monotone in `max_weight`: raising the bound only
//! appends shifts to the end of the walk.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lucas_code::{
    coset, enumerate_shift_vectors, is_perfect_code, restrict_to_domain, HammingCode,
};
use lucas_model::{Code, Domain, InvalidInput, Vertex};

use super::SearchError;

/// Configuration for coset shifting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CosetShiftConfig {
    /// Largest shift weight tried (capped at n).
    pub max_weight: u32,
    /// Drop non-member codewords from each coset before verification.
    ///
    /// Off by default: a coset then has to be perfect as it stands.
    pub restrict: bool,
}

impl Default for CosetShiftConfig {
    fn default() -> Self {
        Self {
            max_weight: 3,
            restrict: false,
        }
    }
}

/// Result of a coset-shift search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CosetShiftOutcome {
    /// The first shift whose coset passed the oracle.
    Found {
        shift: Vertex,
        weight: u32,
        code: Code,
        /// Distinct cosets tested, including this one.
        examined: u64,
        /// Shifts skipped because their coset was already tested.
        duplicates_skipped: u64,
    },
    /// No coset within the weight bound is perfect.
    Exhausted {
        max_weight: u32,
        examined: u64,
        duplicates_skipped: u64,
    },
}

impl CosetShiftOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn code(&self) -> Option<&Code> {
        match self {
            Self::Found { code, .. } => Some(code),
            Self::Exhausted { .. } => None,
        }
    }

    pub fn examined(&self) -> u64 {
        match self {
            Self::Found { examined, .. } | Self::Exhausted { examined, .. } => *examined,
        }
    }
}

/// A shift worth testing, with the number of duplicates seen before it.
struct Candidate {
    shift: Vertex,
    duplicates_before: u64,
}

/// First-seen shift per syndrome, in walk order, plus the total duplicate count.
fn distinct_shifts(
    hamming: &HammingCode,
    max_weight: u32,
) -> Result<(Vec<Candidate>, u64), InvalidInput> {
    let mut seen = vec![false; 1usize << hamming.r()];
    let mut candidates = Vec::with_capacity(seen.len());
    let mut duplicates = 0u64;
    for shift in enumerate_shift_vectors(hamming.width(), max_weight)? {
        let syndrome = hamming.syndrome(shift.bits()) as usize;
        if seen[syndrome] {
            duplicates += 1;
            continue;
        }
        seen[syndrome] = true;
        candidates.push(Candidate {
            shift,
            duplicates_before: duplicates,
        });
    }
    Ok((candidates, duplicates))
}

/// The coset for `shift` if it passes the oracle.
fn test_shift(
    domain: &Domain,
    hamming: &HammingCode,
    shift: &Vertex,
    restrict: bool,
) -> Result<Option<Code>, InvalidInput> {
    let mut candidate = coset(hamming.as_code(), shift)?;
    if restrict {
        candidate = restrict_to_domain(&candidate, domain)?;
    }
    Ok(is_perfect_code(&candidate, domain)?.then_some(candidate))
}

fn check_hamming_width(domain: &Domain, hamming: &HammingCode) -> Result<(), InvalidInput> {
    if hamming.width() != domain.n() {
        return Err(InvalidInput::WidthMismatch {
            expected: domain.n(),
            found: hamming.width(),
        });
    }
    Ok(())
}

/// Test cosets of `hamming` one at a time, stopping at the first perfect one.
pub fn coset_shift_search(
    domain: &Domain,
    hamming: &HammingCode,
    config: &CosetShiftConfig,
) -> Result<CosetShiftOutcome, SearchError> {
    check_hamming_width(domain, hamming)?;
    info!(
        n = domain.n(),
        s = domain.s(),
        max_weight = config.max_weight,
        restrict = config.restrict,
        "coset shift search started"
    );

    let mut seen = vec![false; 1usize << hamming.r()];
    let mut examined = 0u64;
    let mut duplicates_skipped = 0u64;
    let mut current_weight = 0u32;

    for shift in enumerate_shift_vectors(domain.n(), config.max_weight)? {
        if shift.weight() != current_weight {
            debug!(weight = current_weight, examined, "weight class exhausted");
            current_weight = shift.weight();
        }
        let syndrome = hamming.syndrome(shift.bits()) as usize;
        if seen[syndrome] {
            duplicates_skipped += 1;
            continue;
        }
        seen[syndrome] = true;
        examined += 1;

        if let Some(code) = test_shift(domain, hamming, &shift, config.restrict)? {
            info!(
                shift = %shift,
                weight = shift.weight(),
                size = code.len(),
                examined,
                "perfect coset found"
            );
            return Ok(CosetShiftOutcome::Found {
                weight: shift.weight(),
                shift,
                code,
                examined,
                duplicates_skipped,
            });
        }
    }

    info!(examined, duplicates_skipped, "no perfect coset within bound");
    Ok(CosetShiftOutcome::Exhausted {
        max_weight: config.max_weight,
        examined,
        duplicates_skipped,
    })
}

/// [`coset_shift_search`] with the distinct cosets tested in parallel.
///
/// `find_first` keeps the earliest passing shift in walk order, so the
/// outcome equals the sequential one.
pub fn coset_shift_search_par(
    domain: &Domain,
    hamming: &HammingCode,
    config: &CosetShiftConfig,
) -> Result<CosetShiftOutcome, SearchError> {
    check_hamming_width(domain, hamming)?;
    // Build the membership table once, before the workers share it.
    domain.members()?;

    let (candidates, total_duplicates) = distinct_shifts(hamming, config.max_weight)?;
    info!(
        n = domain.n(),
        s = domain.s(),
        candidates = candidates.len(),
        "parallel coset shift search started"
    );

    let hit = candidates
        .par_iter()
        .enumerate()
        .map(|(i, c)| test_shift(domain, hamming, &c.shift, config.restrict).map(|r| (i, r)))
        .find_first(|result| !matches!(result, Ok((_, None))));

    match hit {
        Some(Ok((i, Some(code)))) => {
            let candidate = &candidates[i];
            info!(shift = %candidate.shift, size = code.len(), "perfect coset found");
            Ok(CosetShiftOutcome::Found {
                shift: candidate.shift,
                weight: candidate.shift.weight(),
                code,
                examined: i as u64 + 1,
                duplicates_skipped: candidate.duplicates_before,
            })
        }
        Some(Err(err)) => Err(err.into()),
        _ => Ok(CosetShiftOutcome::Exhausted {
            max_weight: config.max_weight,
            examined: candidates.len() as u64,
            duplicates_skipped: total_duplicates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_shifts_cover_every_syndrome_once() {
        let ham = HammingCode::new(3).unwrap();
        let (candidates, duplicates) = distinct_shifts(&ham, 7).unwrap();
        assert_eq!(candidates.len(), 8);
        assert_eq!(duplicates, 120);
        // weight 0 plus the seven unit vectors already reach every syndrome
        assert!(candidates.iter().all(|c| c.shift.weight() <= 1));
        assert!(candidates.iter().all(|c| c.duplicates_before == 0));
    }

    #[test]
    fn test_rejects_hamming_of_other_width() {
        let domain = Domain::new(15, 12).unwrap();
        let ham = HammingCode::new(3).unwrap();
        let err = coset_shift_search(&domain, &ham, &CosetShiftConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Input(InvalidInput::WidthMismatch {
                expected: 15,
                found: 7
            })
        ));
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = CosetShiftOutcome::Exhausted {
            max_weight: 2,
            examined: 8,
            duplicates_skipped: 21,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "exhausted");
        assert_eq!(json["examined"], 8);
    }
}
