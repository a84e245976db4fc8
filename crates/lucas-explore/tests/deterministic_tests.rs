//! Coset shifting, puncture-and-repair and partition-and-splice.

use lucas_code::{coset, is_perfect_code, HammingCode};
use lucas_explore::{
    coset_shift_search, coset_shift_search_par, partition_and_splice, puncture_and_repair,
    CosetShiftConfig, CosetShiftOutcome, PartitionSolver, RepairConfig, RepairStatus,
    SearchError, SpliceConfig,
};
use lucas_model::{Code, Domain, InvalidInput, Vertex};
use test_case::test_case;

fn v(text: &str) -> Vertex {
    text.parse().unwrap()
}

fn strict(max_weight: u32) -> CosetShiftConfig {
    CosetShiftConfig {
        max_weight,
        restrict: false,
    }
}

fn restricted(max_weight: u32) -> CosetShiftConfig {
    CosetShiftConfig {
        max_weight,
        restrict: true,
    }
}

// ---------------------------------------------------------------------------
// Strategy 1
// ---------------------------------------------------------------------------

#[test]
fn test_full_run_domain_needs_a_weight_one_shift() {
    let domain = Domain::new(7, 7).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let outcome = coset_shift_search(&domain, &ham, &strict(3)).unwrap();
    match outcome {
        CosetShiftOutcome::Found {
            shift,
            weight,
            code,
            examined,
            duplicates_skipped,
        } => {
            assert_eq!(shift, v("1000000"));
            assert_eq!(weight, 1);
            assert_eq!(code.len(), 16);
            assert_eq!(examined, 2);
            assert_eq!(duplicates_skipped, 0);
            assert!(is_perfect_code(&code, &domain).unwrap());
        }
        other => panic!("expected a perfect coset, got {other:?}"),
    }
}

#[test]
fn test_strict_cosets_never_fit_tighter_domain() {
    // Every coset of Ham(3) meets a vertex with a cyclic run of five ones.
    let domain = Domain::new(7, 5).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let outcome = coset_shift_search(&domain, &ham, &strict(7)).unwrap();
    assert_eq!(
        outcome,
        CosetShiftOutcome::Exhausted {
            max_weight: 7,
            examined: 8,
            duplicates_skipped: 120,
        }
    );
}

#[test_case(5; "five")]
#[test_case(6; "six")]
fn test_restricted_zero_shift_is_perfect(s: u32) {
    let domain = Domain::new(7, s).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let outcome = coset_shift_search(&domain, &ham, &restricted(0)).unwrap();
    let code = outcome.code().unwrap();
    assert_eq!(code.len(), 15);
    assert!(!code.contains(&v("1111111")));
}

#[test]
fn test_unconstrained_domain_accepts_hamming_code_itself() {
    let domain = Domain::new(7, 8).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let outcome = coset_shift_search(&domain, &ham, &strict(0)).unwrap();
    assert_eq!(outcome.code(), Some(ham.as_code()));
}

#[test]
fn test_monotone_in_max_weight() {
    let domain = Domain::new(7, 7).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let outcomes: Vec<_> = (0..=7)
        .map(|w| coset_shift_search(&domain, &ham, &strict(w)).unwrap())
        .collect();
    assert!(!outcomes[0].is_found());
    assert_eq!(outcomes[0].examined(), 1);
    for later in &outcomes[1..] {
        assert_eq!(later.code(), outcomes[1].code());
    }
}

#[test_case(15, 16, false, 0; "hamming code in full cube")]
#[test_case(15, 15, false, 1; "unit shift avoids all ones")]
#[test_case(15, 13, true, 0; "restricted thirteen")]
fn test_length_fifteen_cosets(n: u32, s: u32, restrict: bool, weight: u32) {
    let domain = Domain::new(n, s).unwrap();
    let ham = HammingCode::new(4).unwrap();
    let config = CosetShiftConfig {
        max_weight: 1,
        restrict,
    };
    match coset_shift_search(&domain, &ham, &config).unwrap() {
        CosetShiftOutcome::Found { weight: w, code, .. } => {
            assert_eq!(w, weight);
            assert!(is_perfect_code(&code, &domain).unwrap());
        }
        other => panic!("expected a perfect coset, got {other:?}"),
    }
}

#[test]
fn test_open_case_has_no_low_weight_coset() {
    let domain = Domain::new(15, 12).unwrap();
    let ham = HammingCode::new(4).unwrap();
    for config in [strict(1), restricted(1)] {
        let outcome = coset_shift_search(&domain, &ham, &config).unwrap();
        assert!(!outcome.is_found());
        assert_eq!(outcome.examined(), 16);
    }
}

#[test_case(7, 7, strict(3))]
#[test_case(7, 5, strict(7))]
#[test_case(7, 5, restricted(2))]
#[test_case(15, 15, strict(2))]
fn test_parallel_search_matches_sequential(n: u32, s: u32, config: CosetShiftConfig) {
    let domain = Domain::new(n, s).unwrap();
    let ham = HammingCode::for_width(n).unwrap();
    assert_eq!(
        coset_shift_search_par(&domain, &ham, &config).unwrap(),
        coset_shift_search(&domain, &ham, &config).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Strategy 2
// ---------------------------------------------------------------------------

#[test]
fn test_puncturing_hamming_code_to_five_needs_no_repair() {
    let domain = Domain::new(7, 5).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let outcome = puncture_and_repair(ham.as_code(), &domain, &RepairConfig::default()).unwrap();
    assert_eq!(outcome.status, RepairStatus::Perfect);
    assert_eq!(outcome.removed, vec![v("1111111")]);
    assert!(outcome.added.is_empty());
    assert!(outcome.stuck.is_empty());
    assert_eq!(outcome.code.len(), 15);
    assert_eq!(outcome.coverage.exactly_once, 113);
}

#[test]
fn test_repair_from_empty_code_builds_perfect_code() {
    let domain = Domain::new(7, 5).unwrap();
    let outcome =
        puncture_and_repair(&Code::new(7).unwrap(), &domain, &RepairConfig::default()).unwrap();
    assert!(outcome.is_perfect());
    assert_eq!(outcome.added.len(), 15);
    assert!(is_perfect_code(&outcome.code, &domain).unwrap());
}

#[test]
fn test_punctured_full_run_coset_stays_partial() {
    let domain = Domain::new(7, 6).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let base = coset(ham.as_code(), &v("1000000")).unwrap();
    let outcome = puncture_and_repair(&base, &domain, &RepairConfig::default()).unwrap();
    assert_eq!(outcome.status, RepairStatus::Partial);
    assert_eq!(outcome.removed, vec![v("0111111")]);
    assert!(outcome.added.is_empty());
    assert_eq!(outcome.stuck.len(), 6);
    assert_eq!(outcome.coverage.uncovered, 6);
    assert_eq!(outcome.code.len(), 15);
}

#[test]
fn test_lucas_cube_repair_runs_out_of_moves() {
    let domain = Domain::new(7, 2).unwrap();
    let ham = HammingCode::new(3).unwrap();
    let outcome = puncture_and_repair(ham.as_code(), &domain, &RepairConfig::default()).unwrap();
    assert_eq!(outcome.status, RepairStatus::Partial);
    assert_eq!(outcome.removed.len(), 13);
    assert_eq!(outcome.added, vec![v("1010100")]);
    assert_eq!(outcome.stuck.len(), 9);
    assert_eq!(outcome.code.len(), 4);
    // stuck vertices are exactly the uncovered ones
    assert_eq!(outcome.coverage.uncovered, 9);
}

#[test]
fn test_tie_break_blocks_small_domain() {
    let domain = Domain::new(3, 3).unwrap();
    let outcome =
        puncture_and_repair(&Code::new(3).unwrap(), &domain, &RepairConfig::default()).unwrap();
    assert_eq!(outcome.status, RepairStatus::Partial);
    assert_eq!(outcome.added, vec![v("000")]);
    assert_eq!(outcome.stuck, vec![v("110"), v("101"), v("011")]);
}

#[test]
fn test_repair_rejects_wrong_width() {
    let domain = Domain::new(7, 5).unwrap();
    let err = puncture_and_repair(&Code::new(6).unwrap(), &domain, &RepairConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::Input(InvalidInput::WidthMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Strategy 3
// ---------------------------------------------------------------------------

#[test]
fn test_splice_of_two_coset_halves_is_perfect() {
    let domain = Domain::new(7, 7).unwrap();
    let config = SpliceConfig {
        threshold: 3,
        solver: PartitionSolver::Coset { max_weight: 2 },
    };
    let outcome = partition_and_splice(&domain, &config).unwrap();
    assert!(outcome.perfect);
    assert_eq!((outcome.low.vertices, outcome.low.codewords), (64, 8));
    assert_eq!((outcome.high.vertices, outcome.high.codewords), (63, 8));
    assert_eq!(outcome.code.len(), 16);
    assert_eq!(outcome.coverage.exactly_once, 127);
}

#[test]
fn test_splice_with_repair_solver() {
    let domain = Domain::new(7, 5).unwrap();
    let config = SpliceConfig {
        threshold: 1,
        solver: PartitionSolver::Repair,
    };
    let outcome = partition_and_splice(&domain, &config).unwrap();
    assert!(outcome.perfect);
    assert_eq!((outcome.low.vertices, outcome.low.codewords), (8, 1));
    assert_eq!((outcome.high.vertices, outcome.high.codewords), (105, 14));
    assert_eq!(outcome.low.shift, None);
}

#[test]
fn test_threshold_past_width_leaves_high_partition_empty() {
    let domain = Domain::new(7, 5).unwrap();
    let config = SpliceConfig {
        threshold: 7,
        solver: PartitionSolver::Coset { max_weight: 0 },
    };
    let outcome = partition_and_splice(&domain, &config).unwrap();
    assert!(outcome.perfect);
    assert_eq!(outcome.high.vertices, 0);
    assert_eq!(outcome.code.len(), 15);
}

#[test]
fn test_failed_splice_is_reported_not_raised() {
    let domain = Domain::new(3, 2).unwrap();
    let config = SpliceConfig {
        threshold: 0,
        solver: PartitionSolver::Repair,
    };
    let outcome = partition_and_splice(&domain, &config).unwrap();
    assert!(!outcome.perfect);
    assert_eq!(outcome.code.to_vertices(), vec![v("000"), v("100")]);
    assert_eq!(outcome.high.stuck, 2);
}

#[test]
fn test_coset_solver_needs_hamming_length() {
    let domain = Domain::new(8, 3).unwrap();
    let err = partition_and_splice(&domain, &SpliceConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Input(InvalidInput::NotHammingLength { n: 8 })
    ));
}
