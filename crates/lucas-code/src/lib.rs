//! Linear-code utilities and the perfect-code verifier.

pub mod coset;
pub mod hamming;
pub mod verify;

pub use coset::{coset, enumerate_shift_vectors, restrict_to_domain, ShiftVectors};
pub use hamming::{build_hamming_code, HammingCode, MAX_REDUNDANCY};
pub use verify::{
    close_pairs, coverage_report, coverage_report_over, has_minimum_distance_three,
    is_perfect_code, is_perfect_code_over, sphere_bound, verify, CoverageReport,
    CoverageSummary, Verification,
};
