//! The code-discovery strategies.
//!
//! - [`coset_shift`]: Hamming cosets tested in increasing shift weight.
//! - [`repair`]: puncture a looser-domain perfect code, then greedy repair.
//! - [`splice`]: solve the low- and high-weight partitions apart, then merge.
//! - [`anneal`]: simulated annealing over vertex subsets.
//! - [`genetic`]: genetic search with an optional memetic repair step.

pub mod anneal;
pub mod coset_shift;
pub mod energy;
pub mod genetic;
pub mod repair;
pub mod splice;

use lucas_model::{Code, Domain, InvalidInput};

/// Errors during search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid input: {0}")]
    Input(#[from] InvalidInput),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// `center` followed by its n hypercube neighbors.
pub(crate) fn closed_ball(center: u64, n: u32) -> impl Iterator<Item = u64> {
    std::iter::once(center).chain((0..n).map(move |i| center ^ (1u64 << i)))
}

/// True iff some codeword lies within distance 2 of `candidate`.
pub(crate) fn has_close_codeword(code: &Code, candidate: u64, n: u32) -> bool {
    closed_ball(candidate, n).any(|one| {
        code.contains_bits(one) || (0..n).any(|j| code.contains_bits(one ^ (1u64 << j)))
    })
}

pub(crate) fn check_code_width(code: &Code, domain: &Domain) -> Result<(), InvalidInput> {
    if code.width() != domain.n() {
        return Err(InvalidInput::WidthMismatch {
            expected: domain.n(),
            found: code.width(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_ball_lists_center_first() {
        let ball: Vec<u64> = closed_ball(0b101, 3).collect();
        assert_eq!(ball, vec![0b101, 0b100, 0b111, 0b001]);
    }

    #[test]
    fn test_close_codeword_reaches_distance_two() {
        let code = Code::from_bits(5, [0b00000]).unwrap();
        assert!(has_close_codeword(&code, 0b00000, 5));
        assert!(has_close_codeword(&code, 0b00100, 5));
        assert!(has_close_codeword(&code, 0b10100, 5));
        assert!(!has_close_codeword(&code, 0b10101, 5));
    }
}
