//! Coset and shift-vector algebra.

use lucas_model::{Code, Domain, InvalidInput, Vertex};

/// `{c ^ shift : c in code}` as a new code; `code` is left untouched.
pub fn coset(code: &Code, shift: &Vertex) -> Result<Code, InvalidInput> {
    if shift.width() != code.width() {
        return Err(InvalidInput::WidthMismatch {
            expected: code.width(),
            found: shift.width(),
        });
    }
    let offset = shift.bits();
    Code::from_bits(code.width(), code.bits().map(|word| word ^ offset))
}

/// Drop every codeword that is not a member of `domain`.
pub fn restrict_to_domain(code: &Code, domain: &Domain) -> Result<Code, InvalidInput> {
    if code.width() != domain.n() {
        return Err(InvalidInput::WidthMismatch {
            expected: domain.n(),
            found: code.width(),
        });
    }
    let mut restricted = code.clone();
    restricted.retain_bits(|word| domain.contains_bits(word));
    Ok(restricted)
}

/// All n-bit vertices of weight 0, then weight 1, ..., up to a bound.
///
/// Within a weight class vertices come in ascending bit-pattern order, so
/// the sequence is identical from run to run.
#[derive(Debug, Clone)]
pub struct ShiftVectors {
    zero: Vertex,
    max_weight: u32,
    weight: u32,
    next: Option<u64>,
}

impl ShiftVectors {
    pub fn new(width: u32, max_weight: u32) -> Result<Self, InvalidInput> {
        let zero = Vertex::zero(width)?;
        Ok(Self {
            zero,
            max_weight: max_weight.min(width),
            weight: 0,
            next: Some(0),
        })
    }

    /// Weight of the vertex the next call to `next` yields.
    pub fn current_weight(&self) -> Option<u32> {
        self.next.map(|_| self.weight)
    }
}

/// Next larger pattern with the same number of ones (Gosper's hack).
fn next_same_weight(x: u64) -> u64 {
    let lowest = x & x.wrapping_neg();
    let ripple = x + lowest;
    (((ripple ^ x) >> 2) / lowest) | ripple
}

impl Iterator for ShiftVectors {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        let current = self.next?;
        let limit = 1u64 << self.zero.width();

        let following = if current == 0 {
            None
        } else {
            Some(next_same_weight(current)).filter(|&x| x < limit)
        };
        self.next = match following {
            Some(x) => Some(x),
            None if self.weight < self.max_weight => {
                self.weight += 1;
                Some((1u64 << self.weight) - 1)
            }
            None => None,
        };

        Some(self.zero.with_bits(current))
    }
}

/// Lazily enumerate shift vectors of width `n` by increasing weight.
pub fn enumerate_shift_vectors(n: u32, max_weight: u32) -> Result<ShiftVectors, InvalidInput> {
    ShiftVectors::new(n, max_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_by_weight_then_value() {
        let bits: Vec<u64> = enumerate_shift_vectors(4, 2)
            .unwrap()
            .map(|v| v.bits())
            .collect();
        assert_eq!(
            bits,
            vec![0, 1, 2, 4, 8, 0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100]
        );
    }

    #[test]
    fn test_full_enumeration_visits_every_vertex_once() {
        let mut seen: Vec<u64> = enumerate_shift_vectors(6, 6)
            .unwrap()
            .map(|v| v.bits())
            .collect();
        assert_eq!(seen.len(), 64);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn test_weight_bound_is_capped_by_width() {
        assert_eq!(enumerate_shift_vectors(3, 10).unwrap().count(), 8);
        assert_eq!(enumerate_shift_vectors(3, 0).unwrap().count(), 1);
    }

    #[test]
    fn test_restrict_drops_non_members() {
        let domain = Domain::new(3, 2).unwrap();
        let code = Code::from_bits(3, [0b000, 0b111, 0b011, 0b100]).unwrap();
        let restricted = restrict_to_domain(&code, &domain).unwrap();
        assert_eq!(restricted.bits().collect::<Vec<_>>(), vec![0b000, 0b100]);
        assert_eq!(code.len(), 4);
    }

    #[test]
    fn test_coset_rejects_wrong_width() {
        let code = Code::from_bits(3, [0b000, 0b111]).unwrap();
        let shift: Vertex = "0100".parse().unwrap();
        assert!(coset(&code, &shift).is_err());
    }
}
