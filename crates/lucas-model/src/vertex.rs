//! Fixed-width bit vectors.
//!
//! A [`Vertex`] is an n-bit string stored as a bitmask: bit `i` is set iff
//! position `i` holds a 1. The canonical text form lists position 0 first,
//! exactly n characters of `'0'`/`'1'` with no separators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Widest vertex the `u64` representation supports.
pub const MAX_WIDTH: u32 = 63;

/// Mask with the low `n` bits set.
pub fn width_mask(n: u32) -> u64 {
    debug_assert!(n <= MAX_WIDTH);
    (1u64 << n) - 1
}

/// Validate a vertex width.
pub fn check_width(n: u32) -> Result<(), InvalidInput> {
    if n == 0 {
        return Err(InvalidInput::EmptyWidth);
    }
    if n > MAX_WIDTH {
        return Err(InvalidInput::WidthTooLarge { n, max: MAX_WIDTH });
    }
    Ok(())
}

/// An n-bit vertex of the hypercube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Vertex {
    width: u32,
    bits: u64,
}

impl Vertex {
    pub fn new(bits: u64, width: u32) -> Result<Self, InvalidInput> {
        check_width(width)?;
        if bits & !width_mask(width) != 0 {
            return Err(InvalidInput::BitsOutOfRange { bits, n: width });
        }
        Ok(Self { width, bits })
    }

    /// The all-zero vertex.
    pub fn zero(width: u32) -> Result<Self, InvalidInput> {
        Self::new(0, width)
    }

    /// Build from bits already known to fit the width.
    pub(crate) fn from_raw(bits: u64, width: u32) -> Self {
        debug_assert!(bits & !width_mask(width) == 0);
        Self { width, bits }
    }

    /// A vertex of the same width holding `bits`, truncated to the width.
    pub fn with_bits(&self, bits: u64) -> Self {
        Self {
            width: self.width,
            bits: bits & width_mask(self.width),
        }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn weight(&self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_set(&self, position: u32) -> bool {
        position < self.width && (self.bits >> position) & 1 == 1
    }

    /// Flip one position. Positions past the width are ignored.
    pub fn flip(self, position: u32) -> Self {
        if position >= self.width {
            return self;
        }
        Self {
            width: self.width,
            bits: self.bits ^ (1u64 << position),
        }
    }

    /// Cyclic rotation: the bit at position `i` moves to `(i + k) mod n`.
    pub fn rotate(self, k: u32) -> Self {
        let n = self.width;
        let k = k % n;
        if k == 0 {
            return self;
        }
        let bits = ((self.bits << k) | (self.bits >> (n - k))) & width_mask(n);
        Self { width: n, bits }
    }

    /// Bitwise XOR of two vertices of equal width.
    pub fn xor(&self, other: &Vertex) -> Result<Self, InvalidInput> {
        self.same_width(other)?;
        Ok(Self {
            width: self.width,
            bits: self.bits ^ other.bits,
        })
    }

    pub fn distance(&self, other: &Vertex) -> Result<u32, InvalidInput> {
        self.same_width(other)?;
        Ok((self.bits ^ other.bits).count_ones())
    }

    fn same_width(&self, other: &Vertex) -> Result<(), InvalidInput> {
        if self.width != other.width {
            return Err(InvalidInput::WidthMismatch {
                expected: self.width,
                found: other.width,
            });
        }
        Ok(())
    }
}

/// Number of positions where `u` and `v` differ.
pub fn hamming_distance(u: &Vertex, v: &Vertex) -> Result<u32, InvalidInput> {
    u.distance(v)
}

/// Number of 1-bits in `v`.
pub fn hamming_weight(v: &Vertex) -> u32 {
    v.weight()
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in 0..self.width {
            f.write_str(if self.is_set(position) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Vertex {
    type Err = InvalidInput;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let width = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        check_width(width)?;
        let mut bits = 0u64;
        for (position, ch) in text.chars().enumerate() {
            match ch {
                '0' => {}
                '1' => bits |= 1u64 << position,
                found => return Err(InvalidInput::InvalidBit { found, position }),
            }
        }
        Ok(Self { width, bits })
    }
}

impl From<Vertex> for String {
    fn from(vertex: Vertex) -> Self {
        vertex.to_string()
    }
}

impl TryFrom<String> for Vertex {
    type Error = InvalidInput;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}
