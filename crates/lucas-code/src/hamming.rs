//! Binary Hamming codes Ham(r, 2).
//!
//! Position `j` (0-based) of a length-(2^r - 1) word carries parity-check
//! column `j + 1`. A word is a codeword iff the XOR of the columns at its
//! set positions (the syndrome) is zero. The code is built as the
//! XOR-closure of a systematic generator basis: one generator per data
//! position, completed by the parity positions `2^k - 1`.

use lucas_model::{Code, InvalidInput};

/// Largest supported redundancy. Ham(5, 2) already has 2^26 codewords.
pub const MAX_REDUNDANCY: u32 = 4;

/// Ham(r, 2): length 2^r - 1, dimension 2^r - 1 - r, minimum distance 3.
#[derive(Debug, Clone)]
pub struct HammingCode {
    r: u32,
    generators: Vec<u64>,
    code: Code,
}

impl HammingCode {
    pub fn new(r: u32) -> Result<Self, InvalidInput> {
        if r < 2 {
            return Err(InvalidInput::RedundancyTooSmall { r });
        }
        if r > MAX_REDUNDANCY {
            return Err(InvalidInput::RedundancyTooLarge {
                r,
                max: MAX_REDUNDANCY,
            });
        }
        let width = (1u32 << r) - 1;

        let generators: Vec<u64> = (0..width)
            .filter(|&d| !(d + 1).is_power_of_two())
            .map(|d| {
                let column = u64::from(d + 1);
                let parity = (0..r)
                    .filter(|k| (column >> k) & 1 == 1)
                    .fold(0u64, |acc, k| acc | 1u64 << ((1u64 << k) - 1));
                (1u64 << d) | parity
            })
            .collect();

        // Closure over all 2^k generator subsets: each word extends the word
        // of its mask without the lowest set bit.
        let dimension = generators.len();
        let mut words = vec![0u64; 1usize << dimension];
        for mask in 1..words.len() {
            let low = mask.trailing_zeros() as usize;
            words[mask] = words[mask & (mask - 1)] ^ generators[low];
        }

        Ok(Self {
            r,
            generators,
            code: Code::from_bits(width, words)?,
        })
    }

    /// The Hamming code whose length is `n`, if `n = 2^r - 1`.
    pub fn for_width(n: u32) -> Result<Self, InvalidInput> {
        let Some(length) = n
            .checked_add(1)
            .filter(|l| l.is_power_of_two() && *l >= 4)
        else {
            return Err(InvalidInput::NotHammingLength { n });
        };
        Self::new(length.trailing_zeros())
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn width(&self) -> u32 {
        self.code.width()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn generators(&self) -> &[u64] {
        &self.generators
    }

    pub fn as_code(&self) -> &Code {
        &self.code
    }

    /// XOR of the parity-check columns at the set positions of `bits`.
    pub fn syndrome(&self, bits: u64) -> u64 {
        let mut syndrome = 0u64;
        let mut rest = bits & self.code_mask();
        while rest != 0 {
            let position = rest.trailing_zeros();
            syndrome ^= u64::from(position + 1);
            rest &= rest - 1;
        }
        syndrome
    }

    pub fn contains_bits(&self, bits: u64) -> bool {
        bits & !self.code_mask() == 0 && self.syndrome(bits) == 0
    }

    /// The unique codeword within distance 1 of `bits` (syndrome decoding).
    pub fn nearest(&self, bits: u64) -> u64 {
        let bits = bits & self.code_mask();
        match self.syndrome(bits) {
            0 => bits,
            column => bits ^ (1u64 << (column - 1)),
        }
    }

    fn code_mask(&self) -> u64 {
        (1u64 << self.width()) - 1
    }
}

/// Construct Ham(r, 2).
pub fn build_hamming_code(r: u32) -> Result<HammingCode, InvalidInput> {
    HammingCode::new(r)
}
