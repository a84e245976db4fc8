//! Codes: sets of vertices of a common width.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;
use crate::vertex::{check_width, width_mask, Vertex};

/// A set of codewords. Order is irrelevant and duplicates collapse.
///
/// Equality is set equality. Iteration is in ascending bit-pattern order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CodeRepr", try_from = "CodeRepr")]
pub struct Code {
    width: u32,
    words: BTreeSet<u64>,
}

impl Code {
    /// An empty code over n-bit vertices.
    pub fn new(width: u32) -> Result<Self, InvalidInput> {
        check_width(width)?;
        Ok(Self {
            width,
            words: BTreeSet::new(),
        })
    }

    pub fn from_vertices<I>(width: u32, vertices: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = Vertex>,
    {
        let mut code = Self::new(width)?;
        for vertex in vertices {
            code.insert(vertex)?;
        }
        Ok(code)
    }

    pub fn from_bits<I>(width: u32, bits: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut code = Self::new(width)?;
        let mask = width_mask(width);
        for word in bits {
            if word & !mask != 0 {
                return Err(InvalidInput::BitsOutOfRange {
                    bits: word,
                    n: width,
                });
            }
            code.words.insert(word);
        }
        Ok(code)
    }

    /// Parse one codeword per line; blank lines are skipped.
    pub fn parse_lines(width: u32, text: &str) -> Result<Self, InvalidInput> {
        let mut code = Self::new(width)?;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            code.insert(line.parse()?)?;
        }
        Ok(code)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add a codeword. Returns false if it was already present.
    pub fn insert(&mut self, vertex: Vertex) -> Result<bool, InvalidInput> {
        self.check_vertex(&vertex)?;
        Ok(self.words.insert(vertex.bits()))
    }

    pub fn remove(&mut self, vertex: &Vertex) -> Result<bool, InvalidInput> {
        self.check_vertex(vertex)?;
        Ok(self.words.remove(&vertex.bits()))
    }

    pub fn contains(&self, vertex: &Vertex) -> bool {
        vertex.width() == self.width && self.words.contains(&vertex.bits())
    }

    pub fn contains_bits(&self, bits: u64) -> bool {
        self.words.contains(&bits)
    }

    /// Add `bits` if absent, remove it if present. Returns true if it was added.
    ///
    /// Bits past the width are masked off.
    pub fn toggle_bits(&mut self, bits: u64) -> bool {
        let bits = bits & width_mask(self.width);
        if self.words.remove(&bits) {
            false
        } else {
            self.words.insert(bits);
            true
        }
    }

    pub fn insert_bits(&mut self, bits: u64) -> bool {
        self.words.insert(bits & width_mask(self.width))
    }

    pub fn remove_bits(&mut self, bits: u64) -> bool {
        self.words.remove(&bits)
    }

    /// Keep only the codewords for which `keep` returns true.
    pub fn retain_bits<F: FnMut(u64) -> bool>(&mut self, mut keep: F) {
        self.words.retain(|&w| keep(w));
    }

    pub fn union(&self, other: &Code) -> Result<Code, InvalidInput> {
        if self.width != other.width {
            return Err(InvalidInput::WidthMismatch {
                expected: self.width,
                found: other.width,
            });
        }
        Ok(Code {
            width: self.width,
            words: self.words.union(&other.words).copied().collect(),
        })
    }

    /// Codeword bit patterns in ascending order.
    pub fn bits(&self) -> impl Iterator<Item = u64> + '_ {
        self.words.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vertex> + '_ {
        let width = self.width;
        self.words.iter().map(move |&bits| Vertex::from_raw(bits, width))
    }

    pub fn to_vertices(&self) -> Vec<Vertex> {
        self.iter().collect()
    }

    fn check_vertex(&self, vertex: &Vertex) -> Result<(), InvalidInput> {
        if vertex.width() != self.width {
            return Err(InvalidInput::WidthMismatch {
                expected: self.width,
                found: vertex.width(),
            });
        }
        Ok(())
    }
}

/// Wire form: width plus codewords in text form.
#[derive(Clone, Serialize, Deserialize)]
struct CodeRepr {
    width: u32,
    words: Vec<Vertex>,
}

impl From<Code> for CodeRepr {
    fn from(code: Code) -> Self {
        Self {
            width: code.width,
            words: code.to_vertices(),
        }
    }
}

impl TryFrom<CodeRepr> for Code {
    type Error = InvalidInput;

    fn try_from(repr: CodeRepr) -> Result<Self, Self::Error> {
        Code::from_vertices(repr.width, repr.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Vertex {
        text.parse().unwrap()
    }

    #[test]
    fn test_duplicates_collapse() {
        let code = Code::from_vertices(3, [v("010"), v("101"), v("010")]).unwrap();
        assert_eq!(code.len(), 2);
        assert!(code.contains(&v("101")));
        assert!(!code.contains(&v("1010")));
    }

    #[test]
    fn test_insert_rejects_other_width() {
        let mut code = Code::new(3).unwrap();
        assert!(code.insert(v("0101")).is_err());
        assert!(code.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut code = Code::new(4).unwrap();
        assert!(code.toggle_bits(0b0110));
        assert!(code.contains_bits(0b0110));
        assert!(!code.toggle_bits(0b0110));
        assert!(code.is_empty());
    }

    #[test]
    fn test_parse_lines_skips_blanks() {
        let code = Code::parse_lines(3, "010\n\n 101 \n").unwrap();
        assert_eq!(code.to_vertices(), vec![v("010"), v("101")]);
        assert!(Code::parse_lines(3, "0101\n").is_err());
    }

    #[test]
    fn test_serde_round_trip_uses_text_form() {
        let code = Code::from_vertices(3, [v("100"), v("011")]).unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, r#"{"width":3,"words":["100","011"]}"#);
        let back: Code = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
