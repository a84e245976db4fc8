//! Perfect-code verification.
//!
//! This module is the single correctness oracle: every strategy, and every
//! caller, declares success only through [`is_perfect_code`] (or its
//! sampled variant). A code is perfect in Λn(1^s) iff
//! 1. every codeword is a domain member,
//! 2. distinct codewords are at Hamming distance at least 3, and
//! 3. every domain vertex lies within distance 1 of exactly one codeword.

use serde::Serialize;

use lucas_model::{Code, Domain, InvalidInput, Vertex};

/// Per-vertex coverage counts over the examined domain vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// All-zero vertex of the report's width.
    zero: Vertex,
    /// Examined domain vertices, ascending.
    vertices: Vec<u64>,
    /// `counts[i]` codewords lie within distance 1 of `vertices[i]`.
    counts: Vec<u32>,
}

/// Serializable digest of a [`CoverageReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub examined: usize,
    pub exactly_once: usize,
    pub uncovered: usize,
    pub collided: usize,
    /// Sum of `count - 1` over vertices covered more than once.
    pub collision_excess: u64,
}

impl CoverageReport {
    pub fn width(&self) -> u32 {
        self.zero.width()
    }

    /// Number of examined vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Coverage count of `vertex`, or `None` if it was not examined.
    pub fn count(&self, vertex: &Vertex) -> Option<u32> {
        if vertex.width() != self.width() {
            return None;
        }
        self.vertices
            .binary_search(&vertex.bits())
            .ok()
            .map(|i| self.counts[i])
    }

    pub fn entries(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.vertices.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn uncovered_bits(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries().filter(|&(_, c)| c == 0).map(|(v, _)| v)
    }

    /// Domain vertices no codeword reaches.
    pub fn uncovered(&self) -> Vec<Vertex> {
        self.to_vertices(self.uncovered_bits())
    }

    /// Domain vertices reached by two or more codewords, with their counts.
    pub fn collisions(&self) -> Vec<(Vertex, u32)> {
        self.entries()
            .filter(|&(_, c)| c >= 2)
            .map(|(v, c)| (self.zero.with_bits(v), c))
            .collect()
    }

    pub fn uncovered_count(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 0).count()
    }

    pub fn collision_excess(&self) -> u64 {
        self.counts
            .iter()
            .filter(|&&c| c >= 2)
            .map(|&c| u64::from(c - 1))
            .sum()
    }

    /// True iff every examined vertex is covered exactly once.
    pub fn is_exact(&self) -> bool {
        self.counts.iter().all(|&c| c == 1)
    }

    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary {
            examined: self.len(),
            exactly_once: self.counts.iter().filter(|&&c| c == 1).count(),
            uncovered: self.uncovered_count(),
            collided: self.counts.iter().filter(|&&c| c >= 2).count(),
            collision_excess: self.collision_excess(),
        }
    }

    fn to_vertices(&self, bits: impl Iterator<Item = u64>) -> Vec<Vertex> {
        bits.map(|b| self.zero.with_bits(b)).collect()
    }
}

fn check_code_width(code: &Code, domain: &Domain) -> Result<(), InvalidInput> {
    if code.width() != domain.n() {
        return Err(InvalidInput::WidthMismatch {
            expected: domain.n(),
            found: code.width(),
        });
    }
    Ok(())
}

/// Coverage of every domain vertex, by exhaustive enumeration of Λn(1^s).
pub fn coverage_report(code: &Code, domain: &Domain) -> Result<CoverageReport, InvalidInput> {
    check_code_width(code, domain)?;
    let members = domain.members()?;
    let n = domain.n();

    // Dense scratch over all 2^n patterns; counts never exceed n + 1.
    let mut scratch = vec![0u8; 1usize << n];
    for word in code.bits() {
        scratch[word as usize] = scratch[word as usize].saturating_add(1);
        for i in 0..n {
            let u = (word ^ (1u64 << i)) as usize;
            scratch[u] = scratch[u].saturating_add(1);
        }
    }

    Ok(CoverageReport {
        zero: Vertex::zero(n)?,
        vertices: members.to_vec(),
        counts: members
            .iter()
            .map(|&m| u32::from(scratch[m as usize]))
            .collect(),
    })
}

/// Coverage restricted to the domain members among `candidates`.
///
/// For widths too large to enumerate; exactness then only holds for the
/// sample.
pub fn coverage_report_over(
    code: &Code,
    domain: &Domain,
    candidates: &[Vertex],
) -> Result<CoverageReport, InvalidInput> {
    check_code_width(code, domain)?;
    let mut vertices = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if domain.is_member(candidate)? {
            vertices.push(candidate.bits());
        }
    }
    vertices.sort_unstable();
    vertices.dedup();

    let counts = vertices
        .iter()
        .map(|&v| {
            let own = u32::from(code.contains_bits(v));
            own + (0..domain.n())
                .filter(|i| code.contains_bits(v ^ (1u64 << i)))
                .count() as u32
        })
        .collect();

    Ok(CoverageReport {
        zero: Vertex::zero(domain.n())?,
        vertices,
        counts,
    })
}

/// Pairs of distinct codewords at Hamming distance 1 or 2, each pair once.
pub fn close_pairs(code: &Code) -> Vec<(Vertex, Vertex)> {
    let n = code.width();
    let mut pairs = Vec::new();
    for c in code.iter() {
        let word = c.bits();
        for i in 0..n {
            let one = word ^ (1u64 << i);
            if one > word && code.contains_bits(one) {
                pairs.push((c, c.with_bits(one)));
            }
            for j in (i + 1)..n {
                let two = one ^ (1u64 << j);
                if two > word && code.contains_bits(two) {
                    pairs.push((c, c.with_bits(two)));
                }
            }
        }
    }
    pairs
}

/// True iff all distinct codewords are at distance at least 3.
pub fn has_minimum_distance_three(code: &Code) -> bool {
    let n = code.width();
    code.bits().all(|word| {
        (0..n).all(|i| {
            let one = word ^ (1u64 << i);
            !code.contains_bits(one)
                && ((i + 1)..n).all(|j| !code.contains_bits(one ^ (1u64 << j)))
        })
    })
}

/// The oracle: membership, distance, then exact coverage.
pub fn is_perfect_code(code: &Code, domain: &Domain) -> Result<bool, InvalidInput> {
    check_code_width(code, domain)?;
    if !code.bits().all(|w| domain.contains_bits(w)) {
        return Ok(false);
    }
    if !has_minimum_distance_three(code) {
        return Ok(false);
    }
    Ok(coverage_report(code, domain)?.is_exact())
}

/// [`is_perfect_code`] with coverage checked only over `candidates`.
pub fn is_perfect_code_over(
    code: &Code,
    domain: &Domain,
    candidates: &[Vertex],
) -> Result<bool, InvalidInput> {
    check_code_width(code, domain)?;
    if !code.bits().all(|w| domain.contains_bits(w)) {
        return Ok(false);
    }
    if !has_minimum_distance_three(code) {
        return Ok(false);
    }
    Ok(coverage_report_over(code, domain, candidates)?.is_exact())
}

/// Domain size divided by `n + 1`, rounded down.
///
/// A diagnostic hint only. Λn(1^s) is not regular, so a perfect code may
/// have more codewords than this.
pub fn sphere_bound(domain: &Domain) -> Result<usize, InvalidInput> {
    Ok(domain.size()? / (domain.n() as usize + 1))
}

/// Everything the oracle looked at, for diagnostics.
#[derive(Debug, Clone)]
pub struct Verification {
    pub perfect: bool,
    /// Codewords outside the domain.
    pub foreign: Vec<Vertex>,
    pub close_pairs: Vec<(Vertex, Vertex)>,
    pub coverage: CoverageReport,
    pub sphere_bound: usize,
}

impl Verification {
    /// Code size is above the sphere bound (informational).
    pub fn exceeds_sphere_bound(&self, code_len: usize) -> bool {
        code_len > self.sphere_bound
    }
}

/// Run every check without short-circuiting.
pub fn verify(code: &Code, domain: &Domain) -> Result<Verification, InvalidInput> {
    check_code_width(code, domain)?;
    let foreign: Vec<Vertex> = code
        .iter()
        .filter(|v| !domain.contains_bits(v.bits()))
        .collect();
    let close_pairs = close_pairs(code);
    let coverage = coverage_report(code, domain)?;
    let perfect = foreign.is_empty() && close_pairs.is_empty() && coverage.is_exact();
    Ok(Verification {
        perfect,
        foreign,
        close_pairs,
        sphere_bound: sphere_bound(domain)?,
        coverage,
    })
}
