//! The generalized Lucas cube Λn(1^s).
//!
//! Vertices are the n-bit strings with no run of `s` consecutive ones in
//! any cyclic rotation. Membership is computed on demand; once the domain
//! has been enumerated, the membership table built during enumeration
//! answers later queries.

use std::sync::OnceLock;

use crate::error::InvalidInput;
use crate::vertex::{check_width, width_mask, Vertex};

/// Widest domain that may be enumerated exhaustively (2^24 candidates).
pub const MAX_ENUMERATION_WIDTH: u32 = 24;

/// True iff the circular n-bit string `bits` contains `s` consecutive ones.
///
/// Scans the doubled sequence (the string followed by its first `s - 1`
/// bits), so every wrap-around run is seen once in O(n + s).
pub fn has_cyclic_run(bits: u64, n: u32, s: u32) -> bool {
    if s > n {
        return false;
    }
    let mut run = 0u32;
    for i in 0..(n + s - 1) {
        if (bits >> (i % n)) & 1 == 1 {
            run += 1;
            if run >= s {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Dense membership cache keyed by vertex value.
#[derive(Debug, Clone)]
struct MembershipTable {
    /// Member bit patterns in ascending order.
    members: Vec<u64>,
    /// One bit per candidate vertex.
    bitmap: Vec<u64>,
}

impl MembershipTable {
    fn build(n: u32, s: u32) -> Self {
        let total = 1u64 << n;
        let mut members = Vec::new();
        let mut bitmap = vec![0u64; (total as usize).div_ceil(64)];
        for bits in 0..total {
            if !has_cyclic_run(bits, n, s) {
                members.push(bits);
                bitmap[(bits >> 6) as usize] |= 1u64 << (bits & 63);
            }
        }
        Self { members, bitmap }
    }

    fn contains(&self, bits: u64) -> bool {
        self.bitmap
            .get((bits >> 6) as usize)
            .is_some_and(|word| (word >> (bits & 63)) & 1 == 1)
    }
}

/// The vertex set of Λn(1^s) together with its adjacency rule.
#[derive(Debug, Clone)]
pub struct Domain {
    n: u32,
    s: u32,
    table: OnceLock<MembershipTable>,
}

impl Domain {
    /// Create Λn(1^s). `s > n` is allowed and yields the full hypercube.
    pub fn new(n: u32, s: u32) -> Result<Self, InvalidInput> {
        check_width(n)?;
        if s < 2 {
            return Err(InvalidInput::RunTooShort { s });
        }
        Ok(Self {
            n,
            s,
            table: OnceLock::new(),
        })
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn s(&self) -> u32 {
        self.s
    }

    /// True when no vertex can contain a forbidden run.
    pub fn is_unconstrained(&self) -> bool {
        self.s > self.n
    }

    pub fn mask(&self) -> u64 {
        width_mask(self.n)
    }

    /// Membership for a raw bit pattern; patterns wider than n are not members.
    pub fn contains_bits(&self, bits: u64) -> bool {
        if bits & !self.mask() != 0 {
            return false;
        }
        match self.table.get() {
            Some(table) => table.contains(bits),
            None => !has_cyclic_run(bits, self.n, self.s),
        }
    }

    pub fn is_member(&self, vertex: &Vertex) -> Result<bool, InvalidInput> {
        self.check_vertex(vertex)?;
        Ok(self.contains_bits(vertex.bits()))
    }

    /// Members reachable by flipping one bit, in ascending bit position.
    pub fn neighbor_bits(&self, bits: u64) -> impl Iterator<Item = u64> + '_ {
        (0..self.n)
            .map(move |i| bits ^ (1u64 << i))
            .filter(move |&u| self.contains_bits(u))
    }

    pub fn neighbors(&self, vertex: &Vertex) -> Result<Vec<Vertex>, InvalidInput> {
        self.check_vertex(vertex)?;
        Ok(self
            .neighbor_bits(vertex.bits())
            .map(|bits| Vertex::from_raw(bits, self.n))
            .collect())
    }

    /// The vertex followed by its neighbors; empty for non-members.
    pub fn closed_neighborhood(&self, vertex: &Vertex) -> Result<Vec<Vertex>, InvalidInput> {
        if !self.is_member(vertex)? {
            return Ok(Vec::new());
        }
        let mut ball = vec![*vertex];
        ball.extend(self.neighbors(vertex)?);
        Ok(ball)
    }

    /// All member bit patterns in ascending order, enumerated once and cached.
    pub fn members(&self) -> Result<&[u64], InvalidInput> {
        if self.n > MAX_ENUMERATION_WIDTH {
            return Err(InvalidInput::EnumerationTooLarge {
                n: self.n,
                max: MAX_ENUMERATION_WIDTH,
            });
        }
        let table = self
            .table
            .get_or_init(|| MembershipTable::build(self.n, self.s));
        Ok(&table.members)
    }

    /// Number of vertices in the domain.
    pub fn size(&self) -> Result<usize, InvalidInput> {
        Ok(self.members()?.len())
    }

    pub fn vertices(&self) -> Result<impl Iterator<Item = Vertex> + '_, InvalidInput> {
        let n = self.n;
        Ok(self
            .members()?
            .iter()
            .map(move |&bits| Vertex::from_raw(bits, n)))
    }

    /// A vertex of this domain's width (membership is not required).
    pub fn vertex(&self, bits: u64) -> Result<Vertex, InvalidInput> {
        Vertex::new(bits, self.n)
    }

    pub fn check_vertex(&self, vertex: &Vertex) -> Result<(), InvalidInput> {
        if vertex.width() != self.n {
            return Err(InvalidInput::WidthMismatch {
                expected: self.n,
                found: vertex.width(),
            });
        }
        Ok(())
    }
}
