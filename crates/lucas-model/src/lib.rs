//! Domain model for perfect-code searches in generalized Lucas cubes.
//!
//! - [`Vertex`]: an n-bit hypercube vertex, text form position 0 first.
//! - [`Domain`]: the vertex set of Λn(1^s) and its induced adjacency.
//! - [`Code`]: a set of codewords of a common width.

pub mod code;
pub mod domain;
pub mod error;
pub mod vertex;

pub use code::Code;
pub use domain::{has_cyclic_run, Domain, MAX_ENUMERATION_WIDTH};
pub use error::InvalidInput;
pub use vertex::{hamming_distance, hamming_weight, Vertex, MAX_WIDTH};
