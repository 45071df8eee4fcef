//! Core deterministic primitives.
//!
//! The random source and hashing used by the rotation. Given a seed, every
//! decision the rotation makes can be reproduced bit-for-bit.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, TieBreaker};
pub use hash::{StateHash, StateHasher, compute_round_hash};
