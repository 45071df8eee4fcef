//! Round Hashing for Verification
//!
//! Provides deterministic hashing of built rounds for:
//! - Replay validation (same seed + same roster = same hash)
//! - Compact round fingerprints in logs

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for rotation state.
///
/// Wraps SHA-256 with helpers for the integer types the rotation uses.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for a built round.
    pub fn for_round() -> Self {
        Self::new(b"COURT_ROTATION_ROUND_V1")
    }

    /// Create hasher for teammate history.
    pub fn for_history() -> Self {
        Self::new(b"COURT_ROTATION_HISTORY_V1")
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a UUID (16 bytes).
    #[inline]
    pub fn update_uuid(&mut self, uuid: &[u8; 16]) {
        self.hasher.update(uuid);
    }

    /// Update with a length-prefixed collection marker.
    ///
    /// Keeps `[a, b] [c]` and `[a] [b, c]` from hashing identically.
    #[inline]
    pub fn update_len(&mut self, len: usize) {
        self.update_u32(len as u32);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute a round hash.
///
/// This function is called by `Round::compute_hash()`.
/// The closure adds the round-specific data.
pub fn compute_round_hash<F>(round: u32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_round();

    // Always hash the round number first
    hasher.update_u32(round);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let mut h1 = StateHasher::for_round();
        let mut h2 = StateHasher::for_round();

        h1.update_u32(12345);
        h1.update_len(3);
        h2.update_u32(12345);
        h2.update_len(3);

        assert_eq!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_domain_separation() {
        let mut round = StateHasher::for_round();
        let mut history = StateHasher::for_history();
        round.update_u32(7);
        history.update_u32(7);
        assert_ne!(round.finalize(), history.finalize());
    }

    #[test]
    fn test_length_prefix_changes_hash() {
        let a = compute_round_hash(1, |h| {
            h.update_len(2);
            h.update_u32(1);
            h.update_u32(2);
            h.update_len(1);
            h.update_u32(3);
        });
        let b = compute_round_hash(1, |h| {
            h.update_len(1);
            h.update_u32(1);
            h.update_len(2);
            h.update_u32(2);
            h.update_u32(3);
        });
        assert_ne!(a, b);
    }

    #[test]
    fn test_round_number_is_hashed() {
        let a = compute_round_hash(1, |_| {});
        let b = compute_round_hash(2, |_| {});
        assert_ne!(a, b);
    }
}
