//! Cross-Round Fairness Memory
//!
//! Session-scoped state carried between rounds. Both types live inside the
//! orchestrator; everything else only reads them.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::rotation::player::PlayerId;

// =============================================================================
// PAIR KEY
// =============================================================================

/// Order-independent key for two player ids.
///
/// The smaller id is always stored first, so `PairKey::new(a, b)` and
/// `PairKey::new(b, a)` are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey(PlayerId, PlayerId);

impl PairKey {
    /// Build a key from two ids in any order.
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// The two ids, smaller first.
    pub fn ids(&self) -> (PlayerId, PlayerId) {
        (self.0, self.1)
    }
}

// =============================================================================
// TEAMMATE HISTORY
// =============================================================================

/// Count of how often each pair has been teamed this session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeammateHistory {
    counts: BTreeMap<PairKey, u32>,
}

impl TeammateHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Times `a` and `b` have been teammates (0 if never).
    pub fn count(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.counts.get(&PairKey::new(a, b)).copied().unwrap_or(0)
    }

    /// Record that `a` and `b` were teamed once more.
    pub(crate) fn record(&mut self, a: PlayerId, b: PlayerId) {
        let entry = self.counts.entry(PairKey::new(a, b)).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    /// Number of distinct pairs recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// No pairs recorded yet?
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &u32)> {
        self.counts.iter()
    }

    /// Forget every pairing.
    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }

    /// Hash the full history for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_history();
        hasher.update_len(self.counts.len());
        for (pair, count) in &self.counts {
            let (a, b) = pair.ids();
            hasher.update_uuid(a.as_bytes());
            hasher.update_uuid(b.as_bytes());
            hasher.update_u32(*count);
        }
        hasher.finalize()
    }
}

// =============================================================================
// LAST BENCHED SET
// =============================================================================

/// Players benched in the immediately preceding round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastBenchedSet {
    ids: BTreeSet<PlayerId>,
}

impl LastBenchedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Was this player benched last round?
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.ids.contains(id)
    }

    /// Number of players benched last round.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Nobody benched last round?
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate ids in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.ids.iter()
    }

    /// Overwrite with this round's benched ids.
    pub(crate) fn replace<I: IntoIterator<Item = PlayerId>>(&mut self, ids: I) {
        self.ids = ids.into_iter().collect();
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<PlayerId> for LastBenchedSet {
    fn from_iter<I: IntoIterator<Item = PlayerId>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}
