//! Player Definitions
//!
//! Player snapshots as supplied by the player store.

use std::fmt;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::core::hash::StateHasher;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Generate a fresh random ID.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// First four bytes as hex, for compact log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.as_bytes()[..4])
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// GENDER
// =============================================================================

/// Player gender as recorded on the roster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    #[default]
    #[serde(rename = "M")]
    Male,
    /// Female
    #[serde(rename = "F")]
    Female,
}

// =============================================================================
// PLAYER
// =============================================================================

/// A player snapshot.
///
/// `bench_count` and `last_played_round` are the fairness counters. The core
/// never writes them; it hands back deltas that the store applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player ID
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Roster gender
    #[serde(default)]
    pub gender: Gender,

    /// Skill rating (higher = stronger)
    pub skill_level: u32,

    /// Checked in for the current session?
    #[serde(default)]
    pub is_present: bool,

    /// Rounds spent on the bench
    #[serde(default)]
    pub bench_count: u32,

    /// Last round this player was selected to play (0 = never)
    #[serde(default)]
    pub last_played_round: u32,
}

impl Player {
    /// Create a present player with fresh fairness counters.
    pub fn new(id: PlayerId, name: impl Into<String>, gender: Gender, skill_level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            skill_level,
            is_present: true,
            bench_count: 0,
            last_played_round: 0,
        }
    }

    /// Has this player played a round yet?
    #[inline]
    pub fn has_played(&self) -> bool {
        self.last_played_round != 0
    }

    /// Hash the fields that matter for matchmaking.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_uuid(self.id.as_bytes());
        hasher.update_u32(self.skill_level);
    }
}
