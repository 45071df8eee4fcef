//! Round Definitions
//!
//! What a built round looks like, and what the caller must persist.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher, compute_round_hash};
use crate::rotation::player::{Player, PlayerId};
use crate::rotation::splitter::{Team, TeamSplit};

// =============================================================================
// MATCH
// =============================================================================

/// One court's two-versus-two match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Court number (1-based, sequential per round)
    pub court: u32,

    /// First team
    pub team1: Team,

    /// Second team
    pub team2: Team,

    /// Mean skill of team1
    pub avg1: f64,

    /// Mean skill of team2
    pub avg2: f64,
}

impl Match {
    /// Build a match from a chosen split.
    pub fn from_split(court: u32, split: TeamSplit) -> Self {
        Self {
            court,
            team1: split.team1,
            team2: split.team2,
            avg1: split.avg1,
            avg2: split.avg2,
        }
    }

    /// All four players, team1 first.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.team1.iter().chain(self.team2.iter())
    }

    /// Does this match involve the given player?
    pub fn involves(&self, id: &PlayerId) -> bool {
        self.players().any(|p| p.id == *id)
    }

    fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.court);
        for p in self.players() {
            p.hash_into(hasher);
        }
    }
}

// =============================================================================
// ROUND
// =============================================================================

/// A fully built round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    /// Round number (1-based)
    pub number: u32,

    /// Matches in court order
    pub matches: Vec<Match>,

    /// Present players sitting this round out
    pub benched: Vec<Player>,

    /// Selected to play but left without a court
    pub unassigned: Vec<Player>,

    /// When the round was built
    pub built_at: DateTime<Utc>,
}

impl Round {
    /// Number of courts in use.
    pub fn court_count(&self) -> usize {
        self.matches.len()
    }

    /// Find the match a player is on, if any.
    pub fn match_for(&self, id: &PlayerId) -> Option<&Match> {
        self.matches.iter().find(|m| m.involves(id))
    }

    /// Hash the round for replay verification.
    ///
    /// Covers the round number, every court's line-up and the bench. The
    /// build timestamp is excluded.
    pub fn compute_hash(&self) -> StateHash {
        compute_round_hash(self.number, |hasher| {
            hasher.update_len(self.matches.len());
            for m in &self.matches {
                m.hash_into(hasher);
            }
            hasher.update_len(self.benched.len());
            for p in &self.benched {
                hasher.update_uuid(p.id.as_bytes());
            }
            hasher.update_len(self.unassigned.len());
            for p in &self.unassigned {
                hasher.update_uuid(p.id.as_bytes());
            }
        })
    }
}

// =============================================================================
// PERSISTENCE DELTAS
// =============================================================================

/// Counter updates the caller must apply to the player store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceDeltas {
    /// Round number to write as `last_played_round`
    pub round: u32,

    /// Every player selected to play (courted or not)
    pub played: Vec<PlayerId>,

    /// Every benched player; `bench_count += 1`
    pub benched: Vec<PlayerId>,
}

impl PersistenceDeltas {
    /// Nothing to write?
    pub fn is_empty(&self) -> bool {
        self.played.is_empty() && self.benched.is_empty()
    }
}

/// Everything `build_round` hands back.
#[derive(Clone, Debug)]
pub struct RoundOutcome {
    /// The round to display
    pub round: Round,

    /// Counter updates to persist
    pub deltas: PersistenceDeltas,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::player::Gender;

    fn p(n: u8, skill: u32) -> Player {
        Player::new(PlayerId::new([n; 16]), format!("P{n}"), Gender::Male, skill)
    }

    fn sample_round(number: u32) -> Round {
        Round {
            number,
            matches: vec![Match {
                court: 1,
                team1: [p(1, 4), p(2, 2)],
                team2: [p(3, 3), p(4, 3)],
                avg1: 3.0,
                avg2: 3.0,
            }],
            benched: vec![p(5, 1)],
            unassigned: vec![],
            built_at: Utc::now(),
        }
    }

    #[test]
    fn test_match_for() {
        let round = sample_round(1);
        assert_eq!(round.match_for(&PlayerId::new([3; 16])).map(|m| m.court), Some(1));
        assert!(round.match_for(&PlayerId::new([5; 16])).is_none());
        assert_eq!(round.court_count(), 1);
    }

    #[test]
    fn test_hash_ignores_timestamp() {
        let a = sample_round(1);
        let mut b = sample_round(1);
        b.built_at = a.built_at + chrono::Duration::seconds(30);
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_hash_sensitive_to_lineup() {
        let a = sample_round(1);
        let mut b = sample_round(1);
        b.matches[0].team1.swap(0, 1);
        assert_ne!(a.compute_hash(), b.compute_hash());
        assert_ne!(a.compute_hash(), sample_round(2).compute_hash());
    }

    #[test]
    fn test_round_serializes() {
        let round = sample_round(3);
        let json = serde_json::to_string(&round).unwrap();
        let back: Round = serde_json::from_str(&json).unwrap();
        assert_eq!(back.number, 3);
        assert_eq!(back.matches, round.matches);
    }
}
