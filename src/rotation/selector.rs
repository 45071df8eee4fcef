//! Fairness Selection
//!
//! Decides who plays and who sits out. Players are ranked by how badly they
//! are owed a game; the top `max_playing` play, the rest are benched.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

use crate::MIN_PLAYERS;
use crate::core::rng::TieBreaker;
use crate::rotation::history::LastBenchedSet;
use crate::rotation::player::{Player, PlayerId};

/// Rotation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RotationError {
    /// Not enough players present to fill a single court.
    #[error("Not enough players present: {present} (need at least {required})")]
    InsufficientPlayers {
        /// Players present.
        present: usize,
        /// Minimum required.
        required: usize,
    },

    /// Round counter cannot go past `u32::MAX`.
    #[error("Round counter exhausted at {0}")]
    RoundLimit(u32),
}

/// Result of a selection pass.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Players who play this round, most-owed first.
    pub playing: Vec<Player>,
    /// Players who sit out, in input order.
    pub benched: Vec<Player>,
}

impl Selection {
    /// Ids of the playing players.
    pub fn playing_ids(&self) -> Vec<PlayerId> {
        self.playing.iter().map(|p| p.id).collect()
    }

    /// Ids of the benched players.
    pub fn benched_ids(&self) -> Vec<PlayerId> {
        self.benched.iter().map(|p| p.id).collect()
    }
}

/// Ranking key for one player. Larger = more owed a game.
///
/// Field order is comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority {
    /// Rounds spent on the bench.
    pub bench_count: u32,
    /// Rounds since last played; `i64::MAX` if never played.
    pub staleness: i64,
    /// Sat out the immediately preceding round?
    pub benched_last_round: bool,
    /// Uniform random tie-break.
    pub draw: u64,
}

impl Priority {
    /// Compute a player's priority for `round`.
    pub fn for_player(player: &Player, round: u32, last_benched: &LastBenchedSet, draw: u64) -> Self {
        Self {
            bench_count: player.bench_count,
            staleness: staleness(player, round),
            benched_last_round: last_benched.contains(&player.id),
            draw,
        }
    }
}

/// Rounds since the player last played.
///
/// Signed so a counter left over from an earlier session (greater than the
/// current round) ranks as least stale instead of wrapping.
#[inline]
pub fn staleness(player: &Player, round: u32) -> i64 {
    if player.has_played() {
        round as i64 - player.last_played_round as i64
    } else {
        i64::MAX
    }
}

/// Split present players into playing and benched for `round`.
///
/// `round` is the 1-based number of the round about to be built. Every
/// present player consumes exactly one draw from `tie_breaker`, in input
/// order, before anything is sorted.
///
/// # Errors
///
/// [`RotationError::InsufficientPlayers`] when fewer than [`MIN_PLAYERS`]
/// are present. Nothing is drawn from `tie_breaker` in that case.
pub fn select_players<T: TieBreaker + ?Sized>(
    present: &[Player],
    round: u32,
    last_benched: &LastBenchedSet,
    max_playing: usize,
    tie_breaker: &mut T,
) -> Result<Selection, RotationError> {
    if present.len() < MIN_PLAYERS {
        return Err(RotationError::InsufficientPlayers {
            present: present.len(),
            required: MIN_PLAYERS,
        });
    }

    let mut ranked: Vec<(Priority, &Player)> = present
        .iter()
        .map(|p| (Priority::for_player(p, round, last_benched, tie_breaker.draw()), p))
        .collect();

    ranked.sort_by(|a, b| compare_priority(&a.0, &b.0));

    if cfg!(feature = "debug-tracing") {
        for (rank, (priority, player)) in ranked.iter().enumerate() {
            debug!(
                rank,
                player = %player.id.short(),
                bench_count = priority.bench_count,
                staleness = priority.staleness,
                benched_last_round = priority.benched_last_round,
                "selection priority"
            );
        }
    }

    let playing: Vec<Player> = ranked
        .into_iter()
        .take(max_playing)
        .map(|(_, p)| p.clone())
        .collect();

    let playing_ids: BTreeSet<PlayerId> = playing.iter().map(|p| p.id).collect();
    let benched = present
        .iter()
        .filter(|p| !playing_ids.contains(&p.id))
        .cloned()
        .collect();

    Ok(Selection { playing, benched })
}

/// Most-owed first.
#[inline]
fn compare_priority(a: &Priority, b: &Priority) -> Ordering {
    b.cmp(a)
}
