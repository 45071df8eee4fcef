//! Round Orchestration
//!
//! Builds one round at a time: select, group, split. Owns the only state
//! that survives between rounds (teammate history and the last bench).
//!
//! Rounds must be built strictly in order. The caller applies each round's
//! [`PersistenceDeltas`] and refreshes its player snapshot before asking
//! for the next one.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{COURT_SIZE, DEFAULT_COURTS, DEFAULT_SKILL_BAND};
use crate::core::rng::{DeterministicRng, TieBreaker};
use crate::rotation::grouper::group_into_fours;
use crate::rotation::history::{LastBenchedSet, TeammateHistory};
use crate::rotation::player::Player;
use crate::rotation::round::{Match, PersistenceDeltas, Round, RoundOutcome};
use crate::rotation::selector::{select_players, RotationError};
use crate::rotation::splitter::split_teams;

/// Configuration for round building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    /// Courts available (each takes four players).
    pub courts: usize,
    /// Widest skill range allowed inside a group before falling back.
    pub skill_band: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            courts: DEFAULT_COURTS,
            skill_band: DEFAULT_SKILL_BAND,
        }
    }
}

impl RotationConfig {
    /// Players that can be on court at once.
    #[inline]
    pub fn max_playing(&self) -> usize {
        self.courts * COURT_SIZE
    }
}

/// Builds rounds and keeps cross-round fairness memory.
#[derive(Debug, Clone)]
pub struct RoundOrchestrator<T: TieBreaker = DeterministicRng> {
    config: RotationConfig,
    tie_breaker: T,
    history: TeammateHistory,
    last_benched: LastBenchedSet,
}

impl RoundOrchestrator<DeterministicRng> {
    /// Fresh session with default config and a seeded tie-breaker.
    pub fn new(seed: u64) -> Self {
        Self::with_tie_breaker(DeterministicRng::new(seed), RotationConfig::default())
    }

    /// Fresh session seeded from OS entropy. Returns the seed for logging.
    pub fn from_entropy(config: RotationConfig) -> (Self, u64) {
        let (rng, seed) = DeterministicRng::from_entropy();
        (Self::with_tie_breaker(rng, config), seed)
    }
}

impl<T: TieBreaker> RoundOrchestrator<T> {
    /// Fresh session with an injected tie-breaker.
    pub fn with_tie_breaker(tie_breaker: T, config: RotationConfig) -> Self {
        Self {
            config,
            tie_breaker,
            history: TeammateHistory::new(),
            last_benched: LastBenchedSet::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Teammate counts so far this session.
    pub fn teammate_history(&self) -> &TeammateHistory {
        &self.history
    }

    /// Players benched in the previous round.
    pub fn last_benched(&self) -> &LastBenchedSet {
        &self.last_benched
    }

    /// Forget all cross-round memory (start of a new session).
    ///
    /// The tie-breaker keeps its position in the sequence.
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_benched.clear();
    }

    /// Build the round after `current_round`.
    ///
    /// `present` is the caller's current snapshot of checked-in players.
    ///
    /// # Errors
    ///
    /// [`RotationError::InsufficientPlayers`] when fewer than four players
    /// are present. No memory is touched and no random draws are consumed.
    ///
    /// [`RotationError::RoundLimit`] when `current_round` is `u32::MAX`.
    pub fn build_round(
        &mut self,
        present: &[Player],
        current_round: u32,
    ) -> Result<RoundOutcome, RotationError> {
        let number = current_round
            .checked_add(1)
            .ok_or(RotationError::RoundLimit(current_round))?;

        let selection = select_players(
            present,
            number,
            &self.last_benched,
            self.config.max_playing(),
            &mut self.tie_breaker,
        )?;

        let grouping = group_into_fours(&selection.playing, self.config.courts, self.config.skill_band);

        let matches: Vec<Match> = grouping
            .groups
            .iter()
            .enumerate()
            .map(|(idx, group)| {
                let split = split_teams(group, &mut self.history);
                debug!(
                    round = number,
                    court = idx + 1,
                    candidate = split.candidate,
                    score = split.score,
                    "court split"
                );
                Match::from_split(idx as u32 + 1, split)
            })
            .collect();

        self.last_benched.replace(selection.benched.iter().map(|p| p.id));

        if !grouping.leftover.is_empty() {
            warn!(
                round = number,
                unassigned = grouping.leftover.len(),
                "playing count not a multiple of {}; remainder left without a court",
                COURT_SIZE
            );
        }

        info!(
            round = number,
            present = present.len(),
            courts = matches.len(),
            benched = selection.benched.len(),
            "round built"
        );

        let deltas = PersistenceDeltas {
            round: number,
            played: selection.playing_ids(),
            benched: selection.benched_ids(),
        };

        Ok(RoundOutcome {
            round: Round {
                number,
                matches,
                benched: selection.benched,
                unassigned: grouping.leftover,
                built_at: Utc::now(),
            },
            deltas,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY TESTS
// =============================================================================
