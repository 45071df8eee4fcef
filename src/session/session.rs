//! Court Session
//!
//! Drives one evening of play: keeps the roster snapshot, hands present
//! players to the orchestrator, applies the resulting deltas to the store
//! and refreshes the snapshot before the next round can be requested.

use tracing::{info, warn};

use crate::core::rng::DeterministicRng;
use crate::rotation::orchestrator::RoundOrchestrator;
use crate::rotation::player::{Player, PlayerId};
use crate::rotation::round::{Match, PersistenceDeltas, Round, RoundOutcome};
use crate::rotation::selector::RotationError;
use crate::session::config::SessionConfig;
use crate::session::store::{PlayerStore, StoreError};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No round in progress.
    Lobby,
    /// Rounds are being played.
    Playing,
}

/// Result of building one round inside a session.
#[derive(Debug)]
pub struct RoundReport {
    /// The round to display
    pub round: Round,
    /// Counter updates sent to the store
    pub deltas: PersistenceDeltas,
    /// Store rejected the counter updates; matches still stand
    pub persistence_error: Option<StoreError>,
    /// Snapshot could not be reloaded; counters lag until the next refresh
    pub refresh_error: Option<StoreError>,
}

impl RoundReport {
    /// Were the deltas written and the snapshot reloaded?
    pub fn is_clean(&self) -> bool {
        self.persistence_error.is_none() && self.refresh_error.is_none()
    }
}

/// A court session over a player store.
pub struct CourtSession<S: PlayerStore> {
    store: S,
    orchestrator: RoundOrchestrator<DeterministicRng>,
    seed: u64,
    players: Vec<Player>,
    state: SessionState,
    round: u32,
    current: Option<Round>,
}

impl<S: PlayerStore> CourtSession<S> {
    /// Open a session and load the roster snapshot.
    ///
    /// Uses `config.seed` if set, otherwise draws one from OS entropy.
    pub fn new(store: S, config: &SessionConfig) -> Result<Self, SessionError> {
        let (orchestrator, seed) = match config.seed {
            Some(seed) => (
                RoundOrchestrator::with_tie_breaker(DeterministicRng::new(seed), config.rotation),
                seed,
            ),
            None => RoundOrchestrator::from_entropy(config.rotation),
        };

        let players = store.list_players()?;
        info!(
            seed,
            players = players.len(),
            courts = config.rotation.courts,
            "session opened"
        );

        Ok(Self {
            store,
            orchestrator,
            seed,
            players,
            state: SessionState::Lobby,
            round: 0,
            current: None,
        })
    }

    /// Tie-break seed; pass it back through config to replay the session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last built round number (0 before the first round).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Last built round, if any.
    pub fn current_round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    /// Matches of the last built round.
    pub fn matches(&self) -> &[Match] {
        self.current.as_ref().map(|r| r.matches.as_slice()).unwrap_or(&[])
    }

    /// Roster snapshot, ordered by name.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Checked-in players.
    pub fn present(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_present).collect()
    }

    /// Players not checked in.
    pub fn absent(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| !p.is_present).collect()
    }

    /// Orchestrator state (teammate history, last bench).
    pub fn orchestrator(&self) -> &RoundOrchestrator<DeterministicRng> {
        &self.orchestrator
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store. Call [`refresh`](Self::refresh) after
    /// editing players directly.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Reload the roster snapshot from the store.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        self.players = self.store.list_players()?;
        Ok(())
    }

    /// Flip a player's presence. Returns the new value.
    ///
    /// Takes effect from the next round built.
    pub fn toggle_presence(&mut self, id: PlayerId) -> Result<bool, SessionError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::UnknownPlayer(id))?;

        let present = !player.is_present;
        self.store.set_presence(id, present)?;
        player.is_present = present;

        info!(player = %player.name, present, "presence changed");
        Ok(present)
    }

    /// Build the first round.
    pub fn start(&mut self) -> Result<RoundReport, SessionError> {
        if self.state == SessionState::Playing {
            return Err(SessionError::AlreadyStarted);
        }

        let present = self.present().len();
        let wanted = self.orchestrator.config().max_playing();
        if present < wanted {
            warn!(present, wanted, "not enough players to fill every court");
        }

        self.build_next()
    }

    /// Build the next round (manual advance or timer expiry).
    pub fn advance(&mut self) -> Result<RoundReport, SessionError> {
        if self.state != SessionState::Playing {
            return Err(SessionError::NotStarted);
        }
        self.build_next()
    }

    /// End the session.
    ///
    /// Clears matches, the round counter and teammate history. Stored
    /// counters are kept.
    pub fn end(&mut self) {
        info!(rounds = self.round, "session ended");
        self.state = SessionState::Lobby;
        self.round = 0;
        self.current = None;
        self.orchestrator.reset();
    }

    fn build_next(&mut self) -> Result<RoundReport, SessionError> {
        let present: Vec<Player> = self.players.iter().filter(|p| p.is_present).cloned().collect();
        let RoundOutcome { round, deltas } = self.orchestrator.build_round(&present, self.round)?;

        self.state = SessionState::Playing;
        self.round = round.number;
        self.current = Some(round.clone());

        let persistence_error = self.store.apply_deltas(&deltas).err();
        if let Some(err) = &persistence_error {
            warn!(round = round.number, error = %err, "failed to persist round counters");
        }

        let refresh_error = self.refresh().err();
        if let Some(err) = &refresh_error {
            warn!(round = round.number, error = %err, "failed to refresh roster");
        }

        Ok(RoundReport {
            round,
            deltas,
            persistence_error,
            refresh_error,
        })
    }
}

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Round could not be built.
    #[error(transparent)]
    Rotation(#[from] RotationError),

    /// Store failed before a round was built.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// `start` called while rounds are running.
    #[error("Session already started")]
    AlreadyStarted,

    /// `advance` called before `start`.
    #[error("Session not started")]
    NotStarted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::player::Gender;
    use crate::rotation::orchestrator::RotationConfig;
    use crate::session::store::{InMemoryPlayerStore, JsonFilePlayerStore, PlayerUpdate};

    fn roster(n: u8) -> Vec<Player> {
        (1..=n)
            .map(|i| Player::new(PlayerId::new([i; 16]), format!("P{i:02}"), Gender::Male, (i as u32 % 4) + 1))
            .collect()
    }

    fn seeded(seed: u64) -> SessionConfig {
        SessionConfig { seed: Some(seed), ..Default::default() }
    }

    fn session(n: u8) -> CourtSession<InMemoryPlayerStore> {
        CourtSession::new(InMemoryPlayerStore::with_players(roster(n)), &seeded(7)).unwrap()
    }

    /// In-memory store whose counter writes can be made to fail.
    struct FlakyStore {
        inner: InMemoryPlayerStore,
        fail_writes: bool,
    }

    impl PlayerStore for FlakyStore {
        fn list_players(&self) -> Result<Vec<Player>, StoreError> {
            self.inner.list_players()
        }
        fn set_presence(&mut self, id: PlayerId, present: bool) -> Result<(), StoreError> {
            self.inner.set_presence(id, present)
        }
        fn set_last_played_round(&mut self, round: u32, ids: &[PlayerId]) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "offline")));
            }
            self.inner.set_last_played_round(round, ids)
        }
        fn increment_bench_count(&mut self, ids: &[PlayerId]) -> Result<(), StoreError> {
            self.inner.increment_bench_count(ids)
        }
        fn patch(&mut self, updates: &[PlayerUpdate]) -> Result<(), StoreError> {
            self.inner.patch(updates)
        }
        fn upsert(&mut self, players: Vec<Player>) -> Result<(), StoreError> {
            self.inner.upsert(players)
        }
    }

    #[test]
    fn test_start_and_advance() {
        let mut s = session(17);
        assert_eq!(s.state(), SessionState::Lobby);
        assert!(matches!(s.advance(), Err(SessionError::NotStarted)));

        let first = s.start().unwrap();
        assert!(first.is_clean());
        assert_eq!(first.round.number, 1);
        assert_eq!(first.round.benched.len(), 1);
        assert_eq!(s.matches().len(), 4);
        assert!(matches!(s.start(), Err(SessionError::AlreadyStarted)));

        // Snapshot reflects the persisted deltas
        let benched_id = first.round.benched[0].id;
        let benched = s.players().iter().find(|p| p.id == benched_id).unwrap();
        assert_eq!(benched.bench_count, 1);

        let second = s.advance().unwrap();
        assert_eq!(second.round.number, 2);
        assert_eq!(s.round(), 2);
        assert_ne!(second.round.benched[0].id, benched_id);
    }

    #[test]
    fn test_insufficient_players_leaves_lobby() {
        let mut s = session(3);
        let err = s.start().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Rotation(RotationError::InsufficientPlayers { present: 3, required: 4 })
        ));
        assert_eq!(s.state(), SessionState::Lobby);
        assert_eq!(s.round(), 0);
        assert!(s.players().iter().all(|p| p.bench_count == 0 && p.last_played_round == 0));
    }

    #[test]
    fn test_toggle_presence() {
        let mut s = session(5);
        let id = PlayerId::new([2; 16]);

        assert!(!s.toggle_presence(id).unwrap());
        assert_eq!(s.present().len(), 4);
        assert_eq!(s.absent().len(), 1);
        assert!(!s.store().get(&id).unwrap().is_present);

        let report = s.start().unwrap();
        assert!(report.round.match_for(&id).is_none());
        assert!(report.round.benched.is_empty());

        assert!(matches!(
            s.toggle_presence(PlayerId::new([99; 16])),
            Err(SessionError::Store(StoreError::UnknownPlayer(_)))
        ));
    }

    #[test]
    fn test_persistence_failure_keeps_round() {
        let store = FlakyStore {
            inner: InMemoryPlayerStore::with_players(roster(8)),
            fail_writes: true,
        };
        let mut s = CourtSession::new(store, &seeded(1)).unwrap();

        let report = s.start().unwrap();
        assert!(matches!(report.persistence_error, Some(StoreError::Io(_))));
        assert!(report.refresh_error.is_none());
        assert_eq!(report.round.court_count(), 2);
        assert_eq!(s.round(), 1);

        // Counters lag but the next round still builds
        assert!(s.players().iter().all(|p| p.last_played_round == 0));
        s.store_mut().fail_writes = false;
        let next = s.advance().unwrap();
        assert!(next.is_clean());
        assert!(s.players().iter().all(|p| p.last_played_round == 2));
    }

    #[test]
    fn test_end_resets_session() {
        let mut s = session(8);
        s.start().unwrap();
        s.advance().unwrap();
        assert!(!s.orchestrator().teammate_history().is_empty());

        s.end();
        assert_eq!(s.state(), SessionState::Lobby);
        assert_eq!(s.round(), 0);
        assert!(s.matches().is_empty());
        assert!(s.orchestrator().teammate_history().is_empty());

        // Stored counters survive
        assert!(s.players().iter().all(|p| p.last_played_round == 2));
        assert_eq!(s.start().unwrap().round.number, 1);
    }

    #[test]
    fn test_seeded_sessions_replay() {
        let mut a = session(19);
        let mut b = session(19);
        assert_eq!(a.seed(), 7);

        for _ in 0..4 {
            let ra = (if a.round() == 0 { a.start() } else { a.advance() }).unwrap();
            let rb = (if b.round() == 0 { b.start() } else { b.advance() }).unwrap();
            assert_eq!(ra.round.compute_hash(), rb.round.compute_hash());
        }
        assert_eq!(
            a.orchestrator().teammate_history().compute_hash(),
            b.orchestrator().teammate_history().compute_hash()
        );
    }

    #[test]
    fn test_custom_courts() {
        let config = SessionConfig {
            seed: Some(3),
            store_path: None,
            rotation: RotationConfig { courts: 2, skill_band: 2 },
        };
        let mut s = CourtSession::new(InMemoryPlayerStore::with_players(roster(12)), &config).unwrap();
        let report = s.start().unwrap();
        assert_eq!(report.round.court_count(), 2);
        assert_eq!(report.round.benched.len(), 4);
        assert_eq!(report.deltas.benched.len(), 4);
    }

    #[test]
    fn test_json_backed_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        JsonFilePlayerStore::create(&path, roster(9)).unwrap();

        let store = JsonFilePlayerStore::open(&path).unwrap();
        let mut s = CourtSession::new(store, &seeded(11)).unwrap();
        let report = s.start().unwrap();
        assert!(report.is_clean());

        let benched = report.round.benched.clone();
        assert_eq!(benched.len(), 1);

        let reloaded = JsonFilePlayerStore::open(&path).unwrap().list_players().unwrap();
        for p in &reloaded {
            if p.id == benched[0].id {
                assert_eq!(p.bench_count, 1);
                assert_eq!(p.last_played_round, 0);
            } else {
                assert_eq!(p.last_played_round, 1);
            }
        }
    }
}
