//! Player Store
//!
//! The persistence collaborator. The rotation core never calls a store;
//! [`CourtSession`](crate::session::CourtSession) does, after each round.
//!
//! Two backends:
//! - [`InMemoryPlayerStore`]: a map, for tests and demos
//! - [`JsonFilePlayerStore`]: a JSON array of players on disk

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::rotation::player::{Gender, Player, PlayerId};
use crate::rotation::round::PersistenceDeltas;

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read or write the backing file.
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not a valid player list.
    #[error("Store JSON invalid: {0}")]
    Json(#[from] serde_json::Error),

    /// No player with this id.
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// A batch operation was given nothing to do.
    #[error("Empty batch")]
    EmptyBatch,
}

/// Partial update for one player. `None` fields are left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    /// Player to update
    pub id: PlayerId,
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// New skill level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<u32>,
    /// New presence flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_present: Option<bool>,
    /// Overwrite bench count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bench_count: Option<u32>,
    /// Overwrite last played round
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played_round: Option<u32>,
}

impl PlayerUpdate {
    /// Empty update for `id`.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            name: None,
            gender: None,
            skill_level: None,
            is_present: None,
            bench_count: None,
            last_played_round: None,
        }
    }

    fn apply_to(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(gender) = self.gender {
            player.gender = gender;
        }
        if let Some(skill) = self.skill_level {
            player.skill_level = skill;
        }
        if let Some(present) = self.is_present {
            player.is_present = present;
        }
        if let Some(bench) = self.bench_count {
            player.bench_count = bench;
        }
        if let Some(last) = self.last_played_round {
            player.last_played_round = last;
        }
    }
}

/// Persistence contract for player snapshots.
///
/// Batched operations validate every id before changing anything, so a
/// failed batch leaves the store untouched.
pub trait PlayerStore {
    /// All players, ordered by name.
    fn list_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Set one player's presence flag.
    fn set_presence(&mut self, id: PlayerId, present: bool) -> Result<(), StoreError>;

    /// Set `last_played_round = round` for every id. Never lowers a value.
    fn set_last_played_round(&mut self, round: u32, ids: &[PlayerId]) -> Result<(), StoreError>;

    /// `bench_count += 1` for every id.
    fn increment_bench_count(&mut self, ids: &[PlayerId]) -> Result<(), StoreError>;

    /// Apply partial updates.
    fn patch(&mut self, updates: &[PlayerUpdate]) -> Result<(), StoreError>;

    /// Insert or replace players by id.
    fn upsert(&mut self, players: Vec<Player>) -> Result<(), StoreError>;

    /// Apply one round's deltas as the two batched requests.
    fn apply_deltas(&mut self, deltas: &PersistenceDeltas) -> Result<(), StoreError> {
        if deltas.is_empty() {
            return Ok(());
        }
        if !deltas.played.is_empty() {
            self.set_last_played_round(deltas.round, &deltas.played)?;
        }
        if !deltas.benched.is_empty() {
            self.increment_bench_count(&deltas.benched)?;
        }
        Ok(())
    }
}

// =============================================================================
// ROSTER
// =============================================================================

/// Player map shared by both backends.
#[derive(Debug, Clone, Default)]
struct Roster {
    players: BTreeMap<PlayerId, Player>,
}

impl Roster {
    fn from_players(players: Vec<Player>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    fn sorted(&self) -> Vec<Player> {
        let mut list: Vec<Player> = self.players.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        list
    }

    fn ensure_known<'a, I: IntoIterator<Item = &'a PlayerId>>(&self, ids: I) -> Result<(), StoreError> {
        for id in ids {
            if !self.players.contains_key(id) {
                return Err(StoreError::UnknownPlayer(*id));
            }
        }
        Ok(())
    }

    fn set_presence(&mut self, id: PlayerId, present: bool) -> Result<(), StoreError> {
        let player = self.players.get_mut(&id).ok_or(StoreError::UnknownPlayer(id))?;
        player.is_present = present;
        Ok(())
    }

    fn set_last_played_round(&mut self, round: u32, ids: &[PlayerId]) -> Result<(), StoreError> {
        self.ensure_known(ids)?;
        for id in ids {
            if let Some(player) = self.players.get_mut(id) {
                player.last_played_round = player.last_played_round.max(round);
            }
        }
        Ok(())
    }

    fn increment_bench_count(&mut self, ids: &[PlayerId]) -> Result<(), StoreError> {
        self.ensure_known(ids)?;
        for id in ids {
            if let Some(player) = self.players.get_mut(id) {
                player.bench_count = player.bench_count.saturating_add(1);
            }
        }
        Ok(())
    }

    fn patch(&mut self, updates: &[PlayerUpdate]) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Err(StoreError::EmptyBatch);
        }
        self.ensure_known(updates.iter().map(|u| &u.id))?;
        for update in updates {
            if let Some(player) = self.players.get_mut(&update.id) {
                update.apply_to(player);
            }
        }
        Ok(())
    }

    fn upsert(&mut self, players: Vec<Player>) -> Result<(), StoreError> {
        if players.is_empty() {
            return Err(StoreError::EmptyBatch);
        }
        for player in players {
            self.players.insert(player.id, player);
        }
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Store backed by a map in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayerStore {
    roster: Roster,
}

impl InMemoryPlayerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `players`.
    pub fn with_players(players: Vec<Player>) -> Self {
        Self { roster: Roster::from_players(players) }
    }

    /// Look up one player.
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.roster.players.get(id)
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.roster.sorted())
    }

    fn set_presence(&mut self, id: PlayerId, present: bool) -> Result<(), StoreError> {
        self.roster.set_presence(id, present)
    }

    fn set_last_played_round(&mut self, round: u32, ids: &[PlayerId]) -> Result<(), StoreError> {
        self.roster.set_last_played_round(round, ids)
    }

    fn increment_bench_count(&mut self, ids: &[PlayerId]) -> Result<(), StoreError> {
        self.roster.increment_bench_count(ids)
    }

    fn patch(&mut self, updates: &[PlayerUpdate]) -> Result<(), StoreError> {
        self.roster.patch(updates)
    }

    fn upsert(&mut self, players: Vec<Player>) -> Result<(), StoreError> {
        self.roster.upsert(players)
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// Store backed by a JSON file holding an array of players.
///
/// The file is rewritten after every successful mutation. A mutation whose
/// write fails leaves both the file and the in-memory copy unchanged.
#[derive(Debug, Clone)]
pub struct JsonFilePlayerStore {
    path: PathBuf,
    roster: Roster,
}

impl JsonFilePlayerStore {
    /// Load an existing roster file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let contents = std::fs::read_to_string(&path)?;
        let players: Vec<Player> = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), players = players.len(), "roster loaded");
        Ok(Self { path, roster: Roster::from_players(players) })
    }

    /// Create (or overwrite) a roster file with `players`.
    pub fn create(path: impl AsRef<Path>, players: Vec<Player>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            roster: Roster::from_players(players),
        };
        store.save(&store.roster)?;
        Ok(store)
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, roster: &Roster) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&roster.sorted())?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Run `op` on a copy, persist it, then commit.
    fn mutate<F>(&mut self, op: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Roster) -> Result<(), StoreError>,
    {
        let mut next = self.roster.clone();
        op(&mut next)?;
        self.save(&next)?;
        self.roster = next;
        Ok(())
    }
}

impl PlayerStore for JsonFilePlayerStore {
    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.roster.sorted())
    }

    fn set_presence(&mut self, id: PlayerId, present: bool) -> Result<(), StoreError> {
        self.mutate(|r| r.set_presence(id, present))
    }

    fn set_last_played_round(&mut self, round: u32, ids: &[PlayerId]) -> Result<(), StoreError> {
        self.mutate(|r| r.set_last_played_round(round, ids))
    }

    fn increment_bench_count(&mut self, ids: &[PlayerId]) -> Result<(), StoreError> {
        self.mutate(|r| r.increment_bench_count(ids))
    }

    fn patch(&mut self, updates: &[PlayerUpdate]) -> Result<(), StoreError> {
        self.mutate(|r| r.patch(updates))
    }

    fn upsert(&mut self, players: Vec<Player>) -> Result<(), StoreError> {
        self.mutate(|r| r.upsert(players))
    }
}
