//! # Court Rotation
//!
//! Fair bench rotation and skill-balanced doubles matchmaking for
//! multi-court racket-sport sessions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      COURT ROTATION                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Seeded Xorshift128+ tie-breaker           │
//! │  └── hash.rs     - Round hashing for replay checks           │
//! │                                                              │
//! │  rotation/       - Matchmaking (deterministic)               │
//! │  ├── player.rs   - Player snapshots                          │
//! │  ├── history.rs  - Teammate history, last bench              │
//! │  ├── selector.rs - Who plays, who sits                       │
//! │  ├── grouper.rs  - Courts of four by skill band              │
//! │  ├── splitter.rs - Two teams of two per court                │
//! │  ├── round.rs    - Rounds, matches, persistence deltas       │
//! │  └── orchestrator.rs - One round at a time                   │
//! │                                                              │
//! │  session/        - Plumbing (stateful, does I/O)             │
//! │  ├── config.rs   - Environment configuration                 │
//! │  ├── store.rs    - Player store trait + backends             │
//! │  └── session.rs  - Court session driver                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `rotation/` modules never read the clock for decisions,
//! never iterate a `HashMap`, and draw all randomness from a seeded
//! [`DeterministicRng`]. Given the same roster, counters and seed, every
//! round comes out the same.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod rotation;
pub mod session;

// Re-export commonly used types
pub use crate::core::rng::{DeterministicRng, TieBreaker};
pub use rotation::{
    Player, PlayerId, Gender, Match, Round, RoundOutcome, PersistenceDeltas,
    RoundOrchestrator, RotationConfig, RotationError,
};
pub use session::{CourtSession, PlayerStore, SessionConfig, SessionError, StoreError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Players per court (two teams of two).
pub const COURT_SIZE: usize = 4;

/// Fewest present players that can make a round.
pub const MIN_PLAYERS: usize = COURT_SIZE;

/// Default number of courts (16 players on court).
pub const DEFAULT_COURTS: usize = 4;

/// Default skill band: widest max-min spread inside a group.
pub const DEFAULT_SKILL_BAND: u32 = 2;
