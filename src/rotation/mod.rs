//! Rotation Logic Module
//!
//! Everything that decides who plays, with whom and against whom.
//! Pure and synchronous; deterministic for a given tie-break seed.
//!
//! ## Module Structure
//!
//! - `player`: Player snapshots and ids
//! - `history`: Teammate history and last-bench memory
//! - `selector`: Fairness selection (playing vs benched)
//! - `grouper`: Skill-band grouping into courts of four
//! - `splitter`: Team splitting within a court
//! - `round`: Rounds, matches and persistence deltas
//! - `orchestrator`: Per-round composition of the above

pub mod player;
pub mod history;
pub mod selector;
pub mod grouper;
pub mod splitter;
pub mod round;
pub mod orchestrator;

// Re-export key types
pub use player::{Player, PlayerId, Gender};
pub use history::{PairKey, TeammateHistory, LastBenchedSet};
pub use selector::{RotationError, Selection, select_players};
pub use grouper::{Group, Grouping, group_into_fours};
pub use splitter::{TeamSplit, split_teams};
pub use round::{Match, Round, RoundOutcome, PersistenceDeltas};
pub use orchestrator::{RoundOrchestrator, RotationConfig};
