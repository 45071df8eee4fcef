//! Session Module
//!
//! Stateful plumbing around the rotation core: configuration, the player
//! store and the court session that ties them together.
//!
//! ## Module Structure
//!
//! - `config`: Environment configuration
//! - `store`: Player store trait and backends
//! - `session`: Court session lifecycle

pub mod config;
pub mod store;
#[allow(clippy::module_inception)]
pub mod session;

pub use config::SessionConfig;
pub use store::{PlayerStore, PlayerUpdate, StoreError, InMemoryPlayerStore, JsonFilePlayerStore};
pub use session::{CourtSession, RoundReport, SessionError, SessionState};
