//! Skill Grouping
//!
//! Carves the playing list into courts of four. Greedy: the highest-rated
//! window that fits inside the skill band goes first; when no window fits,
//! the band is dropped and the strongest four remaining are taken as-is.

use crate::COURT_SIZE;
use crate::rotation::player::Player;

/// One court's worth of players, strongest first.
pub type Group = [Player; COURT_SIZE];

/// Result of a grouping pass.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    /// Groups in formation order (court 1 first).
    pub groups: Vec<Group>,
    /// Players who did not fit in any group.
    pub leftover: Vec<Player>,
}

/// Skill range (max - min) of a window sorted descending.
#[inline]
fn window_range(window: &[Player]) -> u32 {
    match (window.first(), window.last()) {
        (Some(top), Some(bottom)) => top.skill_level.saturating_sub(bottom.skill_level),
        _ => 0,
    }
}

/// Index of the first window of [`COURT_SIZE`] whose range fits `skill_band`.
fn find_band_window(pool: &[Player], skill_band: u32) -> Option<usize> {
    pool.windows(COURT_SIZE)
        .position(|w| window_range(w) <= skill_band)
}

/// Remove `COURT_SIZE` players starting at `start` as a group.
fn take_group(pool: &mut Vec<Player>, start: usize) -> Group {
    let group = std::array::from_fn(|i| pool[start + i].clone());
    pool.drain(start..start + COURT_SIZE);
    group
}

/// Group playing players into at most `max_groups` courts.
///
/// Ties in skill keep the order they arrive in. Once a pass finds no window
/// inside the band, later passes cannot find one either (removing a prefix
/// never creates a new window), so the rest are taken strongest-first.
pub fn group_into_fours(playing: &[Player], max_groups: usize, skill_band: u32) -> Grouping {
    let mut pool: Vec<Player> = playing.to_vec();
    // Stable: equal skills keep selection order
    pool.sort_by(|a, b| b.skill_level.cmp(&a.skill_level));

    let mut groups = Vec::with_capacity(max_groups);

    while pool.len() >= COURT_SIZE && groups.len() < max_groups {
        let start = find_band_window(&pool, skill_band).unwrap_or(0);
        groups.push(take_group(&mut pool, start));
    }

    Grouping { groups, leftover: pool }
}
