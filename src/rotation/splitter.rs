//! Team Splitting
//!
//! Pairs one court's four players into two teams of two. There are exactly
//! three ways to do it; the one with the closest team averages wins, with a
//! soft penalty for pairs that have already been teammates this session.

use crate::rotation::grouper::Group;
use crate::rotation::history::TeammateHistory;
use crate::rotation::player::Player;

/// Weight applied to the difference in team averages.
pub const AVERAGE_DIFF_WEIGHT: u64 = 10;

/// The three distinct pairings of group positions, in preference order.
pub const CANDIDATE_SPLITS: [[[usize; 2]; 2]; 3] = [
    [[0, 1], [2, 3]],
    [[0, 2], [1, 3]],
    [[0, 3], [1, 2]],
];

/// A two-player team.
pub type Team = [Player; 2];

/// Chosen split for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSplit {
    /// Index into [`CANDIDATE_SPLITS`].
    pub candidate: usize,
    /// First team.
    pub team1: Team,
    /// Second team.
    pub team2: Team,
    /// Mean skill of `team1`.
    pub avg1: f64,
    /// Mean skill of `team2`.
    pub avg2: f64,
    /// Score the split was chosen with (lower is better).
    pub score: u64,
}

#[inline]
fn team_sum(group: &Group, positions: [usize; 2]) -> u64 {
    group[positions[0]].skill_level as u64 + group[positions[1]].skill_level as u64
}

/// Score of one candidate split.
///
/// `10 * |avgA - avgB|` is computed as `5 * |sumA - sumB|` so the score is
/// an exact integer and ties compare exactly.
pub fn split_score(group: &Group, split: [[usize; 2]; 2], history: &TeammateHistory) -> u64 {
    let [a, b] = split;
    let diff = team_sum(group, a).abs_diff(team_sum(group, b));
    let penalty = history.count(group[a[0]].id, group[a[1]].id) as u64
        + history.count(group[b[0]].id, group[b[1]].id) as u64;

    diff * AVERAGE_DIFF_WEIGHT / 2 + penalty
}

/// Pick the best candidate without touching history.
///
/// Returns the candidate index and its score. Only a strictly lower score
/// displaces an earlier candidate.
pub fn choose_split(group: &Group, history: &TeammateHistory) -> (usize, u64) {
    let mut best = 0;
    let mut best_score = split_score(group, CANDIDATE_SPLITS[0], history);

    for (idx, split) in CANDIDATE_SPLITS.iter().enumerate().skip(1) {
        let score = split_score(group, *split, history);
        if score < best_score {
            best = idx;
            best_score = score;
        }
    }

    (best, best_score)
}

#[inline]
fn team_average(team: &Team) -> f64 {
    (team[0].skill_level as f64 + team[1].skill_level as f64) / 2.0
}

/// Split a group into two teams and record both pairings in `history`.
pub fn split_teams(group: &Group, history: &mut TeammateHistory) -> TeamSplit {
    let (candidate, score) = choose_split(group, history);
    let [a, b] = CANDIDATE_SPLITS[candidate];

    let team1: Team = [group[a[0]].clone(), group[a[1]].clone()];
    let team2: Team = [group[b[0]].clone(), group[b[1]].clone()];

    history.record(team1[0].id, team1[1].id);
    history.record(team2[0].id, team2[1].id);

    TeamSplit {
        candidate,
        avg1: team_average(&team1),
        avg2: team_average(&team2),
        team1,
        team2,
        score,
    }
}
