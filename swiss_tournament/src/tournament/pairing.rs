//! Swiss pairing of an even-sized player pool.

use super::models::{Pairing, StandingRow};

/// Order players by win ratio, best first.
///
/// The sort is stable: players with equal ratios keep their standings order.
/// Ratio alone decides, so a 1/1 player ranks level with a 3/3 player.
pub fn rank_by_win_ratio(mut standings: Vec<StandingRow>) -> Vec<StandingRow> {
    standings.sort_by(|a, b| b.win_ratio().total_cmp(&a.win_ratio()));
    standings
}

/// Pair neighbours: positions (0, 1), (2, 3), ...
///
/// `ranked` must have even length. Nothing stops two players from meeting
/// again if they are still neighbours.
pub fn pair_adjacent(ranked: &[StandingRow]) -> Vec<Pairing> {
    debug_assert!(
        ranked.len() % 2 == 0,
        "cannot pair an odd number of players ({})",
        ranked.len()
    );

    ranked
        .chunks_exact(2)
        .map(|pair| Pairing::new(&pair[0], &pair[1]))
        .collect()
}

/// Rank and pair in one step
pub fn swiss_pairings(standings: Vec<StandingRow>) -> Vec<Pairing> {
    pair_adjacent(&rank_by_win_ratio(standings))
}
