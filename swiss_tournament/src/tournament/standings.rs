//! Standings calculation.

use super::{
    errors::TournamentResult,
    models::{MatchRecord, Player, StandingRow},
};
use crate::db::TournamentRepository;
use std::collections::HashMap;

/// Compute the current standings from the store.
///
/// Every registered player is listed, including those who have not played.
/// Rows are ordered by wins descending, then by player id. Nothing is cached:
/// each call reads the store again.
pub async fn compute_standings<R>(repo: &R) -> TournamentResult<Vec<StandingRow>>
where
    R: TournamentRepository + ?Sized,
{
    let standings = repo.standings().await?;

    debug_assert!(
        standings
            .iter()
            .all(|row| row.wins >= 0 && row.matches >= row.wins),
        "store returned inconsistent standings"
    );

    log::debug!("Computed standings for {} players", standings.len());
    Ok(standings)
}

/// Aggregate standings from raw players and match records.
///
/// Players without any match still get a row with zero wins and zero matches.
/// Records naming an unknown id (such as the bye opponent) count for nobody.
pub fn tally_standings(players: &[Player], matches: &[MatchRecord]) -> Vec<StandingRow> {
    let mut wins: HashMap<i64, i64> = HashMap::new();
    let mut losses: HashMap<i64, i64> = HashMap::new();

    for record in matches {
        *wins.entry(record.winner).or_default() += 1;
        *losses.entry(record.loser).or_default() += 1;
    }

    let mut standings: Vec<StandingRow> = players
        .iter()
        .map(|player| {
            let won = wins.get(&player.id).copied().unwrap_or(0);
            let lost = losses.get(&player.id).copied().unwrap_or(0);
            StandingRow {
                id: player.id,
                name: player.name.clone(),
                wins: won,
                matches: won + lost,
            }
        })
        .collect();

    standings.sort_by(|a, b| b.wins.cmp(&a.wins).then(a.id.cmp(&b.id)));
    standings
}
