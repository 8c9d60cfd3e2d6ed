//! Tournament data models for Swiss-system play.

use serde::{Deserialize, Serialize};

/// Player ID type (assigned by the store, starts at 1)
pub type PlayerId = i64;

/// Opponent id recorded as the loser of a bye match.
///
/// Player ids come from a `BIGSERIAL` column and are always positive, so this
/// value never collides with a registered player.
pub const BYE_OPPONENT_ID: PlayerId = 0;

/// Registered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID
    pub id: PlayerId,
    /// Display name (already sanitized)
    pub name: String,
    /// Whether the player has already received a bye
    pub had_bye: bool,
}

/// Outcome of a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Winning player
    pub winner: PlayerId,
    /// Losing player, or [`BYE_OPPONENT_ID`] for a bye
    pub loser: PlayerId,
}

impl MatchRecord {
    /// Create a regular match record
    pub fn new(winner: PlayerId, loser: PlayerId) -> Self {
        Self { winner, loser }
    }

    /// Create the synthetic win recorded for a bye
    pub fn bye(player: PlayerId) -> Self {
        Self {
            winner: player,
            loser: BYE_OPPONENT_ID,
        }
    }

    /// Whether this record represents a bye
    pub fn is_bye(&self) -> bool {
        self.loser == BYE_OPPONENT_ID
    }
}

/// One line of the standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    /// Player ID
    pub id: PlayerId,
    /// Player name
    pub name: String,
    /// Matches won (byes included)
    pub wins: i64,
    /// Matches played (byes included)
    pub matches: i64,
}

impl StandingRow {
    /// Matches lost
    pub fn losses(&self) -> i64 {
        self.matches - self.wins
    }

    /// Fraction of played matches that were won.
    ///
    /// A player who has not played yet has a ratio of `0.0`.
    pub fn win_ratio(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.wins as f64 / self.matches as f64
        }
    }
}

/// Identity of one side of a pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedPlayer {
    /// Player ID
    pub id: PlayerId,
    /// Display name
    pub name: String,
}

impl From<&StandingRow> for PairedPlayer {
    fn from(row: &StandingRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
        }
    }
}

/// Two players meeting in the next round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// Higher-ranked player of the two
    pub first: PairedPlayer,
    /// Next player in the ranking
    pub second: PairedPlayer,
}

impl Pairing {
    /// Pair two standings rows
    pub fn new(first: &StandingRow, second: &StandingRow) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Both player ids, in pairing order
    pub fn ids(&self) -> (PlayerId, PlayerId) {
        (self.first.id, self.second.id)
    }

    /// Whether the given player takes part in this pairing
    pub fn contains(&self, player: PlayerId) -> bool {
        self.first.id == player || self.second.id == player
    }
}

/// Player who sat out the round with an automatic win
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByeOutcome {
    /// Standings of the bye player after the bye was credited
    pub player: StandingRow,
}

/// Full result of pairing a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPairings {
    /// Matches to play
    pub pairings: Vec<Pairing>,
    /// Bye granted while preparing the round (odd player count only)
    pub bye: Option<ByeOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: PlayerId, wins: i64, matches: i64) -> StandingRow {
        StandingRow {
            id,
            name: format!("Player {id}"),
            wins,
            matches,
        }
    }

    #[test]
    fn test_win_ratio() {
        assert_eq!(row(1, 3, 4).win_ratio(), 0.75);
        assert_eq!(row(2, 0, 2).win_ratio(), 0.0);
        assert_eq!(row(3, 2, 2).win_ratio(), 1.0);
    }

    #[test]
    fn test_win_ratio_without_matches_is_zero() {
        let ratio = row(1, 0, 0).win_ratio();
        assert_eq!(ratio, 0.0);
        assert!(!ratio.is_nan());
    }

    #[test]
    fn test_losses() {
        assert_eq!(row(1, 1, 3).losses(), 2);
        assert_eq!(row(2, 0, 0).losses(), 0);
    }

    #[test]
    fn test_bye_record() {
        let record = MatchRecord::bye(7);
        assert_eq!(record.winner, 7);
        assert_eq!(record.loser, BYE_OPPONENT_ID);
        assert!(record.is_bye());
        assert!(!MatchRecord::new(7, 8).is_bye());
    }

    #[test]
    fn test_pairing_keeps_identities() {
        let pairing = Pairing::new(&row(4, 1, 1), &row(9, 1, 1));
        assert_eq!(pairing.ids(), (4, 9));
        assert_eq!(pairing.first.name, "Player 4");
        assert_eq!(pairing.second.name, "Player 9");
        assert!(pairing.contains(4));
        assert!(pairing.contains(9));
        assert!(!pairing.contains(5));
    }
}
