//! Tournament error types.

use super::models::PlayerId;
use std::time::Duration;
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Store could not be reached or a transaction failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// Store did not answer in time
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// A player cannot play against themselves
    #[error("Invalid match: winner {winner} and loser {loser} are the same player")]
    InvalidMatch { winner: PlayerId, loser: PlayerId },

    /// Match references a player that is not registered
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Every player has already received a bye
    #[error("No eligible bye candidate: every player already had a bye")]
    NoEligibleByeCandidate,

    /// Another caller granted this player's bye first
    #[error("Bye already granted to player {0}")]
    ByeAlreadyGranted(PlayerId),

    /// Player name rejected before storage
    #[error("Invalid player name: {0}")]
    Sanitization(String),
}

impl TournamentError {
    /// Get a client-safe error message that doesn't leak store internals
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::StoreUnavailable(_) | TournamentError::Timeout(_) => {
                "Tournament store unavailable".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether the error comes from the store rather than from the request
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            TournamentError::StoreUnavailable(_) | TournamentError::Timeout(_)
        )
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_store_details() {
        let err = TournamentError::StoreUnavailable(sqlx::Error::PoolTimedOut);
        assert_eq!(err.client_message(), "Tournament store unavailable");
        assert!(err.is_store_failure());

        let err = TournamentError::Timeout(Duration::from_secs(5));
        assert_eq!(err.client_message(), "Tournament store unavailable");
    }

    #[test]
    fn test_client_message_keeps_validation_errors() {
        let err = TournamentError::InvalidMatch {
            winner: 3,
            loser: 3,
        };
        assert!(err.client_message().contains("same player"));
        assert!(!err.is_store_failure());

        let err = TournamentError::Sanitization("name is empty".to_string());
        assert_eq!(err.client_message(), "Invalid player name: name is empty");
    }
}
