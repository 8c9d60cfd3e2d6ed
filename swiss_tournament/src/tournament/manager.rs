//! Tournament manager tying registration, results, standings and pairings
//! together.

use super::{
    bye::ByeResolver,
    errors::{TournamentError, TournamentResult},
    models::{Pairing, PlayerId, RoundPairings, StandingRow},
    pairing::swiss_pairings,
    sanitize::sanitize_name,
    standings::compute_standings,
};
use crate::db::TournamentRepository;
use rand::{RngCore, rngs::StdRng};
use std::sync::Arc;

/// Tournament manager
pub struct TournamentManager<R, G = StdRng> {
    repo: Arc<R>,
    bye_resolver: ByeResolver<G>,
}

impl<R: TournamentRepository> TournamentManager<R, StdRng> {
    /// Create a new tournament manager with an OS-seeded bye resolver
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_bye_resolver(repo, ByeResolver::new())
    }
}

impl<R: TournamentRepository, G: RngCore + Send> TournamentManager<R, G> {
    /// Create a tournament manager with a specific bye resolver
    pub fn with_bye_resolver(repo: Arc<R>, bye_resolver: ByeResolver<G>) -> Self {
        Self { repo, bye_resolver }
    }

    /// Get the underlying repository
    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Check that the store answers
    pub async fn health_check(&self) -> TournamentResult<()> {
        self.repo.ping().await
    }

    /// Create the store's tables if needed
    pub async fn ensure_schema(&self) -> TournamentResult<()> {
        self.repo.ensure_schema().await
    }

    /// Remove all match records
    pub async fn reset_matches(&self) -> TournamentResult<()> {
        self.repo.delete_matches().await?;
        log::info!("Deleted all matches");
        Ok(())
    }

    /// Remove all players and, with them, all matches
    pub async fn reset_players(&self) -> TournamentResult<()> {
        self.repo.delete_players().await?;
        log::info!("Deleted all players and matches");
        Ok(())
    }

    /// Number of registered players
    pub async fn count_players(&self) -> TournamentResult<i64> {
        self.repo.count_players().await
    }

    /// Register a player
    ///
    /// # Arguments
    ///
    /// * `name` - Display name, need not be unique
    ///
    /// # Returns
    ///
    /// * `TournamentResult<PlayerId>` - ID assigned by the store
    ///
    /// # Errors
    ///
    /// * `TournamentError::Sanitization` - Name rejected; nothing is stored
    pub async fn register_player(&self, name: &str) -> TournamentResult<PlayerId> {
        let name = sanitize_name(name).inspect_err(|e| {
            log::warn!("Rejected player registration: {}", e);
        })?;

        let id = self.repo.create_player(&name).await?;
        log::info!("Registered player {} ({})", id, name);
        Ok(id)
    }

    /// Record the outcome of a match
    ///
    /// # Errors
    ///
    /// * `TournamentError::InvalidMatch` - `winner == loser`; nothing is stored
    /// * `TournamentError::PlayerNotFound` - Either player is not registered
    pub async fn report_match(&self, winner: PlayerId, loser: PlayerId) -> TournamentResult<()> {
        if winner == loser {
            log::warn!("Rejected self-play report for player {}", winner);
            return Err(TournamentError::InvalidMatch { winner, loser });
        }

        self.repo.record_match(winner, loser).await?;
        log::info!("Recorded match: {} beat {}", winner, loser);
        Ok(())
    }

    /// Current standings, best record first
    pub async fn player_standings(&self) -> TournamentResult<Vec<StandingRow>> {
        compute_standings(self.repo.as_ref()).await
    }

    /// Pairings for the next round
    ///
    /// With an odd number of players one of them is given a bye first, which
    /// is written to the store before the pairings are returned.
    ///
    /// # Errors
    ///
    /// * `TournamentError::NoEligibleByeCandidate` - Odd player count and
    ///   every player already had a bye
    pub async fn generate_pairings(&self) -> TournamentResult<Vec<Pairing>> {
        Ok(self.generate_round().await?.pairings)
    }

    /// Pairings for the next round together with the bye, if one was granted
    pub async fn generate_round(&self) -> TournamentResult<RoundPairings> {
        let mut standings = compute_standings(self.repo.as_ref()).await?;

        let mut bye = None;
        if standings.len() % 2 != 0 {
            let (outcome, remaining) = self
                .bye_resolver
                .resolve(self.repo.as_ref(), standings)
                .await?;
            bye = Some(outcome);
            standings = remaining;
        }

        let pairings = swiss_pairings(standings);
        log::info!(
            "Generated {} pairings{}",
            pairings.len(),
            if bye.is_some() { " with a bye" } else { "" }
        );

        Ok(RoundPairings { pairings, bye })
    }
}
