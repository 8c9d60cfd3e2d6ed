//! Bye selection for rounds with an odd number of players.

use super::{
    errors::{TournamentError, TournamentResult},
    models::{ByeOutcome, Player, StandingRow},
};
use crate::db::TournamentRepository;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use std::sync::{Mutex, PoisonError};

/// Picks and records byes
///
/// The random source is injected so tests can fix the selection.
pub struct ByeResolver<G = StdRng> {
    rng: Mutex<G>,
}

impl ByeResolver<StdRng> {
    /// Create a resolver seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create a resolver with a reproducible selection sequence
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ByeResolver<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: RngCore + Send> ByeResolver<G> {
    /// Create a resolver around any random source
    pub fn with_rng(rng: G) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Choose uniformly among the eligible players
    ///
    /// # Errors
    ///
    /// * `TournamentError::NoEligibleByeCandidate` - `eligible` is empty
    pub fn choose<'a>(&self, eligible: &'a [Player]) -> TournamentResult<&'a Player> {
        if eligible.is_empty() {
            return Err(TournamentError::NoEligibleByeCandidate);
        }

        let index = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..eligible.len());

        Ok(&eligible[index])
    }

    /// Grant a bye and drop the bye player from the pairing pool
    ///
    /// `standings` must hold an odd number of rows. The selected player gets a
    /// win against the bye opponent and is flagged so they are never chosen
    /// again; both writes commit together.
    ///
    /// # Returns
    ///
    /// * The bye player's updated standings and the remaining even-length pool
    ///
    /// # Errors
    ///
    /// * `TournamentError::NoEligibleByeCandidate` - Every player in the pool
    ///   already had a bye
    /// * `TournamentError::ByeAlreadyGranted` - A concurrent caller flagged the
    ///   chosen player first
    pub async fn resolve<R>(
        &self,
        repo: &R,
        mut standings: Vec<StandingRow>,
    ) -> TournamentResult<(ByeOutcome, Vec<StandingRow>)>
    where
        R: TournamentRepository + ?Sized,
    {
        debug_assert!(
            standings.len() % 2 == 1,
            "bye resolution needs an odd player count, got {}",
            standings.len()
        );

        // Only players in this pool can sit out; someone registered after the
        // standings were read is not part of the round.
        let eligible: Vec<Player> = repo
            .players_without_bye()
            .await?
            .into_iter()
            .filter(|player| standings.iter().any(|row| row.id == player.id))
            .collect();

        let chosen = self.choose(&eligible)?.id;
        repo.grant_bye(chosen).await?;

        let index = standings
            .iter()
            .position(|row| row.id == chosen)
            .ok_or(TournamentError::PlayerNotFound(chosen))?;
        let mut player = standings.remove(index);
        player.wins += 1;
        player.matches += 1;

        log::info!(
            "Granted bye to player {} ({}), {} players left to pair",
            player.id,
            player.name,
            standings.len()
        );

        Ok((ByeOutcome { player }, standings))
    }
}
