//! # Swiss Tournament
//!
//! Player registration, match reporting, standings and Swiss-system pairings
//! backed by PostgreSQL.
//!
//! ## Architecture
//!
//! A round is prepared in three steps:
//!
//! - **Standings**: wins and matches played for every registered player,
//!   aggregated by the store on each request
//! - **Bye**: with an odd player count, one player who has not had a bye yet
//!   is chosen at random, credited with a win, and left out of the round
//! - **Pairing**: the remaining players are ordered by win ratio and paired
//!   with their neighbour
//!
//! ## Core Modules
//!
//! - [`db`]: Connection pool, schema, and the [`db::TournamentRepository`]
//!   store abstraction
//! - [`tournament`]: Models, errors, and the tournament logic
//!
//! ## Example
//!
//! ```
//! use swiss_tournament::tournament::{StandingRow, swiss_pairings};
//!
//! let standings = vec![
//!     StandingRow { id: 1, name: "Ann".into(), wins: 1, matches: 1 },
//!     StandingRow { id: 2, name: "Bob".into(), wins: 0, matches: 1 },
//! ];
//! let pairings = swiss_pairings(standings);
//! assert_eq!(pairings[0].ids(), (1, 2));
//! ```

/// Database pool, schema, and repository.
pub mod db;

/// Tournament models and logic.
pub mod tournament;

pub use db::{Database, DatabaseConfig, PgTournamentRepository, TournamentRepository};
pub use tournament::{
    ByeResolver, Pairing, PlayerId, RoundPairings, StandingRow, TournamentError,
    TournamentManager, TournamentResult,
};
