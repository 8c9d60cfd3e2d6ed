//! Tournament module for Swiss-system play.
//!
//! This module provides:
//! - Player registration with name sanitization
//! - Match reporting
//! - Standings (wins and matches per player)
//! - Bye handling for odd player counts
//! - Pairing of players with similar records
//!
//! ## Example
//!
//! ```no_run
//! use swiss_tournament::db::{Database, PgTournamentRepository};
//! use swiss_tournament::tournament::TournamentManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     db.ensure_schema().await?;
//!     let repo = PgTournamentRepository::new(db.pool().clone());
//!     let manager = TournamentManager::new(Arc::new(repo));
//!
//!     let ann = manager.register_player("Ann").await?;
//!     let bob = manager.register_player("Bob").await?;
//!     manager.report_match(ann, bob).await?;
//!
//!     for pairing in manager.generate_pairings().await? {
//!         println!("{} vs {}", pairing.first.name, pairing.second.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod bye;
pub mod errors;
pub mod manager;
pub mod models;
pub mod pairing;
pub mod sanitize;
pub mod standings;

pub use bye::ByeResolver;
pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    BYE_OPPONENT_ID, ByeOutcome, MatchRecord, PairedPlayer, Pairing, Player, PlayerId,
    RoundPairings, StandingRow,
};
pub use pairing::{pair_adjacent, rank_by_win_ratio, swiss_pairings};
pub use sanitize::{MAX_NAME_LENGTH, sanitize_name};
pub use standings::{compute_standings, tally_standings};
