//! Repository trait for the tournament store.
//!
//! All store access goes through [`TournamentRepository`], so the tournament
//! logic can run against PostgreSQL or against the in-memory [`mock`].

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::time::Duration;

use super::schema;
use super::timeouts::{DEFAULT_QUERY_TIMEOUT, with_timeout};
use crate::tournament::{
    BYE_OPPONENT_ID, Player, PlayerId, StandingRow, TournamentError, TournamentResult,
};

/// Trait for tournament store operations
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Check that the store answers
    async fn ping(&self) -> TournamentResult<()>;

    /// Create the tables if they do not exist yet
    async fn ensure_schema(&self) -> TournamentResult<()>;

    /// Delete every match
    async fn delete_matches(&self) -> TournamentResult<()>;

    /// Delete every player and every match
    async fn delete_players(&self) -> TournamentResult<()>;

    /// Number of registered players
    async fn count_players(&self) -> TournamentResult<i64>;

    /// Insert a player with an already sanitized name
    async fn create_player(&self, name: &str) -> TournamentResult<PlayerId>;

    /// Insert a match after checking both players exist, atomically
    ///
    /// Fails with `InvalidMatch` (and writes nothing) if `winner == loser`.
    async fn record_match(&self, winner: PlayerId, loser: PlayerId) -> TournamentResult<()>;

    /// Wins and matches per player, wins descending then id ascending
    async fn standings(&self) -> TournamentResult<Vec<StandingRow>>;

    /// Players who have not had a bye yet, by id
    async fn players_without_bye(&self) -> TournamentResult<Vec<Player>>;

    /// Record a bye win and set the player's bye flag in one transaction
    ///
    /// Fails with `ByeAlreadyGranted` (and writes nothing) if the flag is
    /// already set.
    async fn grant_bye(&self, player_id: PlayerId) -> TournamentResult<()>;
}

/// Default PostgreSQL implementation of `TournamentRepository`
#[derive(Clone)]
pub struct PgTournamentRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}

#[async_trait]
impl TournamentRepository for PgTournamentRepository {
    async fn ping(&self) -> TournamentResult<()> {
        with_timeout(
            self.query_timeout,
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> TournamentResult<()> {
        with_timeout(self.query_timeout, schema::ensure_schema(&self.pool)).await
    }

    async fn delete_matches(&self) -> TournamentResult<()> {
        with_timeout(
            self.query_timeout,
            sqlx::query("TRUNCATE matches").execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn delete_players(&self) -> TournamentResult<()> {
        with_timeout(
            self.query_timeout,
            sqlx::query("TRUNCATE players CASCADE").execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn count_players(&self) -> TournamentResult<i64> {
        with_timeout(
            self.query_timeout,
            sqlx::query_scalar("SELECT COUNT(*) FROM players").fetch_one(&self.pool),
        )
        .await
    }

    async fn create_player(&self, name: &str) -> TournamentResult<PlayerId> {
        let row = with_timeout(
            self.query_timeout,
            sqlx::query("INSERT INTO players (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(row.get("id"))
    }

    async fn record_match(&self, winner: PlayerId, loser: PlayerId) -> TournamentResult<()> {
        if winner == loser {
            return Err(TournamentError::InvalidMatch { winner, loser });
        }

        with_timeout(self.query_timeout, async {
            let mut tx = self.pool.begin().await?;

            // FOR SHARE keeps both players from being deleted until commit.
            let known: Vec<PlayerId> =
                sqlx::query_scalar("SELECT id FROM players WHERE id = $1 OR id = $2 FOR SHARE")
                    .bind(winner)
                    .bind(loser)
                    .fetch_all(&mut *tx)
                    .await?;

            for id in [winner, loser] {
                if !known.contains(&id) {
                    return Err(TournamentError::PlayerNotFound(id));
                }
            }

            sqlx::query("INSERT INTO matches (winner, loser) VALUES ($1, $2)")
                .bind(winner)
                .bind(loser)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    async fn standings(&self) -> TournamentResult<Vec<StandingRow>> {
        let rows = with_timeout(
            self.query_timeout,
            sqlx::query(
                r#"
                SELECT p.id,
                       p.name,
                       COALESCE(w.wins, 0) AS wins,
                       COALESCE(w.wins, 0) + COALESCE(l.losses, 0) AS matches
                FROM players p
                LEFT JOIN (SELECT winner AS id, COUNT(*) AS wins FROM matches GROUP BY winner) w
                       ON w.id = p.id
                LEFT JOIN (SELECT loser AS id, COUNT(*) AS losses FROM matches GROUP BY loser) l
                       ON l.id = p.id
                ORDER BY wins DESC, p.id
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StandingRow {
                id: r.get("id"),
                name: r.get("name"),
                wins: r.get("wins"),
                matches: r.get("matches"),
            })
            .collect())
    }

    async fn players_without_bye(&self) -> TournamentResult<Vec<Player>> {
        let rows = with_timeout(
            self.query_timeout,
            sqlx::query("SELECT id, name, had_bye FROM players WHERE NOT had_bye ORDER BY id")
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Player {
                id: r.get("id"),
                name: r.get("name"),
                had_bye: r.get("had_bye"),
            })
            .collect())
    }

    async fn grant_bye(&self, player_id: PlayerId) -> TournamentResult<()> {
        with_timeout(self.query_timeout, async {
            let mut tx = self.pool.begin().await?;

            let flagged = sqlx::query("UPDATE players SET had_bye = TRUE WHERE id = $1 AND NOT had_bye")
                .bind(player_id)
                .execute(&mut *tx)
                .await?;

            if flagged.rows_affected() == 0 {
                let exists: Option<PlayerId> =
                    sqlx::query_scalar("SELECT id FROM players WHERE id = $1")
                        .bind(player_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return Err(match exists {
                    Some(_) => TournamentError::ByeAlreadyGranted(player_id),
                    None => TournamentError::PlayerNotFound(player_id),
                });
            }

            sqlx::query("INSERT INTO matches (winner, loser) VALUES ($1, $2)")
                .bind(player_id)
                .bind(BYE_OPPONENT_ID)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }
}

/// In-memory implementation for tests, enabled by the `mock` feature
///
/// Mirrors the PostgreSQL semantics: ids start at 1, deleting players drops
/// their matches, and multi-step writes happen under one lock so they are
/// all-or-nothing.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use crate::tournament::{MatchRecord, tally_standings};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Default)]
    struct MockState {
        players: BTreeMap<PlayerId, Player>,
        matches: Vec<MatchRecord>,
        next_id: PlayerId,
    }

    pub struct MockTournamentRepository {
        state: Mutex<MockState>,
        unavailable: AtomicBool,
    }

    impl Default for MockTournamentRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockTournamentRepository {
        pub fn new() -> Self {
            Self {
                state: Mutex::new(MockState {
                    next_id: 1,
                    ..Default::default()
                }),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Make every following call fail as if the store were down
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Number of stored match rows, byes included
        pub fn match_count(&self) -> usize {
            self.lock().matches.len()
        }

        /// Stored match rows in insertion order
        pub fn matches(&self) -> Vec<MatchRecord> {
            self.lock().matches.clone()
        }

        /// Bye flag of a player, `None` if unknown
        pub fn had_bye(&self, player_id: PlayerId) -> Option<bool> {
            self.lock().players.get(&player_id).map(|p| p.had_bye)
        }

        fn lock(&self) -> MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn available(&self) -> TournamentResult<MutexGuard<'_, MockState>> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(TournamentError::StoreUnavailable(sqlx::Error::PoolTimedOut));
            }
            Ok(self.lock())
        }
    }

    #[async_trait]
    impl TournamentRepository for MockTournamentRepository {
        async fn ping(&self) -> TournamentResult<()> {
            self.available().map(|_| ())
        }

        async fn ensure_schema(&self) -> TournamentResult<()> {
            self.available().map(|_| ())
        }

        async fn delete_matches(&self) -> TournamentResult<()> {
            self.available()?.matches.clear();
            Ok(())
        }

        async fn delete_players(&self) -> TournamentResult<()> {
            let mut state = self.available()?;
            state.players.clear();
            state.matches.clear();
            Ok(())
        }

        async fn count_players(&self) -> TournamentResult<i64> {
            Ok(self.available()?.players.len() as i64)
        }

        async fn create_player(&self, name: &str) -> TournamentResult<PlayerId> {
            let mut state = self.available()?;
            let id = state.next_id;
            state.next_id += 1;
            state.players.insert(
                id,
                Player {
                    id,
                    name: name.to_string(),
                    had_bye: false,
                },
            );
            Ok(id)
        }

        async fn record_match(&self, winner: PlayerId, loser: PlayerId) -> TournamentResult<()> {
            let mut state = self.available()?;
            if winner == loser {
                return Err(TournamentError::InvalidMatch { winner, loser });
            }
            for id in [winner, loser] {
                if !state.players.contains_key(&id) {
                    return Err(TournamentError::PlayerNotFound(id));
                }
            }
            state.matches.push(MatchRecord::new(winner, loser));
            Ok(())
        }

        async fn standings(&self) -> TournamentResult<Vec<StandingRow>> {
            let state = self.available()?;
            let players: Vec<Player> = state.players.values().cloned().collect();
            Ok(tally_standings(&players, &state.matches))
        }

        async fn players_without_bye(&self) -> TournamentResult<Vec<Player>> {
            Ok(self
                .available()?
                .players
                .values()
                .filter(|p| !p.had_bye)
                .cloned()
                .collect())
        }

        async fn grant_bye(&self, player_id: PlayerId) -> TournamentResult<()> {
            let mut state = self.available()?;
            let player = state
                .players
                .get_mut(&player_id)
                .ok_or(TournamentError::PlayerNotFound(player_id))?;
            if player.had_bye {
                return Err(TournamentError::ByeAlreadyGranted(player_id));
            }
            player.had_bye = true;
            state.matches.push(MatchRecord::bye(player_id));
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_ids_start_at_one() {
            let repo = MockTournamentRepository::new();

            let first = repo.create_player("Ann").await.unwrap();
            let second = repo.create_player("Bob").await.unwrap();

            assert_eq!(first, 1);
            assert_eq!(second, 2);
            assert_ne!(first, BYE_OPPONENT_ID);
        }

        #[tokio::test]
        async fn test_mock_ids_not_reused_after_reset() {
            let repo = MockTournamentRepository::new();
            repo.create_player("Ann").await.unwrap();
            repo.delete_players().await.unwrap();

            let id = repo.create_player("Bob").await.unwrap();
            assert_eq!(id, 2);
        }

        #[tokio::test]
        async fn test_mock_record_match_requires_players() {
            let repo = MockTournamentRepository::new();
            let ann = repo.create_player("Ann").await.unwrap();

            let result = repo.record_match(ann, 42).await;
            assert!(matches!(result, Err(TournamentError::PlayerNotFound(42))));
            assert_eq!(repo.match_count(), 0);
        }

        #[tokio::test]
        async fn test_mock_record_match_rejects_self_play() {
            let repo = MockTournamentRepository::new();
            let ann = repo.create_player("Ann").await.unwrap();

            let result = repo.record_match(ann, ann).await;
            assert!(matches!(
                result,
                Err(TournamentError::InvalidMatch { winner, loser }) if winner == ann && loser == ann
            ));
            assert_eq!(repo.match_count(), 0);
        }

        #[tokio::test]
        async fn test_mock_grant_bye_once() {
            let repo = MockTournamentRepository::new();
            let ann = repo.create_player("Ann").await.unwrap();

            repo.grant_bye(ann).await.unwrap();
            assert_eq!(repo.had_bye(ann), Some(true));
            assert_eq!(repo.matches(), vec![MatchRecord::bye(ann)]);

            let result = repo.grant_bye(ann).await;
            assert!(matches!(result, Err(TournamentError::ByeAlreadyGranted(id)) if id == ann));
            assert_eq!(repo.match_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_grant_bye_unknown_player() {
            let repo = MockTournamentRepository::new();
            let result = repo.grant_bye(5).await;
            assert!(matches!(result, Err(TournamentError::PlayerNotFound(5))));
            assert_eq!(repo.match_count(), 0);
        }

        #[tokio::test]
        async fn test_mock_delete_matches_keeps_bye_flags() {
            let repo = MockTournamentRepository::new();
            let ann = repo.create_player("Ann").await.unwrap();
            repo.grant_bye(ann).await.unwrap();

            repo.delete_matches().await.unwrap();

            assert_eq!(repo.match_count(), 0);
            assert_eq!(repo.had_bye(ann), Some(true));
        }

        #[tokio::test]
        async fn test_mock_unavailable() {
            let repo = MockTournamentRepository::new();
            repo.set_unavailable(true);

            assert!(matches!(
                repo.count_players().await,
                Err(TournamentError::StoreUnavailable(_))
            ));
            assert!(repo.ping().await.is_err());

            repo.set_unavailable(false);
            assert!(repo.ping().await.is_ok());
        }
    }
}
