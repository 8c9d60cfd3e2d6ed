//! Database operation timeout helpers
//!
//! Wraps store operations so a stalled connection surfaces as an error
//! instead of hanging the caller.

use crate::tournament::{TournamentError, TournamentResult};
use std::time::Duration;
use tokio::time::timeout;

/// Default timeout for a store operation (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Execute a store operation with timeout
///
/// The future may be a single query (`sqlx::Error`) or a whole transaction
/// (`TournamentError`). When the timeout fires the future is dropped, which
/// rolls back any open transaction.
///
/// # Example
///
/// ```no_run
/// use swiss_tournament::db::timeouts::{with_timeout, DEFAULT_QUERY_TIMEOUT};
/// # use sqlx::PgPool;
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
///
/// let count: i64 = with_timeout(
///     DEFAULT_QUERY_TIMEOUT,
///     sqlx::query_scalar("SELECT COUNT(*) FROM players").fetch_one(pool),
/// )
/// .await?;
///
/// # Ok(())
/// # }
/// ```
pub async fn with_timeout<F, T, E>(duration: Duration, future: F) -> TournamentResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<TournamentError>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            log::warn!("Store operation timed out after {:?}", duration);
            Err(TournamentError::Timeout(duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_timeout() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, sqlx::Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_error_is_converted() {
        let result: TournamentResult<()> = with_timeout(Duration::from_secs(1), async {
            Err(sqlx::Error::PoolClosed)
        })
        .await;
        assert!(matches!(result, Err(TournamentError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_tournament_error_passes_through() {
        let result: TournamentResult<()> = with_timeout(Duration::from_secs(1), async {
            Err(TournamentError::PlayerNotFound(3))
        })
        .await;
        assert!(matches!(result, Err(TournamentError::PlayerNotFound(3))));
    }

    #[tokio::test]
    async fn test_timeout_fires() {
        let result: TournamentResult<()> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;

        match result {
            Err(TournamentError::Timeout(d)) => assert_eq!(d, Duration::from_millis(10)),
            other => panic!("Expected timeout, got {other:?}"),
        }
    }
}
