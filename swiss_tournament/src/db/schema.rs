//! Table definitions for the tournament store.
//!
//! Statements are idempotent and safe to run on every start.

use sqlx::PgPool;

/// Players and their bye flag
pub const CREATE_PLAYERS: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    had_bye BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

/// Match results
///
/// `loser` has no foreign key: a bye is stored with loser 0.
pub const CREATE_MATCHES: &str = r#"
CREATE TABLE IF NOT EXISTS matches (
    id BIGSERIAL PRIMARY KEY,
    winner BIGINT NOT NULL REFERENCES players (id) ON DELETE CASCADE,
    loser BIGINT NOT NULL,
    CONSTRAINT no_self_play CHECK (winner <> loser)
)
"#;

pub const CREATE_MATCHES_LOSER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS matches_loser_idx ON matches (loser)";

/// All statements, in dependency order
pub const STATEMENTS: &[&str] = &[CREATE_PLAYERS, CREATE_MATCHES, CREATE_MATCHES_LOSER_INDEX];

/// Create any missing tables in one transaction
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    log::info!("Tournament schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent() {
        for statement in STATEMENTS {
            assert!(statement.contains("IF NOT EXISTS"), "{statement}");
        }
    }

    #[test]
    fn test_players_created_before_matches() {
        let players = STATEMENTS.iter().position(|s| *s == CREATE_PLAYERS);
        let matches = STATEMENTS.iter().position(|s| *s == CREATE_MATCHES);
        assert!(players < matches);
    }
}
