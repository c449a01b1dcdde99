use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Applies pending schema versions in order.
///
/// Version 1 creates the progress ledger tables (start date, statuses, solved
/// counts, notes) and the daily sampler tables (generated lists, completions,
/// marker). Version 2 adds the per-date key table.
#[allow(clippy::too_many_lines)]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS tracker_settings (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    start_date TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS day_status (
                    day INTEGER PRIMARY KEY CHECK (day >= 1),
                    status TEXT NOT NULL CHECK (status IN ('planned', 'in-progress', 'completed'))
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS question_progress (
                    day INTEGER PRIMARY KEY CHECK (day >= 1),
                    easy INTEGER NOT NULL CHECK (easy >= 0),
                    medium INTEGER NOT NULL CHECK (medium >= 0),
                    hard INTEGER NOT NULL CHECK (hard >= 0)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS day_notes (
                    day INTEGER PRIMARY KEY CHECK (day >= 1),
                    note TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS daily_questions (
                    date_key TEXT NOT NULL,
                    position INTEGER NOT NULL CHECK (position >= 0),
                    question_id TEXT NOT NULL,
                    PRIMARY KEY (date_key, position)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS daily_completed (
                    date_key TEXT NOT NULL,
                    question_id TEXT NOT NULL,
                    PRIMARY KEY (date_key, question_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS daily_meta (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    last_generated TEXT
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_daily_completed_question
                    ON daily_completed (question_id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    // Version 2: one row per daily date key, so empty lists and sets survive.
    if !is_applied(pool, 2).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS daily_dates (
                    date_key TEXT PRIMARY KEY,
                    has_generated INTEGER NOT NULL CHECK (has_generated IN (0, 1)),
                    has_completed INTEGER NOT NULL CHECK (has_completed IN (0, 1))
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(2_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
