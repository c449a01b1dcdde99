use async_trait::async_trait;
use chrono::NaiveDate;
use plan_core::model::{Difficulty, ProgressLedger};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, parse_day_status, ser, u32_from_i64};
use crate::repository::{LedgerRepository, StorageError};

#[async_trait]
impl LedgerRepository for SqliteRepository {
    async fn load_ledger(&self) -> Result<Option<ProgressLedger>, StorageError> {
        let row = sqlx::query("SELECT start_date FROM tracker_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let start_date: NaiveDate = row.try_get("start_date").map_err(ser)?;
        let mut ledger = ProgressLedger::new(start_date);

        let rows = sqlx::query("SELECT day, status FROM day_status ORDER BY day ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        for row in rows {
            let day = u32_from_i64("day", row.try_get("day").map_err(ser)?)?;
            let status: String = row.try_get("status").map_err(ser)?;
            ledger.set_status(day, parse_day_status(&status)?);
        }

        let rows = sqlx::query(
            r"
            SELECT day, easy, medium, hard
            FROM question_progress
            ORDER BY day ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        for row in rows {
            let day = u32_from_i64("day", row.try_get("day").map_err(ser)?)?;
            for difficulty in Difficulty::ALL {
                let column = difficulty.as_str();
                let count = u32_from_i64(column, row.try_get(column).map_err(ser)?)?;
                ledger.set_question_progress(day, difficulty, count);
            }
        }

        let rows = sqlx::query("SELECT day, note FROM day_notes ORDER BY day ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        for row in rows {
            let day = u32_from_i64("day", row.try_get("day").map_err(ser)?)?;
            let note: String = row.try_get("note").map_err(ser)?;
            ledger.set_note(day, note);
        }

        Ok(Some(ledger))
    }

    async fn save_ledger(&self, ledger: &ProgressLedger) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO tracker_settings (id, start_date)
            VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET start_date = excluded.start_date
            ",
        )
        .bind(ledger.start_date())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        for table in ["day_status", "question_progress", "day_notes"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }

        for (day, status) in ledger.statuses() {
            sqlx::query("INSERT INTO day_status (day, status) VALUES (?1, ?2)")
                .bind(i64::from(day))
                .bind(status.as_str())
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }

        for (day, counts) in ledger.progress_entries() {
            sqlx::query(
                r"
                INSERT INTO question_progress (day, easy, medium, hard)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(i64::from(day))
            .bind(i64::from(counts.easy))
            .bind(i64::from(counts.medium))
            .bind(i64::from(counts.hard))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        for (day, note) in ledger.notes() {
            sqlx::query("INSERT INTO day_notes (day, note) VALUES (?1, ?2)")
                .bind(i64::from(day))
                .bind(note)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
