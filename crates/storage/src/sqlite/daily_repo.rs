use async_trait::async_trait;
use plan_core::model::{DailyLedger, QuestionId};
use sqlx::Row;
use std::collections::{BTreeMap, BTreeSet};

use super::SqliteRepository;
use super::mapping::{conn, i64_from_usize, parse_question_id, ser};
use crate::repository::{DailyRepository, StorageError};

#[async_trait]
impl DailyRepository for SqliteRepository {
    async fn load_daily(&self) -> Result<DailyLedger, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT date_key, question_id
            FROM daily_questions
            ORDER BY date_key ASC, position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        let mut generated: BTreeMap<String, Vec<QuestionId>> = BTreeMap::new();
        for row in rows {
            let date_key: String = row.try_get("date_key").map_err(ser)?;
            let raw: String = row.try_get("question_id").map_err(ser)?;
            generated
                .entry(date_key)
                .or_default()
                .push(parse_question_id(&raw)?);
        }

        let rows = sqlx::query("SELECT date_key, question_id FROM daily_completed")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        let mut completed: BTreeMap<String, BTreeSet<QuestionId>> = BTreeMap::new();
        for row in rows {
            let date_key: String = row.try_get("date_key").map_err(ser)?;
            let raw: String = row.try_get("question_id").map_err(ser)?;
            completed
                .entry(date_key)
                .or_default()
                .insert(parse_question_id(&raw)?);
        }

        // Date keys whose list or set is empty have no rows above.
        let rows = sqlx::query("SELECT date_key, has_generated, has_completed FROM daily_dates")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        for row in rows {
            let date_key: String = row.try_get("date_key").map_err(ser)?;
            let has_generated: bool = row.try_get("has_generated").map_err(ser)?;
            let has_completed: bool = row.try_get("has_completed").map_err(ser)?;
            if has_generated {
                generated.entry(date_key.clone()).or_default();
            }
            if has_completed {
                completed.entry(date_key).or_default();
            }
        }

        let last_generated: Option<String> =
            sqlx::query("SELECT last_generated FROM daily_meta WHERE id = 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(conn)?
                .map(|row| row.try_get::<Option<String>, _>("last_generated"))
                .transpose()
                .map_err(ser)?
                .flatten();

        Ok(DailyLedger::from_persisted(completed, generated, last_generated))
    }

    async fn save_daily(&self, daily: &DailyLedger) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        for table in ["daily_questions", "daily_completed", "daily_dates"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }

        for (date_key, questions) in daily.generated() {
            sqlx::query(
                r"
                INSERT INTO daily_dates (date_key, has_generated, has_completed)
                VALUES (?1, 1, 0)
                ON CONFLICT(date_key) DO UPDATE SET has_generated = 1
                ",
            )
            .bind(date_key)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
            for (position, id) in questions.iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO daily_questions (date_key, position, question_id)
                    VALUES (?1, ?2, ?3)
                    ",
                )
                .bind(date_key)
                .bind(i64_from_usize("position", position)?)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }
        }

        for (date_key, ids) in daily.completed_sets() {
            sqlx::query(
                r"
                INSERT INTO daily_dates (date_key, has_generated, has_completed)
                VALUES (?1, 0, 1)
                ON CONFLICT(date_key) DO UPDATE SET has_completed = 1
                ",
            )
            .bind(date_key)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
            for id in ids {
                sqlx::query("INSERT INTO daily_completed (date_key, question_id) VALUES (?1, ?2)")
                    .bind(date_key)
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(conn)?;
            }
        }

        sqlx::query(
            r"
            INSERT INTO daily_meta (id, last_generated)
            VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET last_generated = excluded.last_generated
            ",
        )
        .bind(daily.last_generated())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
