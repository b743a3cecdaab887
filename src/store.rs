use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::AppResult;
use crate::models::CodeRecord;

/// Persistence for per-username code records.
///
/// Codes live in their own table, one row per code, so a merge appends
/// rows rather than rewriting a serialized list. Two concurrent merges
/// for the same username interleave their inserts instead of losing one
/// another's updates.
#[derive(Clone)]
pub struct CodeStore {
    db: SqlitePool,
}

impl CodeStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Appends `new_codes` to the record for `username`, creating the
    /// record if it does not exist. `length` and `count` are overwritten
    /// with this batch's values (last write wins, not a running total).
    ///
    /// Runs in a single transaction: either the full batch lands or
    /// nothing does. No retry; the store is local and the transaction
    /// either commits or rolls back.
    pub async fn merge_and_persist(
        &self,
        username: &str,
        new_codes: &[String],
        length: i64,
        count: i64,
    ) -> AppResult<CodeRecord> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO records (username, length, count, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(username) DO UPDATE SET
                length = excluded.length,
                count = excluded.count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(username)
        .bind(length)
        .bind(count)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for code in new_codes {
            sqlx::query("INSERT INTO codes (username, code) VALUES (?, ?)")
                .bind(username)
                .bind(code)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        log::debug!("merged {} codes for {username}", new_codes.len());

        // The upsert just committed, so the record must exist.
        self.fetch(username)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    /// Absent username is `None`, not an error.
    pub async fn fetch(&self, username: &str) -> AppResult<Option<CodeRecord>> {
        let row = sqlx::query(
            "SELECT username, length, count, created_at, updated_at FROM records WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let codes = sqlx::query("SELECT code FROM codes WHERE username = ? ORDER BY id")
            .bind(username)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(|r| r.get("code"))
            .collect();

        Ok(Some(CodeRecord {
            username: row.get("username"),
            length: row.get("length"),
            count: row.get("count"),
            codes,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }
}
