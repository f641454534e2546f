use drive_core::model::Account;
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{account_from_row, encode_completed, encode_scores};
use crate::repository::{AccountRepository, StorageError};

#[async_trait::async_trait]
impl AccountRepository for SqliteRepository {
    async fn insert_new_account(&self, account: &Account) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO accounts (username, password, level, completed_lessons, simulation_scores, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(username) DO NOTHING
            ",
        )
        .bind(account.username())
        .bind(account.password())
        .bind(account.level().as_str())
        .bind(encode_completed(account.completed_lessons())?)
        .bind(encode_scores(account.simulation_scores())?)
        .bind(account.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // DO NOTHING leaves the existing row untouched; zero affected rows
        // means the username was already taken.
        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }

        debug!(username = account.username(), "inserted account");
        Ok(())
    }

    async fn upsert_account(&self, account: &Account) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO accounts (username, password, level, completed_lessons, simulation_scores, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(username) DO UPDATE SET
                password = excluded.password,
                level = excluded.level,
                completed_lessons = excluded.completed_lessons,
                simulation_scores = excluded.simulation_scores
            ",
        )
        .bind(account.username())
        .bind(account.password())
        .bind(account.level().as_str())
        .bind(encode_completed(account.completed_lessons())?)
        .bind(encode_scores(account.simulation_scores())?)
        .bind(account.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        debug!(username = account.username(), "upserted account");
        Ok(())
    }

    async fn get_account(&self, username: &str) -> Result<Option<Account>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT username, password, level, completed_lessons, simulation_scores, created_at
            FROM accounts WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => account_from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_accounts(&self, limit: u32) -> Result<Vec<Account>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT username, password, level, completed_lessons, simulation_scores, created_at
            FROM accounts
            ORDER BY username ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows {
            accounts.push(account_from_row(&row)?);
        }
        Ok(accounts)
    }
}
