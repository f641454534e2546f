use drive_core::model::Account;
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{account_from_row, encode_completed, encode_scores};
use crate::repository::{ActiveAccountRepository, StorageError};

// The mirror row always lives at id = 1; the CHECK constraint in the schema
// keeps a second row from ever appearing.
const ACTIVE_ROW_ID: i64 = 1;

#[async_trait::async_trait]
impl ActiveAccountRepository for SqliteRepository {
    async fn set_active(&self, account: &Account) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO active_account (id, username, password, level, completed_lessons, simulation_scores, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                password = excluded.password,
                level = excluded.level,
                completed_lessons = excluded.completed_lessons,
                simulation_scores = excluded.simulation_scores,
                created_at = excluded.created_at
            ",
        )
        .bind(ACTIVE_ROW_ID)
        .bind(account.username())
        .bind(account.password())
        .bind(account.level().as_str())
        .bind(encode_completed(account.completed_lessons())?)
        .bind(encode_scores(account.simulation_scores())?)
        .bind(account.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        debug!(username = account.username(), "set active account");
        Ok(())
    }

    async fn get_active(&self) -> Result<Option<Account>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT username, password, level, completed_lessons, simulation_scores, created_at
            FROM active_account WHERE id = ?1
            ",
        )
        .bind(ACTIVE_ROW_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => account_from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn clear_active(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM active_account WHERE id = ?1")
            .bind(ACTIVE_ROW_ID)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        debug!("cleared active account");
        Ok(())
    }
}
