use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use drive_core::model::{Account, AccountError, Level, LessonId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for an account.
///
/// Mirrors the domain `Account` so repositories can serialize/deserialize
/// without leaking storage concerns into the domain layer. The progress
/// fields round-trip through JSON columns in the SQLite backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub username: String,
    pub password: String,
    pub level: Level,
    pub completed_lessons: BTreeSet<LessonId>,
    pub simulation_scores: BTreeMap<LessonId, f64>,
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self {
            username: account.username().to_owned(),
            password: account.password().to_owned(),
            level: account.level(),
            completed_lessons: account.completed_lessons().clone(),
            simulation_scores: account.simulation_scores().clone(),
            created_at: account.created_at(),
        }
    }

    /// Convert the record back into a domain `Account`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` if the stored username or password no longer
    /// passes domain validation.
    pub fn into_account(self) -> Result<Account, AccountError> {
        Account::from_persisted(
            self.username,
            self.password,
            self.level,
            self.completed_lessons,
            self.simulation_scores,
            self.created_at,
        )
    }
}

/// Repository contract for the account directory ("all accounts").
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a brand-new account, enforcing username uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the username is already taken.
    async fn insert_new_account(&self, account: &Account) -> Result<(), StorageError>;

    /// Persist or update an account. Idempotent upsert, called after every
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the account cannot be stored.
    async fn upsert_account(&self, account: &Account) -> Result<(), StorageError>;

    /// Fetch an account by username.
    ///
    /// # Errors
    ///
    /// Returns storage errors; a missing username is `Ok(None)`.
    async fn get_account(&self, username: &str) -> Result<Option<Account>, StorageError>;

    /// List accounts ordered by username.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_accounts(&self, limit: u32) -> Result<Vec<Account>, StorageError>;
}

/// Repository contract for the single "active account" record.
///
/// At most one record exists; it mirrors the full account so a restarted
/// process can resume the session without consulting the directory.
#[async_trait]
pub trait ActiveAccountRepository: Send + Sync {
    /// Replace the active record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn set_active(&self, account: &Account) -> Result<(), StorageError>;

    /// Fetch the active record, if any.
    ///
    /// # Errors
    ///
    /// Returns storage errors; an absent record is `Ok(None)`.
    async fn get_active(&self) -> Result<Option<Account>, StorageError>;

    /// Remove the active record. Clearing an already-empty table is fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_active(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    active: Arc<Mutex<Option<Account>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn insert_new_account(&self, account: &Account) -> Result<(), StorageError> {
        let mut guard = self
            .accounts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(account.username()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(account.username().to_owned(), account.clone());
        Ok(())
    }

    async fn upsert_account(&self, account: &Account) -> Result<(), StorageError> {
        let mut guard = self
            .accounts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(account.username().to_owned(), account.clone());
        Ok(())
    }

    async fn get_account(&self, username: &str) -> Result<Option<Account>, StorageError> {
        let guard = self
            .accounts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(username).cloned())
    }

    async fn list_accounts(&self, limit: u32) -> Result<Vec<Account>, StorageError> {
        let guard = self
            .accounts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut accounts: Vec<Account> = guard.values().cloned().collect();
        accounts.sort_by(|a, b| a.username().cmp(b.username()));
        accounts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(accounts)
    }
}

#[async_trait]
impl ActiveAccountRepository for InMemoryRepository {
    async fn set_active(&self, account: &Account) -> Result<(), StorageError> {
        let mut guard = self
            .active
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(account.clone());
        Ok(())
    }

    async fn get_active(&self) -> Result<Option<Account>, StorageError> {
        let guard = self
            .active
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn clear_active(&self) -> Result<(), StorageError> {
        let mut guard = self
            .active
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates the two repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub accounts: Arc<dyn AccountRepository>,
    pub active: Arc<dyn ActiveAccountRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo.clone());
        let active: Arc<dyn ActiveAccountRepository> = Arc::new(repo);
        Self { accounts, active }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_core::time::fixed_now;

    fn build_account(username: &str) -> Account {
        Account::new(username, "secret", Level::Beginner, fixed_now()).unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_username() {
        let repo = InMemoryRepository::new();
        repo.insert_new_account(&build_account("ashaan")).await.unwrap();

        let err = repo
            .insert_new_account(&build_account("ashaan"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn upsert_round_trips_progress() {
        let repo = InMemoryRepository::new();
        let mut account = build_account("ashaan");
        account.mark_lesson_complete(LessonId::new(1));
        account.record_simulation_score(LessonId::new(2), 85.0);

        repo.upsert_account(&account).await.unwrap();

        let fetched = repo.get_account("ashaan").await.unwrap().unwrap();
        assert!(fetched.has_completed(LessonId::new(1)));
        assert_eq!(fetched.simulation_score(LessonId::new(2)), Some(85.0));
    }

    #[tokio::test]
    async fn active_record_lifecycle() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_active().await.unwrap().is_none());

        let account = build_account("ashaan");
        repo.set_active(&account).await.unwrap();
        assert_eq!(
            repo.get_active().await.unwrap().map(|a| a.username().to_owned()),
            Some("ashaan".to_owned())
        );

        repo.clear_active().await.unwrap();
        assert!(repo.get_active().await.unwrap().is_none());
        // clearing again is a no-op
        repo.clear_active().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_ordered_and_limited() {
        let repo = InMemoryRepository::new();
        for name in ["carol", "alice", "bob"] {
            repo.insert_new_account(&build_account(name)).await.unwrap();
        }

        let listed = repo.list_accounts(2).await.unwrap();
        let names: Vec<&str> = listed.iter().map(Account::username).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn record_round_trip_preserves_account() {
        let mut account = build_account("ashaan");
        account.set_level(Level::Intermediate);
        account.mark_lesson_complete(LessonId::new(3));

        let record = AccountRecord::from_account(&account);
        let restored = record.into_account().unwrap();
        assert_eq!(restored, account);
    }
}
