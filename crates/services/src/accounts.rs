use std::sync::Arc;
use tracing::info;

use drive_core::Clock;
use drive_core::model::{Account, Level};
use storage::repository::{AccountRepository, ActiveAccountRepository, StorageError};

use crate::error::AuthError;
use crate::session::Session;

/// Sign-up, login, logout, and session resumption over the account store.
///
/// Uniqueness is enforced at insertion; credentials are compared as exact
/// strings.
pub struct AccountService {
    clock: Clock,
    accounts: Arc<dyn AccountRepository>,
    active: Arc<dyn ActiveAccountRepository>,
}

impl AccountService {
    #[must_use]
    pub fn new(
        clock: Clock,
        accounts: Arc<dyn AccountRepository>,
        active: Arc<dyn ActiveAccountRepository>,
    ) -> Self {
        Self {
            clock,
            accounts,
            active,
        }
    }

    /// Creates an account with empty progress and activates it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateUsername` if the username is taken,
    /// `AuthError::InvalidAccount` for a blank username or short password,
    /// and storage errors otherwise.
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        level: Level,
    ) -> Result<Session, AuthError> {
        let account = Account::new(username, password, level, self.clock.now())?;

        self.accounts
            .insert_new_account(&account)
            .await
            .map_err(|err| match err {
                StorageError::Conflict => AuthError::DuplicateUsername,
                other => AuthError::Storage(other),
            })?;
        self.active.set_active(&account).await?;

        let session = Session::for_account(account);
        info!(
            session = %session.id(),
            username = session.name(),
            level = %level,
            "account created"
        );
        Ok(session)
    }

    /// Activates a stored account after an exact credential check.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` for an unknown username and
    /// `AuthError::WrongPassword` on mismatch.
    pub async fn log_in(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let Some(account) = self.accounts.get_account(username).await? else {
            return Err(AuthError::NotFound);
        };
        if !account.password_matches(password) {
            return Err(AuthError::WrongPassword);
        }

        self.active.set_active(&account).await?;

        let session = Session::for_account(account);
        info!(session = %session.id(), username = session.name(), "logged in");
        Ok(session)
    }

    /// Ends the session. The account record itself survives; only the
    /// active-session record is cleared.
    ///
    /// # Errors
    ///
    /// Returns storage errors from clearing the active record.
    pub async fn log_out(&self, session: Session) -> Result<(), AuthError> {
        if session.is_active() {
            self.active.clear_active().await?;
            info!(session = %session.id(), username = session.name(), "logged out");
        }
        Ok(())
    }

    /// Rehydrates the session persisted by a previous run, if any.
    ///
    /// # Errors
    ///
    /// Returns storage errors from reading the active record.
    pub async fn resume(&self) -> Result<Option<Session>, AuthError> {
        let Some(account) = self.active.get_active().await? else {
            return Ok(None);
        };
        let session = Session::for_account(account);
        info!(session = %session.id(), username = session.name(), "session resumed");
        Ok(Some(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_core::time::fixed_clock;
    use storage::repository::Storage;

    fn service() -> AccountService {
        let storage = Storage::in_memory();
        AccountService::new(fixed_clock(), storage.accounts, storage.active)
    }

    #[tokio::test]
    async fn sign_up_creates_active_session() {
        let service = service();
        let session = service
            .sign_up("ashaan", "secret", Level::Beginner)
            .await
            .unwrap();
        assert!(session.is_active());
        assert_eq!(session.name(), "ashaan");
        assert!(session.completed_lessons().is_empty());
    }

    #[tokio::test]
    async fn sign_up_rejects_short_password() {
        let service = service();
        let err = service.sign_up("ashaan", "abc", Level::Beginner).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAccount(_)));
    }

    #[tokio::test]
    async fn login_unknown_username_is_not_found() {
        let service = service();
        let err = service.log_in("nobody", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn login_wrong_password_is_rejected() {
        let service = service();
        service.sign_up("ashaan", "secret", Level::Beginner).await.unwrap();
        let err = service.log_in("ashaan", "Secret").await.unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));
    }
}
