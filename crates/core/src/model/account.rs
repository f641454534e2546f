use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::ids::LessonId;
use crate::model::level::Level;

/// Passwords shorter than this are rejected at sign-up.
pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Persisted identity plus progress record.
///
/// Created at sign-up with empty progress, mutated as lessons complete and
/// levels change, never deleted. Passwords are held as exact strings; login
/// is an exact-string comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    username: String,
    password: String,
    level: Level,
    completed_lessons: BTreeSet<LessonId>,
    simulation_scores: BTreeMap<LessonId, f64>,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a fresh account with no progress.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::EmptyUsername` for a blank username and
    /// `AccountError::PasswordTooShort` for a password under
    /// [`MIN_PASSWORD_LEN`] characters.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        level: Level,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AccountError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        let password = password.into();
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort);
        }

        Ok(Self {
            username: username.trim().to_owned(),
            password,
            level,
            completed_lessons: BTreeSet::new(),
            simulation_scores: BTreeMap::new(),
            created_at,
        })
    }

    /// Rehydrates an account from persisted storage, progress included.
    ///
    /// # Errors
    ///
    /// Same validation as [`Account::new`]; stored records that fail it are
    /// surfaced as storage-layer serialization errors.
    pub fn from_persisted(
        username: impl Into<String>,
        password: impl Into<String>,
        level: Level,
        completed_lessons: BTreeSet<LessonId>,
        simulation_scores: BTreeMap<LessonId, f64>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AccountError> {
        let mut account = Self::new(username, password, level, created_at)?;
        account.completed_lessons = completed_lessons;
        account.simulation_scores = simulation_scores;
        Ok(account)
    }

    // Accessors
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn simulation_scores(&self) -> &BTreeMap<LessonId, f64> {
        &self.simulation_scores
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Exact-string credential check.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    #[must_use]
    pub fn has_completed(&self, lesson: LessonId) -> bool {
        self.completed_lessons.contains(&lesson)
    }

    #[must_use]
    pub fn simulation_score(&self, lesson: LessonId) -> Option<f64> {
        self.simulation_scores.get(&lesson).copied()
    }

    // Mutations

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Adds a lesson to the completed set. Returns `false` when the lesson
    /// was already complete; completing twice never changes the set.
    pub fn mark_lesson_complete(&mut self, lesson: LessonId) -> bool {
        self.completed_lessons.insert(lesson)
    }

    /// Records (or replaces) the simulation score for a lesson.
    pub fn record_simulation_score(&mut self, lesson: LessonId, score: f64) {
        self.simulation_scores.insert(lesson, score);
    }
}
