//! Shared error types for the services crate.

use thiserror::Error;

use drive_core::model::{AccountError, LessonId};
use storage::repository::StorageError;

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("couldn't find an account with this username")]
    NotFound,

    #[error("incorrect password")]
    WrongPassword,

    #[error("an account with this username already exists")]
    DuplicateUsername,

    #[error(transparent)]
    InvalidAccount(#[from] AccountError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz attempt state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("lesson {0} is not a quiz")]
    NotAQuiz(LessonId),

    #[error("attempt is already finished")]
    Finished,

    #[error("no answer selected for the current question")]
    Unanswered,

    #[error("option {option} out of range for {options} options")]
    OptionOutOfRange { option: usize, options: usize },
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("no account is logged in")]
    NotLoggedIn,

    #[error("unknown lesson: {0}")]
    UnknownLesson(LessonId),

    #[error("lesson {0} is not a quiz")]
    NotAQuiz(LessonId),

    #[error("lesson {0} is not a simulation")]
    NotASimulation(LessonId),

    #[error("quiz attempt is not finished")]
    UnfinishedAttempt,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
