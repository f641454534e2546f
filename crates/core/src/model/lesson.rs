use thiserror::Error;

use crate::model::content::{LessonContent, LessonKind};
use crate::model::ids::LessonId;
use crate::model::level::Level;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson duration cannot be empty")]
    EmptyDuration,
}

/// A unit of course content: reading material, a quiz, or a simulation.
///
/// Lessons are defined at build time and never change at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: String,
    level: Level,
    duration: String,
    content: LessonContent,
}

impl Lesson {
    /// Creates a new Lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` or `LessonError::EmptyDuration` if
    /// either field is blank.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        description: impl Into<String>,
        level: Level,
        duration: impl Into<String>,
        content: LessonContent,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        let duration = duration.into();
        if duration.trim().is_empty() {
            return Err(LessonError::EmptyDuration);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description: description.into(),
            level,
            duration,
            content,
        })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Free-form duration label, e.g. "5 min".
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        self.content.kind()
    }

    #[must_use]
    pub fn is_quiz(&self) -> bool {
        self.kind() == LessonKind::Quiz
    }

    #[must_use]
    pub fn is_simulation(&self) -> bool {
        self.kind() == LessonKind::Simulation
    }

    /// Number of questions for quiz lessons, 0 otherwise.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.content.questions().map_or(0, <[_]>::len)
    }
}
