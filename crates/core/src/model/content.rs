use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("theory lesson needs at least one section")]
    NoSections,

    #[error("theory section title and body cannot be empty")]
    EmptySection,

    #[error("quiz needs at least one question")]
    NoQuestions,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least two options")]
    TooFewOptions,

    #[error("correct index {correct} out of range for {options} options")]
    CorrectOutOfRange { correct: usize, options: usize },

    #[error("simulation scenario and instruction cannot be empty")]
    EmptySimulation,
}

//
// ─── THEORY ────────────────────────────────────────────────────────────────────
//

/// One titled block of reading material inside a theory lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheorySection {
    title: String,
    body: String,
}

impl TheorySection {
    /// Creates a section, rejecting empty titles or bodies.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptySection` if either field is blank.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, ContentError> {
        let title = title.into();
        let body = body.into();
        if title.trim().is_empty() || body.trim().is_empty() {
            return Err(ContentError::EmptySection);
        }
        Ok(Self { title, body })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. `correct` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

impl QuizQuestion {
    /// Creates a question, validating the prompt, option count, and answer index.
    ///
    /// # Errors
    ///
    /// Returns a `ContentError` describing the first violated rule.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Result<Self, ContentError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ContentError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(ContentError::TooFewOptions);
        }
        if correct >= options.len() {
            return Err(ContentError::CorrectOutOfRange {
                correct,
                options: options.len(),
            });
        }
        Ok(Self {
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct
    }
}

//
// ─── CONTENT VARIANTS ──────────────────────────────────────────────────────────
//

/// Lesson kind, derived from the content variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Theory,
    Quiz,
    Simulation,
}

impl LessonKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonKind::Theory => "theory",
            LessonKind::Quiz => "quiz",
            LessonKind::Simulation => "simulation",
        }
    }
}

/// Per-kind lesson payload.
///
/// The original data kept this as an untyped blob switched on a `type`
/// string; each variant here carries exactly the fields its kind needs, and
/// consumers match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LessonContent {
    Theory { sections: Vec<TheorySection> },
    Quiz { questions: Vec<QuizQuestion> },
    Simulation { scenario: String, instruction: String },
}

impl LessonContent {
    /// Builds theory content.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NoSections` for an empty section list.
    pub fn theory(sections: Vec<TheorySection>) -> Result<Self, ContentError> {
        if sections.is_empty() {
            return Err(ContentError::NoSections);
        }
        Ok(Self::Theory { sections })
    }

    /// Builds quiz content.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NoQuestions` for an empty list.
    pub fn quiz(questions: Vec<QuizQuestion>) -> Result<Self, ContentError> {
        if questions.is_empty() {
            return Err(ContentError::NoQuestions);
        }
        Ok(Self::Quiz { questions })
    }

    /// Builds simulation content.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptySimulation` if either field is blank.
    pub fn simulation(
        scenario: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let scenario = scenario.into();
        let instruction = instruction.into();
        if scenario.trim().is_empty() || instruction.trim().is_empty() {
            return Err(ContentError::EmptySimulation);
        }
        Ok(Self::Simulation {
            scenario,
            instruction,
        })
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        match self {
            LessonContent::Theory { .. } => LessonKind::Theory,
            LessonContent::Quiz { .. } => LessonKind::Quiz,
            LessonContent::Simulation { .. } => LessonKind::Simulation,
        }
    }

    /// The quiz questions, if this is quiz content.
    #[must_use]
    pub fn questions(&self) -> Option<&[QuizQuestion]> {
        match self {
            LessonContent::Quiz { questions } => Some(questions),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> Result<QuizQuestion, ContentError> {
        QuizQuestion::new("What shape is a stop sign?", vec!["Circle".into(), "Octagon".into()], correct)
    }

    #[test]
    fn question_rejects_out_of_range_answer() {
        let err = question(2).unwrap_err();
        assert!(matches!(err, ContentError::CorrectOutOfRange { .. }));
    }

    #[test]
    fn question_checks_answers() {
        let q = question(1).unwrap();
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn question_needs_two_options() {
        let err = QuizQuestion::new("Prompt", vec!["Only".into()], 0).unwrap_err();
        assert_eq!(err, ContentError::TooFewOptions);
    }

    #[test]
    fn theory_rejects_empty_sections() {
        assert_eq!(
            LessonContent::theory(Vec::new()).unwrap_err(),
            ContentError::NoSections
        );
        assert_eq!(
            TheorySection::new("Title", "  ").unwrap_err(),
            ContentError::EmptySection
        );
    }

    #[test]
    fn quiz_rejects_empty_question_list() {
        assert_eq!(
            LessonContent::quiz(Vec::new()).unwrap_err(),
            ContentError::NoQuestions
        );
    }

    #[test]
    fn kind_follows_variant() {
        let content = LessonContent::simulation("Four-way stop", "Click the car with right of way")
            .unwrap();
        assert_eq!(content.kind(), LessonKind::Simulation);
        assert!(content.questions().is_none());
    }
}
