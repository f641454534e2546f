use drive_core::model::{Lesson, LessonId, QuizQuestion};

use crate::error::QuizError;

//
// ─── PROGRESS VIEW ─────────────────────────────────────────────────────────────
//

/// Aggregated view of attempt progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub score: u32,
    pub is_finished: bool,
}

/// What happened when an option was submitted for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// False when the question already had an answer; the input was ignored.
    pub accepted: bool,
    pub correct: bool,
    /// Index of the correct option, for revealing the answer.
    pub correct_option: usize,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one run through a quiz lesson.
///
/// Steps through the questions sequentially. Each question takes exactly one
/// answer: the first selection is scored, anything after it is ignored, so a
/// question can never be double-scored. The attempt finishes after advancing
/// past the last question; scoring against the pass threshold is the
/// progress engine's job.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    lesson_id: LessonId,
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    score: u32,
    finished: bool,
}

impl QuizAttempt {
    /// Starts an attempt over a quiz lesson.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAQuiz` for theory or simulation lessons.
    pub fn new(lesson: &Lesson) -> Result<Self, QuizError> {
        let Some(questions) = lesson.content().questions() else {
            return Err(QuizError::NotAQuiz(lesson.id()));
        };

        Ok(Self {
            lesson_id: lesson.id(),
            questions: questions.to_vec(),
            current: 0,
            selected: None,
            score: 0,
            finished: false,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The question awaiting an answer, if the attempt is still running.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.finished {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// The option chosen for the current question, if one was chosen yet.
    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    /// Returns a summary of the attempt so far.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let answered = if self.finished {
            self.questions.len()
        } else {
            self.current + usize::from(self.selected.is_some())
        };
        QuizProgress {
            total: self.questions.len(),
            answered,
            score: self.score,
            is_finished: self.finished,
        }
    }

    /// Submits an option for the current question.
    ///
    /// The first selection is recorded and scored; once a question has an
    /// answer, further submissions are ignored and reported with
    /// `accepted: false`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` after the attempt is complete and
    /// `QuizError::OptionOutOfRange` for an option index past the choices.
    pub fn answer(&mut self, option: usize) -> Result<AnswerOutcome, QuizError> {
        let Some(question) = self.current_question() else {
            return Err(QuizError::Finished);
        };
        if option >= question.options().len() {
            return Err(QuizError::OptionOutOfRange {
                option,
                options: question.options().len(),
            });
        }

        let correct_option = question.correct();
        if let Some(first) = self.selected {
            return Ok(AnswerOutcome {
                accepted: false,
                correct: first == correct_option,
                correct_option,
            });
        }

        let correct = question.is_correct(option);
        self.selected = Some(option);
        if correct {
            self.score += 1;
        }

        Ok(AnswerOutcome {
            accepted: true,
            correct,
            correct_option,
        })
    }

    /// Moves to the next question, finishing the attempt after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` if already finished and
    /// `QuizError::Unanswered` if the current question has no answer yet.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if self.selected.is_none() {
            return Err(QuizError::Unanswered);
        }

        self.selected = None;
        self.current += 1;
        if self.current >= self.questions.len() {
            self.finished = true;
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use drive_core::model::{Level, LessonId};
    use drive_core::{Catalog, rules};

    fn beginner_quiz_attempt() -> QuizAttempt {
        let catalog = Catalog::builtin();
        let lesson = catalog.get(LessonId::new(3)).unwrap();
        QuizAttempt::new(lesson).unwrap()
    }

    fn answer_correctly(attempt: &mut QuizAttempt) {
        let correct = attempt.current_question().unwrap().correct();
        attempt.answer(correct).unwrap();
    }

    #[test]
    fn rejects_non_quiz_lessons() {
        let catalog = Catalog::builtin();
        let theory = catalog.get(LessonId::new(1)).unwrap();
        let err = QuizAttempt::new(theory).unwrap_err();
        assert_eq!(err, QuizError::NotAQuiz(LessonId::new(1)));
    }

    #[test]
    fn first_selection_wins() {
        let mut attempt = beginner_quiz_attempt();
        let correct = attempt.current_question().unwrap().correct();
        let wrong = (correct + 1) % attempt.current_question().unwrap().options().len();

        let first = attempt.answer(wrong).unwrap();
        assert!(first.accepted);
        assert!(!first.correct);
        assert_eq!(attempt.score(), 0);

        // The correct option arrives too late; the question stays scored as
        // answered-wrong.
        let second = attempt.answer(correct).unwrap();
        assert!(!second.accepted);
        assert_eq!(attempt.score(), 0);
        assert_eq!(attempt.selected_option(), Some(wrong));
    }

    #[test]
    fn repeated_correct_answers_score_once() {
        let mut attempt = beginner_quiz_attempt();
        let correct = attempt.current_question().unwrap().correct();

        attempt.answer(correct).unwrap();
        attempt.answer(correct).unwrap();
        attempt.answer(correct).unwrap();
        assert_eq!(attempt.score(), 1);
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut attempt = beginner_quiz_attempt();
        let options = attempt.current_question().unwrap().options().len();
        let err = attempt.answer(options).unwrap_err();
        assert_eq!(
            err,
            QuizError::OptionOutOfRange {
                option: options,
                options
            }
        );
    }

    #[test]
    fn cannot_advance_without_an_answer() {
        let mut attempt = beginner_quiz_attempt();
        assert_eq!(attempt.advance().unwrap_err(), QuizError::Unanswered);
    }

    #[test]
    fn attempt_walks_to_completion() {
        let mut attempt = beginner_quiz_attempt();
        let total = attempt.question_count();

        for _ in 0..total {
            answer_correctly(&mut attempt);
            attempt.advance().unwrap();
        }

        assert!(attempt.is_finished());
        assert_eq!(attempt.score(), u32::try_from(total).unwrap());
        assert!(attempt.current_question().is_none());
        assert_eq!(attempt.answer(0).unwrap_err(), QuizError::Finished);
        assert_eq!(attempt.advance().unwrap_err(), QuizError::Finished);
    }

    #[test]
    fn progress_tracks_answers() {
        let mut attempt = beginner_quiz_attempt();
        assert_eq!(
            attempt.progress(),
            QuizProgress {
                total: 3,
                answered: 0,
                score: 0,
                is_finished: false
            }
        );

        answer_correctly(&mut attempt);
        assert_eq!(attempt.progress().answered, 1);

        attempt.advance().unwrap();
        assert_eq!(attempt.progress().answered, 1);
    }

    #[test]
    fn perfect_run_meets_the_default_threshold() {
        let mut attempt = beginner_quiz_attempt();
        while !attempt.is_finished() {
            answer_correctly(&mut attempt);
            attempt.advance().unwrap();
        }

        let verdict = rules::evaluate_quiz(
            attempt.lesson_id(),
            Level::Beginner,
            attempt.score(),
            attempt.question_count(),
        );
        assert!(verdict.passed);
        assert_eq!(verdict.passing_score, 3);
    }
}
