use std::sync::Arc;
use tracing::info;

use drive_core::Catalog;
use drive_core::model::{Account, Lesson, LessonId};
use drive_core::rules::{self, QuizVerdict};
use storage::repository::{AccountRepository, ActiveAccountRepository};

use crate::error::ProgressError;
use crate::quiz::QuizAttempt;
use crate::session::Session;
use crate::simulation::SimulationRun;

/// The progress engine: scores finished quizzes, applies the promotion
/// rules, marks lessons complete, records simulation scores, and writes the
/// mutated account back through both storage tables.
///
/// Every mutation validates the lesson id against the catalog first, so a
/// completed set can only ever hold catalog ids.
pub struct ProgressService {
    catalog: Catalog,
    accounts: Arc<dyn AccountRepository>,
    active: Arc<dyn ActiveAccountRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        catalog: Catalog,
        accounts: Arc<dyn AccountRepository>,
        active: Arc<dyn ActiveAccountRepository>,
    ) -> Self {
        Self {
            catalog,
            accounts,
            active,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lesson(&self, id: LessonId) -> Result<&Lesson, ProgressError> {
        self.catalog.get(id).ok_or(ProgressError::UnknownLesson(id))
    }

    /// Starts a quiz attempt for a catalog lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownLesson` or `ProgressError::NotAQuiz`.
    pub fn start_quiz(&self, id: LessonId) -> Result<QuizAttempt, ProgressError> {
        let lesson = self.lesson(id)?;
        // QuizAttempt::new only fails on non-quiz lessons.
        QuizAttempt::new(lesson).map_err(|_| ProgressError::NotAQuiz(id))
    }

    /// Starts score intake for a simulation lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownLesson` or
    /// `ProgressError::NotASimulation`.
    pub fn start_simulation(&self, id: LessonId) -> Result<SimulationRun, ProgressError> {
        let lesson = self.lesson(id)?;
        if !lesson.is_simulation() {
            return Err(ProgressError::NotASimulation(id));
        }
        Ok(SimulationRun::new(id))
    }

    /// Marks a lesson complete unconditionally: theory lessons on any
    /// view-to-end action. Returns whether the lesson was newly completed;
    /// completing again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownLesson` for an id outside the catalog
    /// and `ProgressError::NotLoggedIn` on a draft session.
    pub async fn complete_lesson(
        &self,
        session: &mut Session,
        id: LessonId,
    ) -> Result<bool, ProgressError> {
        self.lesson(id)?;
        let session_id = session.id();
        let account = session.account_mut().ok_or(ProgressError::NotLoggedIn)?;

        let newly_completed = account.mark_lesson_complete(id);
        self.persist(account).await?;

        if newly_completed {
            info!(session = %session_id, lesson = %id, "lesson completed");
        }
        Ok(newly_completed)
    }

    /// Scores a finished attempt against the threshold rules. On a pass,
    /// marks the lesson complete and applies the level-promotion table; a
    /// fail leaves the account untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnfinishedAttempt` while questions remain,
    /// `ProgressError::NotLoggedIn` on a draft session, and catalog errors
    /// as in [`ProgressService::start_quiz`].
    pub async fn finish_quiz(
        &self,
        session: &mut Session,
        attempt: &QuizAttempt,
    ) -> Result<QuizVerdict, ProgressError> {
        let id = attempt.lesson_id();
        let lesson = self.lesson(id)?;
        if !lesson.is_quiz() {
            return Err(ProgressError::NotAQuiz(id));
        }
        if !attempt.is_finished() {
            return Err(ProgressError::UnfinishedAttempt);
        }

        let session_id = session.id();
        let account = session.account_mut().ok_or(ProgressError::NotLoggedIn)?;

        // The threshold is evaluated against the level held *before* any
        // promotion this pass may earn.
        let level = account.level();
        let verdict = rules::evaluate_quiz(id, level, attempt.score(), attempt.question_count());

        if verdict.passed {
            account.mark_lesson_complete(id);
            if let Some(promoted) = rules::promotion(id, level) {
                account.set_level(promoted);
            }
            self.persist(account).await?;
        }

        info!(
            session = %session_id,
            lesson = %id,
            score = verdict.score,
            required = verdict.passing_score,
            passed = verdict.passed,
            "quiz finished"
        );
        Ok(verdict)
    }

    /// Ends a simulation run: stores the last valid score (when one arrived)
    /// keyed by lesson id, and marks the lesson complete unconditionally;
    /// simulations have no pass threshold. Returns the stored score.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NotASimulation` if the run's lesson is not a
    /// simulation, plus the usual catalog and session errors.
    pub async fn end_simulation(
        &self,
        session: &mut Session,
        run: SimulationRun,
    ) -> Result<Option<f64>, ProgressError> {
        let id = run.lesson_id();
        let lesson = self.lesson(id)?;
        if !lesson.is_simulation() {
            return Err(ProgressError::NotASimulation(id));
        }

        let session_id = session.id();
        let account = session.account_mut().ok_or(ProgressError::NotLoggedIn)?;

        let score = run.into_score();
        if let Some(score) = score {
            account.record_simulation_score(id, score);
        }
        account.mark_lesson_complete(id);
        self.persist(account).await?;

        info!(session = %session_id, lesson = %id, score, "simulation ended");
        Ok(score)
    }

    /// Idempotent write-back after every mutation: the account directory and
    /// the active-session mirror.
    async fn persist(&self, account: &Account) -> Result<(), ProgressError> {
        self.accounts.upsert_account(account).await?;
        self.active.set_active(account).await?;
        Ok(())
    }
}
