use drive_core::Catalog;
use drive_core::model::{Level, LessonId};
use drive_core::rules::CERTIFICATION_EXAM;
use drive_core::time::fixed_clock;
use services::{AccountService, ProgressError, ProgressService, QuizAttempt, Session};
use storage::repository::Storage;

fn services(storage: &Storage) -> (AccountService, ProgressService) {
    let accounts = AccountService::new(
        fixed_clock(),
        storage.accounts.clone(),
        storage.active.clone(),
    );
    let progress = ProgressService::new(
        Catalog::builtin(),
        storage.accounts.clone(),
        storage.active.clone(),
    );
    (accounts, progress)
}

async fn signed_up(accounts: &AccountService, level: Level) -> Session {
    accounts.sign_up("ashaan", "secret", level).await.unwrap()
}

/// Walks a whole attempt, answering `correct` questions right and the rest
/// wrong.
fn run_quiz(progress: &ProgressService, id: LessonId, correct: usize) -> QuizAttempt {
    let mut attempt = progress.start_quiz(id).unwrap();
    let mut remaining = correct;
    while let Some(question) = attempt.current_question() {
        let right = question.correct();
        let option = if remaining > 0 {
            remaining -= 1;
            right
        } else {
            (right + 1) % question.options().len()
        };
        attempt.answer(option).unwrap();
        attempt.advance().unwrap();
    }
    attempt
}

#[tokio::test]
async fn theory_completion_is_idempotent_and_persisted() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Beginner).await;

    assert!(progress
        .complete_lesson(&mut session, LessonId::new(1))
        .await
        .unwrap());
    assert!(!progress
        .complete_lesson(&mut session, LessonId::new(1))
        .await
        .unwrap());
    assert_eq!(session.completed_lessons().len(), 1);

    // Both tables saw the write.
    let stored = storage.accounts.get_account("ashaan").await.unwrap().unwrap();
    assert!(stored.has_completed(LessonId::new(1)));
    let active = storage.active.get_active().await.unwrap().unwrap();
    assert!(active.has_completed(LessonId::new(1)));
}

#[tokio::test]
async fn completed_ids_always_come_from_the_catalog() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Beginner).await;

    let err = progress
        .complete_lesson(&mut session, LessonId::new(99))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::UnknownLesson(_)));
    assert!(session.completed_lessons().is_empty());

    let catalog = Catalog::builtin();
    progress
        .complete_lesson(&mut session, LessonId::new(4))
        .await
        .unwrap();
    for id in session.completed_lessons() {
        assert!(catalog.contains(*id));
    }
}

#[tokio::test]
async fn draft_sessions_cannot_record_progress() {
    let storage = Storage::in_memory();
    let (_, progress) = services(&storage);
    let mut draft = Session::draft();

    let err = progress
        .complete_lesson(&mut draft, LessonId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::NotLoggedIn));
}

#[tokio::test]
async fn failed_quiz_leaves_the_account_untouched() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Beginner).await;

    // 2 of 3 is one short of the ceil(0.75 * 3) = 3 threshold.
    let attempt = run_quiz(&progress, LessonId::new(3), 2);
    let verdict = progress.finish_quiz(&mut session, &attempt).await.unwrap();

    assert!(!verdict.passed);
    assert_eq!(verdict.passing_score, 3);
    assert!(session.completed_lessons().is_empty());
    assert_eq!(session.level(), Level::Beginner);
}

#[tokio::test]
async fn passing_a_quiz_at_beginner_promotes_once() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Beginner).await;

    let attempt = run_quiz(&progress, LessonId::new(3), 3);
    let verdict = progress.finish_quiz(&mut session, &attempt).await.unwrap();
    assert!(verdict.passed);
    assert!(session.completed_lessons().contains(&LessonId::new(3)));
    assert_eq!(session.level(), Level::Intermediate);

    // Passing again neither regresses nor re-promotes, and the completed set
    // is unchanged.
    let attempt = run_quiz(&progress, LessonId::new(3), 3);
    let verdict = progress.finish_quiz(&mut session, &attempt).await.unwrap();
    assert!(verdict.passed);
    assert_eq!(session.level(), Level::Intermediate);
    assert_eq!(session.completed_lessons().len(), 1);

    let stored = storage.accounts.get_account("ashaan").await.unwrap().unwrap();
    assert_eq!(stored.level(), Level::Intermediate);
}

#[tokio::test]
async fn certification_exam_uses_the_fixed_threshold_for_intermediates() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Intermediate).await;

    // 29 of 40 sits below the fixed threshold of 30.
    let attempt = run_quiz(&progress, CERTIFICATION_EXAM, 29);
    let verdict = progress.finish_quiz(&mut session, &attempt).await.unwrap();
    assert!(!verdict.passed);
    assert_eq!(verdict.passing_score, 30);
    assert_eq!(session.level(), Level::Intermediate);

    // Exactly 30 passes and promotes straight to the top tier.
    let attempt = run_quiz(&progress, CERTIFICATION_EXAM, 30);
    let verdict = progress.finish_quiz(&mut session, &attempt).await.unwrap();
    assert!(verdict.passed);
    assert_eq!(session.level(), Level::Expert);
    assert!(session.completed_lessons().contains(&CERTIFICATION_EXAM));
}

#[tokio::test]
async fn certification_exam_promotion_is_idempotent_at_the_top() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Expert).await;

    let attempt = run_quiz(&progress, CERTIFICATION_EXAM, 40);
    let verdict = progress.finish_quiz(&mut session, &attempt).await.unwrap();
    assert!(verdict.passed);
    assert_eq!(session.level(), Level::Expert);
}

#[tokio::test]
async fn unfinished_attempts_are_rejected() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Beginner).await;

    let mut attempt = progress.start_quiz(LessonId::new(3)).unwrap();
    attempt.answer(0).unwrap();

    let err = progress.finish_quiz(&mut session, &attempt).await.unwrap_err();
    assert!(matches!(err, ProgressError::UnfinishedAttempt));
}

#[tokio::test]
async fn quiz_operations_reject_non_quiz_lessons() {
    let storage = Storage::in_memory();
    let (_, progress) = services(&storage);

    assert!(matches!(
        progress.start_quiz(LessonId::new(1)).unwrap_err(),
        ProgressError::NotAQuiz(_)
    ));
    assert!(matches!(
        progress.start_simulation(LessonId::new(3)).unwrap_err(),
        ProgressError::NotASimulation(_)
    ));
}

#[tokio::test]
async fn simulation_stores_last_valid_score_and_completes() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Intermediate).await;

    let mut run = progress.start_simulation(LessonId::new(5)).unwrap();
    run.observe(r#"{"type": "SIMULATION_SCORE", "score": 40}"#);
    run.observe(r#"{"type": "SIMULATION_SCORE", "score": "NaN"}"#);
    run.observe(r#"{"type": "SIMULATION_SCORE", "score": 88}"#);
    run.observe(r#"{"type": "OTHER", "score": 12}"#);

    let score = progress.end_simulation(&mut session, run).await.unwrap();
    assert_eq!(score, Some(88.0));
    assert!(session.completed_lessons().contains(&LessonId::new(5)));
    assert_eq!(session.simulation_scores().get(&LessonId::new(5)), Some(&88.0));

    let stored = storage.accounts.get_account("ashaan").await.unwrap().unwrap();
    assert_eq!(stored.simulation_score(LessonId::new(5)), Some(88.0));
}

#[tokio::test]
async fn simulation_without_a_score_still_completes() {
    let storage = Storage::in_memory();
    let (accounts, progress) = services(&storage);
    let mut session = signed_up(&accounts, Level::Beginner).await;

    let run = progress.start_simulation(LessonId::new(2)).unwrap();
    let score = progress.end_simulation(&mut session, run).await.unwrap();

    assert_eq!(score, None);
    assert!(session.completed_lessons().contains(&LessonId::new(2)));
    assert!(session.simulation_scores().is_empty());
}
