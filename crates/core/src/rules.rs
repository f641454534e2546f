use crate::model::{Level, LessonId};

//
// ─── RULE TABLES ───────────────────────────────────────────────────────────────
//

/// The certification exam. Passing it promotes straight to the top tier, and
/// it carries its own pass threshold for Intermediate learners.
pub const CERTIFICATION_EXAM: LessonId = LessonId::new(8);

/// Fixed pass-threshold override for a (lesson, learner level) pair.
///
/// This is deliberately a lookup table rather than a formula tweak: the
/// course authors pin thresholds per lesson, and the formula below is only
/// the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PassOverride {
    lesson: LessonId,
    level: Level,
    required: u32,
}

const PASS_OVERRIDES: &[PassOverride] = &[PassOverride {
    lesson: CERTIFICATION_EXAM,
    level: Level::Intermediate,
    required: 30,
}];

/// Returns the score needed to pass a quiz.
///
/// Consults the override table first; otherwise three quarters of the
/// question count, rounded up.
#[must_use]
pub fn passing_score(lesson: LessonId, level: Level, question_count: usize) -> u32 {
    if let Some(rule) = PASS_OVERRIDES
        .iter()
        .find(|rule| rule.lesson == lesson && rule.level == level)
    {
        return rule.required;
    }

    let required = (question_count * 3).div_ceil(4);
    u32::try_from(required).unwrap_or(u32::MAX)
}

/// Level change earned by passing a quiz, if any.
///
/// Exactly two rules exist:
/// 1. passing the certification exam promotes to `Expert`, whatever the
///    current level (a no-op when already there);
/// 2. passing any other quiz while at `Beginner` promotes to `Intermediate`.
///
/// Every other lesson/level combination leaves the level untouched.
#[must_use]
pub fn promotion(lesson: LessonId, level: Level) -> Option<Level> {
    if lesson == CERTIFICATION_EXAM {
        return Some(Level::Expert);
    }
    if level == Level::Beginner {
        return Some(Level::Intermediate);
    }
    None
}

//
// ─── VERDICT ───────────────────────────────────────────────────────────────────
//

/// Outcome of a finished quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizVerdict {
    pub score: u32,
    pub question_count: u32,
    pub passing_score: u32,
    pub passed: bool,
}

/// Scores a finished attempt against the threshold rules.
#[must_use]
pub fn evaluate_quiz(
    lesson: LessonId,
    level: Level,
    score: u32,
    question_count: usize,
) -> QuizVerdict {
    let required = passing_score(lesson, level, question_count);
    QuizVerdict {
        score,
        question_count: u32::try_from(question_count).unwrap_or(u32::MAX),
        passing_score: required,
        passed: score >= required,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
