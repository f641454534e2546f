//! The built-in lesson catalog.
//!
//! Lessons are authored here at build time; nothing creates or destroys them
//! at runtime. Lookup is a linear scan, which is plenty for a catalog this
//! size.

use thiserror::Error;

use crate::model::{
    ContentError, Lesson, LessonContent, LessonError, LessonId, LessonKind, Level, QuizQuestion,
    TheorySection,
};
use crate::rules::CERTIFICATION_EXAM;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate lesson id: {0}")]
    DuplicateLessonId(LessonId),

    #[error(transparent)]
    Lesson(#[from] LessonError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Read-only collection of all lessons the course offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    lessons: Vec<Lesson>,
}

impl Catalog {
    /// Builds a catalog, enforcing id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateLessonId` if two lessons share an id.
    pub fn new(lessons: Vec<Lesson>) -> Result<Self, CatalogError> {
        for (i, lesson) in lessons.iter().enumerate() {
            if lessons[..i].iter().any(|other| other.id() == lesson.id()) {
                return Err(CatalogError::DuplicateLessonId(lesson.id()));
            }
        }
        Ok(Self { lessons })
    }

    /// The standard course catalog.
    ///
    /// # Panics
    ///
    /// Panics if the built-in lesson data is invalid, which would be a bug in
    /// this module, caught by `builtin_catalog_is_valid` below.
    #[must_use]
    pub fn builtin() -> Self {
        Self::try_builtin().expect("built-in catalog data should be valid")
    }

    fn try_builtin() -> Result<Self, CatalogError> {
        Self::new(vec![
            road_signs_basics()?,
            intersection_safety()?,
            beginner_quiz()?,
            defensive_driving()?,
            hazard_perception()?,
            night_driving()?,
            complex_roundabouts()?,
            certification_exam()?,
        ])
    }

    #[must_use]
    pub fn get(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: LessonId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn by_level(&self, level: Level) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|lesson| lesson.level() == level)
            .collect()
    }

    #[must_use]
    pub fn by_kind(&self, kind: LessonKind) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|lesson| lesson.kind() == kind)
            .collect()
    }

    /// Lessons surfaced first for a learner: everything at their level, plus
    /// every quiz regardless of level.
    #[must_use]
    pub fn recommended_for(&self, level: Level) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|lesson| lesson.level() == level || lesson.is_quiz())
            .collect()
    }

    /// The complement of [`Catalog::recommended_for`].
    #[must_use]
    pub fn others_for(&self, level: Level) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|lesson| lesson.level() != level && !lesson.is_quiz())
            .collect()
    }
}

//
// ─── BUILT-IN LESSONS ──────────────────────────────────────────────────────────
//

fn section(title: &str, body: &str) -> Result<TheorySection, ContentError> {
    TheorySection::new(title, body)
}

fn question(prompt: &str, options: [&str; 4], correct: usize) -> Result<QuizQuestion, ContentError> {
    QuizQuestion::new(
        prompt,
        options.into_iter().map(str::to_owned).collect(),
        correct,
    )
}

fn road_signs_basics() -> Result<Lesson, CatalogError> {
    let content = LessonContent::theory(vec![
        section(
            "Stop Signs",
            "A red octagon with white text. You must come to a complete stop behind the limit \
             line, crosswalk, or corner. Check for pedestrians and other vehicles before \
             proceeding.",
        )?,
        section(
            "Yield Signs",
            "A red and white inverted triangle. You must slow down and be ready to stop if \
             necessary to let other vehicles or pedestrians pass.",
        )?,
        section(
            "Speed Limit Signs",
            "Rectangular white signs with black text indicating the maximum legal speed under \
             ideal conditions. You must adjust your speed for weather, traffic, and road \
             conditions.",
        )?,
    ])?;

    Ok(Lesson::new(
        LessonId::new(1),
        "Road Signs Basics",
        "Learn the meaning of common road signs and markings.",
        Level::Beginner,
        "5 min",
        content,
    )?)
}

fn intersection_safety() -> Result<Lesson, CatalogError> {
    let content = LessonContent::simulation(
        "Four-way stop",
        "Click the car that has the right of way. Remember: First to stop, first to go. If \
         simultaneous, yield to the right.",
    )?;

    Ok(Lesson::new(
        LessonId::new(2),
        "Intersection Safety",
        "Master the rules of right-of-way at different intersections.",
        Level::Beginner,
        "10 min",
        content,
    )?)
}

fn beginner_quiz() -> Result<Lesson, CatalogError> {
    let content = LessonContent::quiz(vec![
        question(
            "What shape is a stop sign?",
            ["Circle", "Octagon", "Triangle", "Square"],
            1,
        )?,
        question(
            "What does a flashing yellow light mean?",
            ["Stop completely", "Proceed with caution", "Speed up", "Turn right only"],
            1,
        )?,
        question(
            "When can you turn right on red?",
            [
                "Never",
                "Always",
                "After stopping and checking for safety, unless prohibited",
                "Only when a green arrow is present",
            ],
            2,
        )?,
    ])?;

    Ok(Lesson::new(
        LessonId::new(3),
        "Beginner Quiz",
        "Test your knowledge on signs and basic rules.",
        Level::Beginner,
        "5 min",
        content,
    )?)
}

fn defensive_driving() -> Result<Lesson, CatalogError> {
    let content = LessonContent::theory(vec![
        section(
            "Scan the Road",
            "Always look 12-15 seconds ahead. Don't just stare at the car in front of you.",
        )?,
        section(
            "Space Cushion",
            "Keep a safe following distance. Use the 3-second rule (increase to 4-5 seconds in \
             bad weather).",
        )?,
    ])?;

    Ok(Lesson::new(
        LessonId::new(4),
        "Defensive Driving",
        "Learn to anticipate potential hazards before they happen.",
        Level::Intermediate,
        "15 min",
        content,
    )?)
}

fn hazard_perception() -> Result<Lesson, CatalogError> {
    let content = LessonContent::simulation(
        "Urban driving",
        "Click on hazards (pedestrians, opening doors, turning cars) as they appear.",
    )?;

    Ok(Lesson::new(
        LessonId::new(5),
        "Hazard Perception",
        "Identify potential hazards in real-time scenarios.",
        Level::Intermediate,
        "10 min",
        content,
    )?)
}

fn night_driving() -> Result<Lesson, CatalogError> {
    let content = LessonContent::theory(vec![
        section(
            "Use High Beams Wisely",
            "Use high beams on open roads but dim them when within 500 feet of an oncoming \
             vehicle or 300 feet behind another vehicle.",
        )?,
        section(
            "Reduce Speed",
            "Visibility is reduced at night. Drive at a speed that allows you to stop within \
             the distance lighted by your headlights.",
        )?,
    ])?;

    Ok(Lesson::new(
        LessonId::new(6),
        "Night Driving",
        "Special considerations for driving in low light conditions.",
        Level::Advanced,
        "12 min",
        content,
    )?)
}

fn complex_roundabouts() -> Result<Lesson, CatalogError> {
    let content = LessonContent::simulation(
        "Multi-lane roundabout",
        "Choose the correct lane for your exit and signal appropriately.",
    )?;

    Ok(Lesson::new(
        LessonId::new(7),
        "Complex Roundabouts",
        "Navigate multi-lane roundabouts with confidence.",
        Level::Advanced,
        "15 min",
        content,
    )?)
}

#[allow(clippy::too_many_lines)]
fn certification_exam() -> Result<Lesson, CatalogError> {
    let content = LessonContent::quiz(vec![
        question(
            "What shape is a stop sign?",
            ["Circle", "Octagon", "Triangle", "Square"],
            1,
        )?,
        question(
            "A solid yellow line on your side of the road means:",
            ["Passing is allowed", "No passing", "The lane ends ahead", "Shoulder parking only"],
            1,
        )?,
        question(
            "Two vehicles arrive at a four-way stop at the same time. Who goes first?",
            [
                "The faster vehicle",
                "The vehicle on the left",
                "The vehicle on the right",
                "Whoever signals first",
            ],
            2,
        )?,
        question(
            "The three-second rule helps you maintain:",
            ["Speed", "Following distance", "Lane position", "Fuel economy"],
            1,
        )?,
        question(
            "A flashing red traffic light means:",
            [
                "Slow down and continue",
                "Stop, then proceed when safe",
                "The signal is broken; ignore it",
                "Yield only to trucks",
            ],
            1,
        )?,
        question(
            "When should you use your high beams?",
            [
                "In fog",
                "On open roads with no oncoming traffic",
                "In heavy city traffic",
                "When following another car closely",
            ],
            1,
        )?,
        question(
            "Hydroplaning is most likely when:",
            [
                "Driving uphill",
                "The road is dry",
                "Driving too fast on a wet road",
                "Braking gently",
            ],
            2,
        )?,
        question(
            "Before changing lanes you should:",
            [
                "Sound your horn",
                "Signal, check mirrors, and check your blind spot",
                "Speed up first",
                "Flash your headlights",
            ],
            1,
        )?,
        question(
            "A pedestrian carrying a white cane is:",
            [
                "Jaywalking",
                "A construction worker",
                "Blind or visually impaired; you must yield",
                "A crossing guard",
            ],
            2,
        )?,
        question(
            "The posted speed limit is:",
            [
                "A target to maintain at all times",
                "The maximum legal speed under ideal conditions",
                "A minimum speed",
                "Advisory only",
            ],
            1,
        )?,
        question(
            "An emergency vehicle approaches with sirens on. You should:",
            [
                "Speed up to clear the area",
                "Pull to the right edge of the road and stop",
                "Stop exactly where you are",
                "Continue at the same speed",
            ],
            1,
        )?,
        question(
            "What does a yield sign require?",
            [
                "A complete stop, always",
                "Slowing down and giving way as needed",
                "Merging at full speed",
                "Stopping only at night",
            ],
            1,
        )?,
        question(
            "When parking uphill with a curb, turn your front wheels:",
            ["Toward the curb", "Away from the curb", "Straight ahead", "Either way"],
            1,
        )?,
        question(
            "You may turn right on a red light:",
            [
                "Never",
                "After stopping, unless a sign prohibits it",
                "Only with a green arrow",
                "Whenever traffic is light",
            ],
            1,
        )?,
        question(
            "A school bus ahead has flashing red lights. You must:",
            [
                "Pass slowly",
                "Stop until the lights stop flashing",
                "Honk and pass",
                "Flash your lights back",
            ],
            1,
        )?,
        question(
            "The safest way to handle a tailgater is to:",
            [
                "Brake hard",
                "Increase your following distance and let them pass",
                "Speed up",
                "Straddle two lanes",
            ],
            1,
        )?,
        question(
            "Entering a roundabout, you must yield to:",
            [
                "Traffic entering behind you",
                "Traffic already circulating",
                "Traffic on your right only",
                "No one",
            ],
            1,
        )?,
        question(
            "Broken white lines between lanes mean:",
            [
                "No lane changes allowed",
                "Lane changes are permitted",
                "Oncoming traffic ahead",
                "Bus lane",
            ],
            1,
        )?,
        question(
            "If your brakes fail, your first response should be to:",
            [
                "Turn off the engine",
                "Pump the brake pedal and shift to a lower gear",
                "Swerve across traffic",
                "Open the door",
            ],
            1,
        )?,
        question(
            "When entering a highway you should:",
            [
                "Stop at the end of the ramp",
                "Match the speed of traffic and merge",
                "Merge well below traffic speed",
                "Use the shoulder to pass",
            ],
            1,
        )?,
        question(
            "A double solid yellow centre line means:",
            [
                "Passing is allowed in both directions",
                "No passing in either direction",
                "Passing is allowed with care",
                "Carpool lane ahead",
            ],
            1,
        )?,
        question(
            "Your blind spots are best checked by:",
            [
                "Mirrors alone",
                "Turning your head and looking over your shoulder",
                "Memory of nearby traffic",
                "Sounding the horn",
            ],
            1,
        )?,
        question(
            "At night, dim your high beams within how many feet of an oncoming vehicle?",
            ["100", "500", "1000", "2000"],
            1,
        )?,
        question(
            "Black ice forms first:",
            [
                "On sunny stretches",
                "On bridges and overpasses",
                "On gravel roads",
                "In tunnels",
            ],
            1,
        )?,
        question(
            "If your car starts to skid, you should:",
            [
                "Brake as hard as possible",
                "Steer in the direction you want the car to go",
                "Accelerate out of it",
                "Shift to park",
            ],
            1,
        )?,
        question(
            "A steady green arrow means:",
            [
                "You have a protected turn in the arrow's direction",
                "Stop and wait",
                "Yield to all traffic",
                "The lane is closed",
            ],
            0,
        )?,
        question(
            "The horn should be used to:",
            [
                "Express frustration",
                "Warn others of danger",
                "Greet pedestrians",
                "Hurry slower drivers",
            ],
            1,
        )?,
        question(
            "Compared to cars, large trucks need:",
            [
                "Shorter stopping distances",
                "Longer stopping distances",
                "The same stopping distance",
                "No following distance",
            ],
            1,
        )?,
        question(
            "When driving in fog, use your:",
            ["High beams", "Low beams", "Hazard lights only", "Parking lights only"],
            1,
        )?,
        question(
            "A railway crossing's lights are flashing. This means:",
            [
                "Cross quickly",
                "Stop; a train is approaching",
                "Slow to walking pace and cross",
                "Sound the horn and cross",
            ],
            1,
        )?,
        question(
            "Who must wear a seat belt?",
            [
                "The driver only",
                "Front-seat passengers only",
                "The driver and all passengers",
                "Nobody over 18",
            ],
            2,
        )?,
        question(
            "Fines for violations in a work zone are typically:",
            ["Waived", "Increased", "Reduced", "Unchanged"],
            1,
        )?,
        question(
            "A traffic light is completely dark during a power outage. Treat the intersection as:",
            ["A through road", "A four-way stop", "A yield", "A roundabout"],
            1,
        )?,
        question(
            "Recommended hand position on the steering wheel is about:",
            ["12 and 6", "9 and 3", "11 and 1 only", "One hand at 12"],
            1,
        )?,
        question(
            "At speed, you should be looking how far ahead?",
            [
                "1-2 seconds",
                "12-15 seconds",
                "A full minute",
                "Only at the car directly ahead",
            ],
            1,
        )?,
        question(
            "Before reversing, you should:",
            [
                "Rely on the mirrors only",
                "Look over your shoulder through the rear window",
                "Open the driver's door for a better view",
                "Honk twice",
            ],
            1,
        )?,
        question(
            "A police officer directs traffic against the signals. You must obey:",
            ["The signals", "The officer", "Neither", "Whichever is convenient"],
            1,
        )?,
        question(
            "Motorcycles are entitled to:",
            ["Half a lane", "A full lane", "The shoulder only", "No lane"],
            1,
        )?,
        question(
            "If you miss your highway exit, you should:",
            [
                "Reverse along the shoulder",
                "Continue to the next exit",
                "Make a U-turn across the median",
                "Stop and wait for a gap",
            ],
            1,
        )?,
        question(
            "Drinking coffee after drinking alcohol:",
            [
                "Sobers you up quickly",
                "Does not reduce impairment",
                "Doubles impairment",
                "Improves reaction time",
            ],
            1,
        )?,
    ])?;

    Ok(Lesson::new(
        CERTIFICATION_EXAM,
        "Certification Exam",
        "The full licensing exam. Pass it to reach Expert level.",
        Level::Intermediate,
        "45 min",
        content,
    )?)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::try_builtin().unwrap();
        assert_eq!(catalog.lessons().len(), 8);
    }

    #[test]
    fn certification_exam_has_forty_questions() {
        let catalog = Catalog::builtin();
        let exam = catalog.get(CERTIFICATION_EXAM).unwrap();
        assert!(exam.is_quiz());
        assert_eq!(exam.question_count(), 40);
        assert_eq!(exam.level(), Level::Intermediate);
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::builtin();
        assert!(catalog.contains(LessonId::new(1)));
        assert!(!catalog.contains(LessonId::new(99)));
        assert_eq!(catalog.get(LessonId::new(3)).unwrap().title(), "Beginner Quiz");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let catalog = Catalog::builtin();
        let mut lessons = catalog.lessons().to_vec();
        lessons.push(lessons[0].clone());
        let err = Catalog::new(lessons).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateLessonId(LessonId::new(1)));
    }

    #[test]
    fn recommended_includes_level_matches_and_all_quizzes() {
        let catalog = Catalog::builtin();
        let recommended = catalog.recommended_for(Level::Beginner);
        let ids: Vec<u64> = recommended.iter().map(|l| l.id().value()).collect();

        // Beginner lessons 1-3 plus the Intermediate-level certification exam
        // (quizzes are always recommended).
        assert_eq!(ids, vec![1, 2, 3, 8]);
    }

    #[test]
    fn others_is_the_complement_of_recommended() {
        let catalog = Catalog::builtin();
        for level in Level::ALL {
            let recommended = catalog.recommended_for(level);
            let others = catalog.others_for(level);
            assert_eq!(recommended.len() + others.len(), catalog.lessons().len());
            for lesson in &others {
                assert!(!recommended.iter().any(|r| r.id() == lesson.id()));
            }
        }
    }

    #[test]
    fn filter_by_kind() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.by_kind(LessonKind::Theory).len(), 3);
        assert_eq!(catalog.by_kind(LessonKind::Simulation).len(), 3);
        assert_eq!(catalog.by_kind(LessonKind::Quiz).len(), 2);
    }

    #[test]
    fn filter_by_level() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.by_level(Level::Beginner).len(), 3);
        assert_eq!(catalog.by_level(Level::Expert).len(), 0);
    }

    #[test]
    fn every_quiz_question_has_a_valid_answer() {
        let catalog = Catalog::builtin();
        for lesson in catalog.by_kind(LessonKind::Quiz) {
            let questions = lesson.content().questions().unwrap();
            for q in questions {
                assert!(q.correct() < q.options().len());
            }
        }
    }
}
