use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Lesson.
///
/// The catalog addresses lessons by number ("1" through "8" today); keeping
/// the id as a newtype means progress records cannot be keyed by arbitrary
/// strings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(u64);

impl LessonId {
    /// Creates a new `LessonId`.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing a `LessonId` from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLessonIdError {
    raw: String,
}

impl fmt::Display for ParseLessonIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse lesson id from {:?}", self.raw)
    }
}

impl std::error::Error for ParseLessonIdError {}

impl FromStr for LessonId {
    type Err = ParseLessonIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(LessonId::new)
            .map_err(|_| ParseLessonIdError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display() {
        assert_eq!(LessonId::new(8).to_string(), "8");
    }

    #[test]
    fn lesson_id_from_str() {
        let id: LessonId = "3".parse().unwrap();
        assert_eq!(id, LessonId::new(3));
    }

    #[test]
    fn lesson_id_from_str_invalid() {
        assert!("not-a-number".parse::<LessonId>().is_err());
    }

    #[test]
    fn lesson_id_roundtrip() {
        let original = LessonId::new(42);
        let deserialized: LessonId = original.to_string().parse().unwrap();
        assert_eq!(original, deserialized);
    }
}
