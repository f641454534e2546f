use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Learner tier, gating which lessons are recommended.
///
/// `Beginner` is the bottom tier and `Expert` the top; the derived ordering
/// follows declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Beginner,
        Level::Intermediate,
        Level::Advanced,
        Level::Expert,
    ];

    /// Stable name used for storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
            Level::Expert => "Expert",
        }
    }

    #[must_use]
    pub fn is_bottom(&self) -> bool {
        matches!(self, Level::Beginner)
    }

    #[must_use]
    pub fn is_top(&self) -> bool {
        matches!(self, Level::Expert)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a `Level` from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    raw: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown level: {:?}", self.raw)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Level::Beginner),
            "Intermediate" => Ok(Level::Intermediate),
            "Advanced" => Ok(Level::Advanced),
            "Expert" => Ok(Level::Expert),
            _ => Err(ParseLevelError { raw: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_matches_tiers() {
        assert!(Level::Beginner < Level::Intermediate);
        assert!(Level::Intermediate < Level::Advanced);
        assert!(Level::Advanced < Level::Expert);
    }

    #[test]
    fn level_string_roundtrip() {
        for level in Level::ALL {
            let parsed: Level = level.as_str().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn level_rejects_unknown_name() {
        assert!("Novice".parse::<Level>().is_err());
        assert!("beginner".parse::<Level>().is_err());
    }

    #[test]
    fn default_is_bottom_tier() {
        assert!(Level::default().is_bottom());
        assert!(Level::Expert.is_top());
    }
}
