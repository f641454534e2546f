use serde::Deserialize;
use tracing::debug;

use drive_core::model::LessonId;

/// Message type tag the embedded simulation posts with its score.
pub const SCORE_EVENT_TYPE: &str = "SIMULATION_SCORE";

#[derive(Debug, Deserialize)]
struct ScoreEvent {
    #[serde(rename = "type")]
    kind: String,
    score: f64,
}

/// Score intake for one run of an embedded simulation.
///
/// The simulation is an opaque collaborator that posts messages of the shape
/// `{"type": "SIMULATION_SCORE", "score": <number>}` at its own pace. Every
/// other message shape, and any non-finite score, is dropped without error;
/// the last valid score observed before the run ends is the one that counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    lesson_id: LessonId,
    latest: Option<f64>,
}

impl SimulationRun {
    #[must_use]
    pub fn new(lesson_id: LessonId) -> Self {
        Self {
            lesson_id,
            latest: None,
        }
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    /// The most recent valid score, if any message carried one.
    #[must_use]
    pub fn latest_score(&self) -> Option<f64> {
        self.latest
    }

    /// Feeds one raw message from the simulation frame.
    ///
    /// Returns the accepted score, or `None` when the message was dropped
    /// (wrong shape, wrong type tag, or a non-finite score).
    pub fn observe(&mut self, raw: &str) -> Option<f64> {
        let event: ScoreEvent = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(err) => {
                debug!(lesson = %self.lesson_id, %err, "dropping malformed simulation message");
                return None;
            }
        };

        if event.kind != SCORE_EVENT_TYPE {
            debug!(lesson = %self.lesson_id, kind = event.kind, "ignoring non-score message");
            return None;
        }
        if !event.score.is_finite() {
            debug!(lesson = %self.lesson_id, "dropping non-finite score");
            return None;
        }

        self.latest = Some(event.score);
        Some(event.score)
    }

    /// Consumes the run, yielding the authoritative score.
    #[must_use]
    pub fn into_score(self) -> Option<f64> {
        self.latest
    }
}
