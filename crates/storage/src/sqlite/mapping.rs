use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::collections::{BTreeMap, BTreeSet};

use drive_core::model::{Account, Level, LessonId};

use crate::repository::{AccountRecord, StorageError};

pub(super) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(super) fn encode_completed(set: &BTreeSet<LessonId>) -> Result<String, StorageError> {
    serde_json::to_string(set).map_err(ser)
}

pub(super) fn encode_scores(map: &BTreeMap<LessonId, f64>) -> Result<String, StorageError> {
    serde_json::to_string(map).map_err(ser)
}

/// Decode an account from a row of either table; both carry the same
/// columns.
pub(super) fn account_from_row(row: &SqliteRow) -> Result<Account, StorageError> {
    let level: Level = row
        .try_get::<String, _>("level")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    let completed_lessons: BTreeSet<LessonId> =
        serde_json::from_str(&row.try_get::<String, _>("completed_lessons").map_err(ser)?)
            .map_err(ser)?;

    let simulation_scores: BTreeMap<LessonId, f64> =
        serde_json::from_str(&row.try_get::<String, _>("simulation_scores").map_err(ser)?)
            .map_err(ser)?;

    let record = AccountRecord {
        username: row.try_get::<String, _>("username").map_err(ser)?,
        password: row.try_get::<String, _>("password").map_err(ser)?,
        level,
        completed_lessons,
        simulation_scores,
        created_at: row.try_get("created_at").map_err(ser)?,
    };

    record.into_account().map_err(ser)
}
