use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use stamp_core::StampCatalog;
use stamp_core::model::{ProgressError, StampId, StampRecord, UserProgress};

/// Persisted shape of a collected stamp.
///
/// `timestamp` stays a string so anything RFC 3339 written by another client
/// (e.g. JavaScript's `toISOString`) is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampRow {
    pub id: StampId,
    pub timestamp: String,
    pub name: String,
}

/// Persisted shape of `UserProgress`:
/// `{"stamps":[{"id":1,"timestamp":"...","name":"..."}],"rewardClaimed":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub stamps: Vec<StampRow>,
    pub reward_claimed: bool,
}

/// Why a stored record could not become a `UserProgress`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error("stamp #{id} has an unreadable timestamp `{raw}`")]
    Timestamp { id: StampId, raw: String },
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            stamps: progress
                .stamps()
                .iter()
                .map(|stamp| StampRow {
                    id: stamp.id(),
                    timestamp: format_timestamp(stamp.collected_at()),
                    name: stamp.name().to_owned(),
                })
                .collect(),
            reward_claimed: progress.reward_claimed(),
        }
    }

    /// Convert the record back into validated progress.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if a timestamp does not parse or the stamps break
    /// the `UserProgress` invariants for `catalog`.
    pub fn into_progress(self, catalog: &StampCatalog) -> Result<UserProgress, RecordError> {
        let stamps = self
            .stamps
            .into_iter()
            .map(|row| {
                let at = parse_timestamp(&row.timestamp).ok_or_else(|| RecordError::Timestamp {
                    id: row.id,
                    raw: row.timestamp.clone(),
                })?;
                Ok(StampRecord::new(row.id, at, row.name))
            })
            .collect::<Result<Vec<_>, RecordError>>()?;

        Ok(UserProgress::from_persisted(
            stamps,
            self.reward_claimed,
            catalog,
        )?)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
