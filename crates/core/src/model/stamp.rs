use chrono::{DateTime, Utc};

use crate::model::ids::StampId;

/// A collected stamp. Created once per distinct id and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampRecord {
    id: StampId,
    collected_at: DateTime<Utc>,
    name: String,
}

impl StampRecord {
    #[must_use]
    pub fn new(id: StampId, collected_at: DateTime<Utc>, name: impl Into<String>) -> Self {
        Self {
            id,
            collected_at,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> StampId {
        self.id
    }

    #[must_use]
    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
