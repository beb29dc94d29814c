use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::StampCatalog;
use crate::model::ids::StampId;
use crate::model::stamp::StampRecord;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("stamp #{0} is not on this card")]
    UnknownStamp(StampId),

    #[error("stamp #{0} appears more than once")]
    DuplicateStamp(StampId),

    #[error("reward marked claimed with {collected} of {total} stamps")]
    PrematureClaim { collected: u32, total: u32 },
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of trying to add a stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampOutcome {
    Recorded(StampRecord),
    AlreadyCollected,
}

impl StampOutcome {
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// Result of trying to claim the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyClaimed,
    Incomplete { collected: u32, total: u32 },
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Collected stamps plus the reward flag.
///
/// Invariants, upheld by every constructor and mutation:
/// - stamps are sorted by id with no duplicates;
/// - every id belongs to the catalog the value was built against;
/// - the reward is claimed only when every stamp is collected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProgress {
    stamps: Vec<StampRecord>,
    reward_claimed: bool,
}

impl UserProgress {
    /// Nothing collected, nothing claimed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild progress from persisted parts, sorting stamps by id.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if a stamp is unknown to `catalog`, an id repeats,
    /// or the reward is claimed on an incomplete card.
    pub fn from_persisted(
        mut stamps: Vec<StampRecord>,
        reward_claimed: bool,
        catalog: &StampCatalog,
    ) -> Result<Self, ProgressError> {
        stamps.sort_by_key(StampRecord::id);

        for record in &stamps {
            if !catalog.contains(record.id()) {
                return Err(ProgressError::UnknownStamp(record.id()));
            }
        }
        if let Some(pair) = stamps.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(ProgressError::DuplicateStamp(pair[0].id()));
        }

        let progress = Self {
            stamps,
            reward_claimed,
        };
        if reward_claimed && !progress.is_complete(catalog.total()) {
            return Err(ProgressError::PrematureClaim {
                collected: progress.collected(),
                total: catalog.total(),
            });
        }
        Ok(progress)
    }

    #[must_use]
    pub fn stamps(&self) -> &[StampRecord] {
        &self.stamps
    }

    #[must_use]
    pub fn reward_claimed(&self) -> bool {
        self.reward_claimed
    }

    #[must_use]
    pub fn collected(&self) -> u32 {
        u32::try_from(self.stamps.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn has_stamp(&self, id: StampId) -> bool {
        self.find(id).is_some()
    }

    #[must_use]
    pub fn find(&self, id: StampId) -> Option<&StampRecord> {
        self.stamps
            .binary_search_by_key(&id, StampRecord::id)
            .ok()
            .map(|pos| &self.stamps[pos])
    }

    #[must_use]
    pub fn is_complete(&self, total: u32) -> bool {
        self.collected() == total
    }

    /// Add stamp `id`, named from `catalog`, collected at `at`.
    ///
    /// Re-recording an id already present leaves the value untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownStamp` if `id` is not in `catalog`.
    pub fn record_stamp(
        &mut self,
        catalog: &StampCatalog,
        id: StampId,
        at: DateTime<Utc>,
    ) -> Result<StampOutcome, ProgressError> {
        let definition = catalog.get(id).ok_or(ProgressError::UnknownStamp(id))?;

        match self.stamps.binary_search_by_key(&id, StampRecord::id) {
            Ok(_) => Ok(StampOutcome::AlreadyCollected),
            Err(pos) => {
                let record = StampRecord::new(id, at, definition.name());
                self.stamps.insert(pos, record.clone());
                Ok(StampOutcome::Recorded(record))
            }
        }
    }

    /// Flip the reward flag once every stamp is in.
    pub fn claim_reward(&mut self, total: u32) -> ClaimOutcome {
        if self.reward_claimed {
            return ClaimOutcome::AlreadyClaimed;
        }
        if !self.is_complete(total) {
            return ClaimOutcome::Incomplete {
                collected: self.collected(),
                total,
            };
        }
        self.reward_claimed = true;
        ClaimOutcome::Claimed
    }

    pub fn reset(&mut self) {
        *self = Self::empty();
    }
}
