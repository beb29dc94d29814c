use std::sync::Arc;

use stamp_core::intake::{PointParam, read_point, strip_point};
use stamp_core::model::{Motivation, MotivationRequest, StampId, StampOutcome, StampRecord};

use crate::address_bar::AddressBar;
use crate::motivation::MotivationFetcher;
use crate::progress_service::ProgressService;

/// Why a visit did not touch progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    NoPoint,
    Malformed(String),
    OutOfRange(StampId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Ignored(IgnoreReason),
    AlreadyCollected(StampId),
    /// The stamp is stored and the address scrubbed; `request` is what to ask
    /// the motivation fetcher.
    Recorded {
        record: StampRecord,
        request: MotivationRequest,
    },
}

impl IntakeOutcome {
    /// Id to highlight as "just added", if this visit added one.
    #[must_use]
    pub fn recorded_id(&self) -> Option<StampId> {
        match self {
            Self::Recorded { record, .. } => Some(record.id()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReport {
    pub outcome: IntakeOutcome,
    pub motivation: Option<Motivation>,
}

/// Turns a visit to `?point=<id>` into a recorded stamp, once.
///
/// Safe to call any number of times for the same address: the membership
/// check against progress is what prevents double recording, the address
/// rewrite only keeps a refresh from re-running intake.
#[derive(Clone)]
pub struct IntakeService {
    progress: Arc<ProgressService>,
    motivation: Arc<MotivationFetcher>,
}

impl IntakeService {
    #[must_use]
    pub fn new(progress: Arc<ProgressService>, motivation: Arc<MotivationFetcher>) -> Self {
        Self {
            progress,
            motivation,
        }
    }

    #[must_use]
    pub fn motivation(&self) -> Arc<MotivationFetcher> {
        Arc::clone(&self.motivation)
    }

    /// Evaluate the current address and record its stamp if it is new.
    ///
    /// Recording (and persisting) happens before this returns; fetching the
    /// motivation pair is left to the caller.
    pub async fn handle_visit(&self, address: &dyn AddressBar) -> IntakeOutcome {
        let catalog = self.progress.catalog();
        let url = address.current_url();

        let id = match read_point(&url, &catalog) {
            PointParam::Valid(id) => id,
            PointParam::Absent => return IntakeOutcome::Ignored(IgnoreReason::NoPoint),
            PointParam::Malformed(raw) => {
                tracing::debug!(%raw, "ignoring malformed point parameter");
                return IntakeOutcome::Ignored(IgnoreReason::Malformed(raw));
            }
            PointParam::OutOfRange(id) => {
                tracing::debug!(stamp = %id, "ignoring point outside the card");
                return IntakeOutcome::Ignored(IgnoreReason::OutOfRange(id));
            }
        };

        if self.progress.has_stamp(id) {
            return IntakeOutcome::AlreadyCollected(id);
        }

        let record = match self.progress.record_stamp(id).await {
            Ok(StampOutcome::Recorded(record)) => record,
            Ok(StampOutcome::AlreadyCollected) => return IntakeOutcome::AlreadyCollected(id),
            Err(err) => {
                tracing::debug!(error = %err, "point rejected by progress");
                return IntakeOutcome::Ignored(IgnoreReason::OutOfRange(id));
            }
        };

        if !address.replace_url_if(&url, strip_point(&url)) {
            tracing::debug!(stamp = %id, "address moved during intake, leaving it");
        }

        IntakeOutcome::Recorded {
            record,
            request: MotivationRequest::for_stamp(id, catalog.total()),
        }
    }

    /// `handle_visit`, then wait for the motivation pair of a recorded stamp.
    pub async fn handle_visit_and_fetch(&self, address: &dyn AddressBar) -> IntakeReport {
        let outcome = self.handle_visit(address).await;
        let motivation = match &outcome {
            IntakeOutcome::Recorded { request, .. } => Some(self.motivation.fetch(*request).await),
            _ => None,
        };
        IntakeReport {
            outcome,
            motivation,
        }
    }
}
