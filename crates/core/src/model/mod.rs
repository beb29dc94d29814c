mod ids;
mod motivation;
mod progress;
mod stamp;

pub use ids::{ParseStampIdError, StampId};
pub use motivation::{Motivation, MotivationRequest};
pub use progress::{ClaimOutcome, ProgressError, StampOutcome, UserProgress};
pub use stamp::StampRecord;
