use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stamp within a catalog (1-based).
///
/// The id itself carries no range information; membership in a concrete
/// catalog is checked by [`crate::StampCatalog::resolve`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StampId(u32);

impl StampId {
    /// Creates a new `StampId`
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based position of this stamp, as handed to the motivation endpoint.
    #[must_use]
    pub const fn zero_based(&self) -> u32 {
        self.0.saturating_sub(1)
    }
}

impl fmt::Debug for StampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StampId({})", self.0)
    }
}

impl fmt::Display for StampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a base-10 stamp id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStampIdError {
    raw: String,
}

impl ParseStampIdError {
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ParseStampIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a stamp id", self.raw)
    }
}

impl std::error::Error for ParseStampIdError {}

impl FromStr for StampId {
    type Err = ParseStampIdError;

    /// Strict base-10 parse. Surrounding whitespace is ignored, signs and
    /// trailing garbage are not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseStampIdError { raw: s.to_string() });
        }
        trimmed
            .parse::<u32>()
            .map(StampId::new)
            .map_err(|_| ParseStampIdError { raw: s.to_string() })
    }
}
