use crate::model::ids::StampId;

const FALLBACK_MESSAGE: &str = "太棒了！繼續加油！";
const FALLBACK_ENCOURAGEMENT: &str = "你知道嗎？世界上第一枚郵票是 1840 年發行的黑便士。";

/// Short decorative text pair shown after a stamp is collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motivation {
    pub message: String,
    pub encouragement: String,
}

impl Motivation {
    #[must_use]
    pub fn new(message: impl Into<String>, encouragement: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            encouragement: encouragement.into(),
        }
    }

    /// The fixed pair used whenever generated text is unavailable.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(FALLBACK_MESSAGE, FALLBACK_ENCOURAGEMENT)
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.message == FALLBACK_MESSAGE && self.encouragement == FALLBACK_ENCOURAGEMENT
    }
}

/// What the motivation endpoint is asked about: the zero-based stamp index and the card size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotivationRequest {
    pub stamp_index: u32,
    pub total: u32,
}

impl MotivationRequest {
    #[must_use]
    pub fn for_stamp(id: StampId, total: u32) -> Self {
        Self {
            stamp_index: id.zero_based(),
            total,
        }
    }

    /// 1-based ordinal, the way the visitor counts.
    #[must_use]
    pub fn ordinal(&self) -> u32 {
        self.stamp_index + 1
    }
}
