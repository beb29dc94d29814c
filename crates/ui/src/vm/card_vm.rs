use stamp_core::StampCatalog;
use stamp_core::model::{StampId, UserProgress};

use crate::vm::time_fmt::format_collected_at;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StampSlotVm {
    pub id: StampId,
    pub label: String,
    pub name: String,
    pub collected_at_str: Option<String>,
    /// Collected by the visit that opened this page.
    pub is_new: bool,
}

impl StampSlotVm {
    #[must_use]
    pub fn collected(&self) -> bool {
        self.collected_at_str.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardVm {
    pub collected: u32,
    pub total: u32,
    pub percent: u32,
    pub can_claim: bool,
    pub reward_claimed: bool,
    pub slots: Vec<StampSlotVm>,
}

/// One slot per catalog entry, in catalog order, filled from `progress`.
#[must_use]
pub fn map_card(
    progress: &UserProgress,
    catalog: &StampCatalog,
    just_added: Option<StampId>,
) -> CardVm {
    let total = catalog.total();
    let collected = progress.collected();
    let percent = if total == 0 {
        0
    } else {
        collected.min(total) * 100 / total
    };

    let slots = catalog
        .iter()
        .map(|definition| {
            let record = progress.find(definition.index());
            StampSlotVm {
                id: definition.index(),
                label: definition.short_label().to_string(),
                name: definition.name().to_string(),
                collected_at_str: record.map(|r| format_collected_at(r.collected_at())),
                is_new: record.is_some() && just_added == Some(definition.index()),
            }
        })
        .collect();

    CardVm {
        collected,
        total,
        percent,
        can_claim: progress.is_complete(total) && !progress.reward_claimed(),
        reward_claimed: progress.reward_claimed(),
        slots,
    }
}
