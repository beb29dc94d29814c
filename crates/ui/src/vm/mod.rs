mod card_vm;
mod share_vm;
mod time_fmt;

pub use card_vm::{CardVm, StampSlotVm, map_card};
pub use share_vm::{ShareLinkVm, map_share_links};
pub use time_fmt::format_collected_at;
