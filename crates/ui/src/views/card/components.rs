use dioxus::prelude::*;
use stamp_core::model::{Motivation, StampId};

use crate::vm::{ShareLinkVm, StampSlotVm};

#[component]
pub fn ProgressBar(collected: u32, total: u32, percent: u32) -> Element {
    rsx! {
        div { class: "progress",
            div { class: "progress-head",
                span { class: "progress-label", "Progress" }
                span { class: "progress-count", "{collected} / {total}" }
            }
            div { class: "progress-track",
                div { class: "progress-fill", style: "width: {percent}%" }
            }
        }
    }
}

#[component]
pub fn StampGrid(slots: Vec<StampSlotVm>) -> Element {
    rsx! {
        div { class: "stamp-grid",
            for slot in slots {
                StampSlot { key: "{slot.id}", slot: slot.clone() }
            }
        }
    }
}

#[component]
fn StampSlot(slot: StampSlotVm) -> Element {
    let collected = slot.collected();
    let slot_class = if collected {
        "stamp-slot collected"
    } else {
        "stamp-slot open"
    };
    let mark_class = if slot.is_new {
        "stamp-mark stamp-reveal"
    } else {
        "stamp-mark"
    };

    rsx! {
        div { class: slot_class, title: "{slot.name}",
            if let Some(collected_at) = slot.collected_at_str.clone() {
                div { class: mark_class,
                    span { class: "stamp-star", "★" }
                    span { class: "stamp-label", "{slot.label}" }
                    span { class: "stamp-time", "{collected_at}" }
                }
                span { class: "stamp-check", "✓" }
            } else {
                span { class: "stamp-number", "{slot.id}" }
            }
        }
    }
}

#[component]
pub fn MotivationPanel(motivation: Motivation) -> Element {
    rsx! {
        div { class: "motivation",
            p { class: "motivation-message", "{motivation.message}" }
            p { class: "motivation-encouragement", "{motivation.encouragement}" }
        }
    }
}

#[component]
pub fn RewardPanel(can_claim: bool, reward_claimed: bool, on_claim: EventHandler<()>) -> Element {
    rsx! {
        if can_claim {
            button {
                class: "btn btn-reward",
                r#type: "button",
                onclick: move |_| on_claim.call(()),
                "Claim your reward"
            }
        }
        if reward_claimed {
            div { class: "reward",
                h2 { "Card complete!" }
                p { "You are a stamp master. Show this screen to the staff." }
            }
        }
    }
}

/// Links that act like scanning each point, plus the QR export entry.
#[component]
pub fn DemoPanel(
    links: Vec<ShareLinkVm>,
    on_visit: EventHandler<StampId>,
    on_open_qr: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "demo",
            p { class: "demo-title", "Simulated scans and QR export" }
            div { class: "demo-grid",
                for link in links {
                    button {
                        key: "{link.id}",
                        class: "btn demo-link",
                        r#type: "button",
                        title: "{link.url}",
                        onclick: move |_| on_visit.call(link.id),
                        "Test stamp #{link.id}"
                    }
                }
            }
            button {
                class: "btn btn-primary demo-qr",
                r#type: "button",
                onclick: move |_| on_open_qr.call(()),
                "Generate point QR links"
            }
        }
    }
}
