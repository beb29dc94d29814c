use dioxus::prelude::*;
use services::{AddressBar, IntakeOutcome};
use stamp_core::intake::share_url;
use stamp_core::model::{Motivation, StampId};

use crate::context::AppContext;
use crate::vm::{map_card, map_share_links};

use super::components::{DemoPanel, MotivationPanel, ProgressBar, RewardPanel, StampGrid};
use super::modals::{LoadingOverlay, QrModal, ResetModal};

#[component]
pub fn CardView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let progress_service = ctx.progress();
    let intake = ctx.intake();
    let address_bar = ctx.address_bar();

    let progress = use_signal({
        let progress_service = progress_service.clone();
        move || progress_service.snapshot()
    });
    let address = use_signal({
        let address_bar = address_bar.clone();
        move || address_bar.current_url()
    });
    let motivation = use_signal(|| None::<Motivation>);
    let pending_fetches = use_signal(|| 0_u32);
    let just_added = use_signal(|| None::<StampId>);
    let mut show_demo = use_signal(|| false);
    let mut qr_open = use_signal(|| false);
    let mut qr_point = use_signal(|| StampId::new(1));
    let mut confirm_reset = use_signal(|| false);

    // Re-run intake whenever the stamps or the address change. A visit that is
    // already recorded comes back as `AlreadyCollected`, so this settles.
    {
        let intake = intake.clone();
        let address_bar = address_bar.clone();
        let progress_service = progress_service.clone();
        use_effect(move || {
            let _stamps = progress.read().collected();
            let _url = address.read().clone();

            let intake = intake.clone();
            let address_bar = address_bar.clone();
            let progress_service = progress_service.clone();
            let mut progress = progress;
            let mut address = address;
            let mut motivation = motivation;
            let mut pending_fetches = pending_fetches;
            let mut just_added = just_added;
            spawn(async move {
                let outcome = intake.handle_visit(address_bar.as_ref()).await;
                let IntakeOutcome::Recorded { record, request } = outcome else {
                    return;
                };

                just_added.set(Some(record.id()));
                progress.set(progress_service.snapshot());
                address.set(address_bar.current_url());

                pending_fetches += 1;
                // Whichever fetch resolves last decides the message.
                let message = intake.motivation().fetch(request).await;
                motivation.set(Some(message));
                pending_fetches -= 1;
            });
        });
    }

    let on_claim = {
        let progress_service = progress_service.clone();
        use_callback(move |()| {
            let progress_service = progress_service.clone();
            let mut progress = progress;
            spawn(async move {
                progress_service.claim_reward().await;
                progress.set(progress_service.snapshot());
            });
        })
    };

    let on_reset_confirm = {
        let progress_service = progress_service.clone();
        use_callback(move |()| {
            let progress_service = progress_service.clone();
            let mut progress = progress;
            let mut motivation = motivation;
            let mut just_added = just_added;
            confirm_reset.set(false);
            spawn(async move {
                progress_service.reset().await;
                progress.set(progress_service.snapshot());
                motivation.set(None);
                just_added.set(None);
            });
        })
    };

    let on_visit = {
        let address_bar = address_bar.clone();
        let base = ctx.share_base().clone();
        use_callback(move |id: StampId| {
            let mut address = address;
            address_bar.navigate(share_url(&base, id));
            address.set(address_bar.current_url());
        })
    };

    let card = map_card(&progress.read(), &catalog, just_added());
    let share_links = map_share_links(ctx.share_base(), &catalog);
    let selected_link = share_links
        .iter()
        .find(|link| link.id == qr_point())
        .map(|link| link.url.clone())
        .unwrap_or_default();
    let current_address = address.read().to_string();

    rsx! {
        div { class: "page card-page",
            p { class: "tagline", "Collect {card.total} stamps to unlock the reward!" }

            section { class: "stamp-card",
                ProgressBar { collected: card.collected, total: card.total, percent: card.percent }
                StampGrid { slots: card.slots.clone() }

                div { class: "panel-stack",
                    if let Some(message) = motivation() {
                        MotivationPanel { motivation: message }
                    }
                    RewardPanel {
                        can_claim: card.can_claim,
                        reward_claimed: card.reward_claimed,
                        on_claim,
                    }
                }
            }

            div { class: "tools",
                div { class: "tools-row",
                    button {
                        class: "btn tools-demo",
                        r#type: "button",
                        onclick: move |_| show_demo.set(!show_demo()),
                        "Simulate scan & QR links (demo)"
                    }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        title: "Reset all progress",
                        onclick: move |_| confirm_reset.set(true),
                        "Reset"
                    }
                }
                if show_demo() {
                    DemoPanel {
                        links: share_links.clone(),
                        on_visit,
                        on_open_qr: move |()| qr_open.set(true),
                    }
                }
                p { class: "address", "Address: {current_address}" }
            }

            if qr_open() {
                QrModal {
                    links: share_links.clone(),
                    selected: qr_point(),
                    selected_url: selected_link,
                    on_select: move |id| qr_point.set(id),
                    on_close: move |()| qr_open.set(false),
                }
            }
            if confirm_reset() {
                ResetModal {
                    on_cancel: move |()| confirm_reset.set(false),
                    on_confirm: on_reset_confirm,
                }
            }
            if pending_fetches() > 0 {
                LoadingOverlay {}
            }
        }
    }
}
