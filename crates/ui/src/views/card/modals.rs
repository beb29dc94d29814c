use dioxus::prelude::*;
use stamp_core::model::StampId;

use crate::vm::ShareLinkVm;

/// Point picker for printing collection-point codes. The code image itself is
/// produced by whatever tool prints the link.
#[component]
pub fn QrModal(
    links: Vec<ShareLinkVm>,
    selected: StampId,
    selected_url: String,
    on_select: EventHandler<StampId>,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal qr-modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "Point QR links" }
                p { class: "modal-body", "Print a code for each point for visitors to scan." }
                div { class: "qr-picker",
                    for link in links {
                        button {
                            key: "{link.id}",
                            class: point_class(link.id == selected),
                            r#type: "button",
                            onclick: move |_| on_select.call(link.id),
                            "{link.id}"
                        }
                    }
                }
                p { class: "qr-url", "{selected_url}" }
                div { class: "modal-actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| on_close.call(()),
                        "Close"
                    }
                }
            }
        }
    }
}

fn point_class(selected: bool) -> &'static str {
    if selected {
        "btn qr-point selected"
    } else {
        "btn qr-point"
    }
}

#[component]
pub fn ResetModal(on_cancel: EventHandler<()>, on_confirm: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_cancel.call(()),
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "Reset all stamps?" }
                p { class: "modal-body",
                    "Every collected stamp and the reward status will be erased."
                }
                div { class: "modal-actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Keep my stamps"
                    }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: move |_| on_confirm.call(()),
                        "Reset"
                    }
                }
            }
        }
    }
}

#[component]
pub fn LoadingOverlay() -> Element {
    rsx! {
        div { class: "loading-overlay",
            div { class: "spinner" }
            p { "Stamping, one moment..." }
        }
    }
}
