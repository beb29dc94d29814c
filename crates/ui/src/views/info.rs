use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

#[component]
pub fn InfoView() -> Element {
    rsx! {
        div { class: "page info-page",
            h2 { "How does the stamp card work?" }
            ol { class: "info-steps",
                li { "Publish this card at a public address." }
                li { "Use the demo tools to generate one link per collection point and print them as QR codes." }
                li { "Place the codes around the venue. Scanning one stamps the visitor's card on their own device." }
            }
            p { class: "info-note",
                "Progress is stored on the visitor's device only. There is no server-side database."
            }
            Link { class: "btn", to: Route::Card {}, "Got it" }
        }
    }
}
