use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{CardView, InfoView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CardView)] Card {},
        #[route("/how-it-works", InfoView)] Info {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "masthead",
                Link { class: "masthead-link", to: Route::Info {}, "How it works" }
                h1 { "Stamp Card ", span { class: "accent", "Digital" } }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
            footer { class: "footer", "Digital Stamp System" }
        }
    }
}
