use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    AppServices, IntakeService, MemoryAddressBar, MotivationFetcher, MotivationSource,
    ProgressService,
};
use stamp_core::StampCatalog;
use stamp_core::time::fixed_clock;
use storage::Storage;
use url::Url;

use crate::context::{UiApp, build_app_context};
use crate::views::{CardView, InfoView};

pub const TEST_BASE: &str = "https://shop.example/card";

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    address_bar: Arc<MemoryAddressBar>,
    share_base: Url,
}

impl UiApp for TestApp {
    fn catalog(&self) -> Arc<StampCatalog> {
        self.services.catalog()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn intake(&self) -> Arc<IntakeService> {
        self.services.intake()
    }

    fn address_bar(&self) -> Arc<MemoryAddressBar> {
        Arc::clone(&self.address_bar)
    }

    fn share_base(&self) -> Url {
        self.share_base.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Card,
    Info,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Card => rsx! { CardView {} },
        ViewKind::Info => rsx! { InfoView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
    pub address_bar: Arc<MemoryAddressBar>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over fresh in-memory storage, opened at `address`.
pub async fn setup_view_harness(
    view: ViewKind,
    address: &str,
    source: Option<Arc<dyn MotivationSource>>,
) -> ViewHarness {
    let fetcher = source.map_or_else(MotivationFetcher::offline, MotivationFetcher::new);
    let services = AppServices::from_storage(
        &Storage::in_memory(),
        fixed_clock(),
        StampCatalog::standard(),
        fetcher,
    )
    .await;
    let address_bar = Arc::new(MemoryAddressBar::new(
        Url::parse(address).expect("test address"),
    ));

    let app = Arc::new(TestApp {
        services: services.clone(),
        address_bar: Arc::clone(&address_bar),
        share_base: Url::parse(TEST_BASE).expect("test base"),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        services,
        address_bar,
    }
}
