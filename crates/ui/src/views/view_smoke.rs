use std::sync::Arc;

use async_trait::async_trait;
use services::{AddressBar, MotivationError, MotivationSource};
use stamp_core::model::{Motivation, MotivationRequest, StampId};

use super::test_harness::{TEST_BASE, ViewKind, setup_view_harness};

struct Cheer;

#[async_trait]
impl MotivationSource for Cheer {
    async fn generate(&self, _: MotivationRequest) -> Result<Motivation, MotivationError> {
        Ok(Motivation::new("Nice find!", "Keep going."))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn card_view_smoke_renders_empty_card() {
    let mut harness = setup_view_harness(ViewKind::Card, TEST_BASE, None).await;

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("0 / 6"), "missing count in {html}");
    assert!(html.contains("Collect 6 stamps"), "missing tagline in {html}");
    assert!(!html.contains("Claim your reward"), "unexpected claim in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn card_view_smoke_renders_collected_stamps() {
    let mut harness = setup_view_harness(ViewKind::Card, TEST_BASE, None).await;
    let progress = harness.services.progress();
    for raw in [2, 4] {
        progress.record_stamp(StampId::new(raw)).await.unwrap();
    }

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("2 / 6"), "missing count in {html}");
    assert!(html.contains("Garden"), "missing label in {html}");
    assert!(html.contains("Cafe"), "missing label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn card_view_smoke_offers_claim_on_full_card() {
    let mut harness = setup_view_harness(ViewKind::Card, TEST_BASE, None).await;
    let progress = harness.services.progress();
    for id in harness.services.catalog().ids() {
        progress.record_stamp(id).await.unwrap();
    }

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("6 / 6"), "missing count in {html}");
    assert!(html.contains("Claim your reward"), "missing claim in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn card_view_smoke_renders_claimed_reward() {
    let mut harness = setup_view_harness(ViewKind::Card, TEST_BASE, None).await;
    let progress = harness.services.progress();
    for id in harness.services.catalog().ids() {
        progress.record_stamp(id).await.unwrap();
    }
    progress.claim_reward().await;

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Card complete!"), "missing reward in {html}");
    assert!(!html.contains("Claim your reward"), "claim still offered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn card_view_intake_records_visit_and_shows_message() {
    let address = format!("{TEST_BASE}?point=4");
    let mut harness =
        setup_view_harness(ViewKind::Card, &address, Some(Arc::new(Cheer))).await;

    harness.rebuild();
    for _ in 0..10 {
        harness.drive_async().await;
        if harness.render().contains("Nice find!") {
            break;
        }
    }

    let snapshot = harness.services.progress().snapshot();
    assert!(snapshot.has_stamp(StampId::new(4)));
    assert_eq!(snapshot.collected(), 1);
    assert_eq!(harness.address_bar.current_url().as_str(), TEST_BASE);

    let html = harness.render();
    assert!(html.contains("1 / 6"), "missing count in {html}");
    assert!(html.contains("Nice find!"), "missing message in {html}");
    assert!(html.contains("stamp-reveal"), "missing highlight in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn info_view_smoke_renders_steps() {
    let mut harness = setup_view_harness(ViewKind::Info, TEST_BASE, None).await;

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("How does the stamp card work?"), "missing title in {html}");
    assert!(html.contains("no server-side database"), "missing note in {html}");
}
