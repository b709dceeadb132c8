//! End-to-end cycle tests with every capability mocked.
//!
//! These run under a paused tokio clock, so the hold and pulse durations are
//! asserted exactly.

use std::time::Duration;

use tapgate_authorize::{AuthorizationClient, mock::MockAuthorizationTransport};
use tapgate_core::{CardUid, IndicatorState, constants::BLOCK_LENGTH};
use tapgate_hardware::{
    IndicatorController,
    mock::{MockCardTransport, MockPanel, MockTransportHandle, PanelEvent},
};
use tapgate_hub::NotificationHub;
use tapgate_reader::CardReader;
use tapgate_terminal::{CycleState, DeviceLoop};

const POLL_INTERVAL: Duration = Duration::from_millis(300);

fn uid() -> CardUid {
    CardUid::new(vec![0x04, 0xA1, 0x2B, 0x7C]).unwrap()
}

fn door1_block() -> [u8; BLOCK_LENGTH] {
    let mut block = [0u8; BLOCK_LENGTH];
    block[..5].copy_from_slice(b"DOOR1");
    block
}

struct Fixture {
    device: DeviceLoop<MockCardTransport, MockAuthorizationTransport, MockPanel>,
    cards: MockTransportHandle,
    authorizer: MockAuthorizationTransport,
    panel: tapgate_hardware::mock::MockPanelHandle,
    hub: NotificationHub,
}

fn fixture(authorizer: MockAuthorizationTransport) -> Fixture {
    let (transport, cards) = MockCardTransport::new();
    let (panel, panel_handle) = MockPanel::new();
    let hub = NotificationHub::new();

    let device = DeviceLoop::new(
        CardReader::new(transport),
        AuthorizationClient::new(authorizer.clone()),
        IndicatorController::new(panel),
        hub.clone(),
        POLL_INTERVAL,
    );

    Fixture {
        device,
        cards,
        authorizer,
        panel: panel_handle,
        hub,
    }
}

#[tokio::test(start_paused = true)]
async fn test_denied_card_cycle() {
    let authorizer = MockAuthorizationTransport::online();
    authorizer.enqueue_body(r#"{"estadoLED":"rojo"}"#);
    let mut f = fixture(authorizer);

    let mut viewer = f.hub.subscribe();
    f.cards.present_card(uid(), door1_block()).await.unwrap();

    let reading = f.device.cycle().await.unwrap().expect("card expected");

    // The reading carries the rendered uid and the sanitized token.
    assert_eq!(reading.uid().to_hex(), "04A12B7C");
    assert_eq!(reading.token().as_str(), "DOOR1");

    // Exactly one request went out, carrying the same reading.
    assert_eq!(f.authorizer.attempts(), 1);
    assert_eq!(f.authorizer.submitted_readings(), vec![reading.clone()]);

    // Buzzer pulse first, then red held for exactly the hold duration.
    let timeline = f.panel.timeline();
    let events: Vec<_> = timeline.iter().map(|(_, e)| *e).collect();
    assert_eq!(
        events,
        vec![
            PanelEvent::Buzzer(true),
            PanelEvent::Buzzer(false),
            PanelEvent::Indicator(None),
            PanelEvent::Indicator(Some(IndicatorState::Red)),
            PanelEvent::Indicator(None),
        ]
    );
    assert_eq!(timeline[1].0 - timeline[0].0, Duration::from_millis(200));
    assert_eq!(timeline[4].0 - timeline[3].0, Duration::from_millis(2000));
    assert_eq!(f.panel.indicator(), None);

    // The broadcast carries the exact same reading.
    assert_eq!(
        viewer.try_recv().unwrap(),
        r#"{"uid":"04A12B7C","idProgramado":"DOOR1"}"#
    );
    assert_eq!(f.hub.last_reading().await, Some(reading));

    assert_eq!(f.device.state(), CycleState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_offline_cycle_defaults_to_green() {
    let mut f = fixture(MockAuthorizationTransport::offline());

    let mut viewer = f.hub.subscribe();
    f.cards.present_card(uid(), door1_block()).await.unwrap();

    let reading = f.device.cycle().await.unwrap().expect("card expected");

    // No request was attempted, yet the cycle ran to completion.
    assert_eq!(f.authorizer.attempts(), 0);

    // Unresolved falls back to green, held like any decision.
    let events = f.panel.events();
    assert!(events.contains(&PanelEvent::Indicator(Some(IndicatorState::Green))));

    // The broadcast still occurs with whatever reading was captured.
    assert_eq!(
        viewer.try_recv().unwrap(),
        serde_json::to_string(&reading).unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn test_unusable_response_defaults_to_green() {
    let authorizer = MockAuthorizationTransport::online();
    authorizer.enqueue_body("not json");
    let mut f = fixture(authorizer);

    f.cards.present_card(uid(), door1_block()).await.unwrap();
    f.device.cycle().await.unwrap().expect("card expected");

    assert_eq!(f.authorizer.attempts(), 1);
    assert!(
        f.panel
            .events()
            .contains(&PanelEvent::Indicator(Some(IndicatorState::Green)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_empty_cycle_sleeps_poll_interval() {
    let mut f = fixture(MockAuthorizationTransport::online());

    let before = tokio::time::Instant::now();
    let outcome = f.device.cycle().await.unwrap();
    let elapsed = before.elapsed();

    assert!(outcome.is_none());
    assert_eq!(elapsed, POLL_INTERVAL);
    assert_eq!(f.device.state(), CycleState::Idle);

    // No actuation and no broadcast happened.
    assert!(f.panel.events().is_empty());
    assert_eq!(f.hub.last_reading().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_auth_failure_still_reports_uid() {
    let authorizer = MockAuthorizationTransport::online();
    authorizer.enqueue_body(r#"{"estadoLED":"amarillo"}"#);
    let mut f = fixture(authorizer);

    f.cards.present_card_with_auth_failure(uid()).await.unwrap();

    let reading = f.device.cycle().await.unwrap().expect("card expected");

    // The token degraded to empty but the cycle went all the way through.
    assert!(reading.token().is_empty());
    assert_eq!(f.authorizer.attempts(), 1);
    assert_eq!(
        f.hub.last_reading().await.map(|r| r.uid().to_hex()),
        Some("04A12B7C".to_string())
    );
    assert!(
        f.panel
            .events()
            .contains(&PanelEvent::Indicator(Some(IndicatorState::Yellow)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_cycles_do_not_interleave() {
    let authorizer = MockAuthorizationTransport::online();
    authorizer.enqueue_body(r#"{"estadoLED":"rojo"}"#);
    authorizer.enqueue_body(r#"{"estadoLED":"verde"}"#);
    let mut f = fixture(authorizer);

    let mut viewer = f.hub.subscribe();

    let second_uid = CardUid::new(vec![0x01, 0x02, 0x03, 0x04]).unwrap();
    f.cards.present_card(uid(), door1_block()).await.unwrap();
    f.cards
        .present_card(second_uid, door1_block())
        .await
        .unwrap();

    let first = f.device.cycle().await.unwrap().expect("first card");
    let second = f.device.cycle().await.unwrap().expect("second card");

    // Each broadcast reflects the reading of its own cycle, in order.
    assert_eq!(
        viewer.try_recv().unwrap(),
        serde_json::to_string(&first).unwrap()
    );
    assert_eq!(
        viewer.try_recv().unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(f.authorizer.submitted_readings(), vec![first, second]);
}
