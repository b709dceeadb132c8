//! Tapgate terminal binary.
//!
//! Runs the device loop end-to-end on a development machine: the hub servers
//! are real, the authorization endpoint is whatever the configuration points
//! at, and the card reader is the mock transport fed from stdin. Type
//! `<uid-hex>[:<token>]` and press enter to present a card, e.g.
//! `04A12B7C:DOOR1`.

use tapgate_authorize::{AuthorizationClient, HttpTransport};
use tapgate_core::{CardUid, IndicatorState, constants::BLOCK_LENGTH};
use tapgate_hardware::{BlockKey, ConsolePanel, IndicatorController, mock::MockCardTransport};
use tapgate_hub::NotificationHub;
use tapgate_reader::CardReader;
use tapgate_terminal::{DeviceLoop, TerminalConfig};
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tapgate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TerminalConfig::from_env()?;
    info!(endpoint = %config.authorize_url, "starting terminal");

    // Viewer-facing servers run on their own tasks from here on.
    let hub = NotificationHub::new();
    let servers = tapgate_hub::serve(hub.clone(), config.page_addr, config.notify_addr).await?;
    info!(page = %servers.page_addr, notify = %servers.notify_addr, "hub online");

    // Connectivity is established (or its absence detected) once, before the
    // loop starts; the loop itself never reconnects.
    let connected = HttpTransport::probe(&config.authorize_url).await;
    if !connected {
        warn!("authorization endpoint unreachable, every reading will fall back to the default indicator");
    }
    let authorizer = AuthorizationClient::new(HttpTransport::new(&config.authorize_url, connected));

    let (transport, cards) = MockCardTransport::new();
    spawn_stdin_cards(cards);

    let reader = CardReader::with_block(transport, config.token_block, BlockKey::FACTORY);
    let mut indicators = IndicatorController::with_timing(
        ConsolePanel::new(),
        config.indicator_hold,
        config.buzzer_pulse,
    );

    // Power-on self test: light green once for the hold duration.
    info!("running indicator self test");
    if let Err(e) = indicators.show(IndicatorState::Green).await {
        warn!(error = %e, "indicator self test failed");
    }

    let mut device = DeviceLoop::new(reader, authorizer, indicators, hub, config.poll_interval);
    device.run().await;

    Ok(())
}

/// Present cards typed on stdin as `<uid-hex>[:<token>]` lines.
fn spawn_stdin_cards(cards: tapgate_hardware::mock::MockTransportHandle) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (hex, token) = line.split_once(':').unwrap_or((line, ""));
            match CardUid::parse_hex(hex) {
                Ok(uid) => {
                    let mut block = [0u8; BLOCK_LENGTH];
                    for (slot, byte) in block.iter_mut().zip(token.bytes()) {
                        *slot = byte;
                    }
                    if let Err(e) = cards.present_card(uid, block).await {
                        warn!(error = %e, "could not present card");
                        break;
                    }
                }
                Err(e) => warn!(error = %e, line, "ignoring line, expected <uid-hex>[:<token>]"),
            }
        }
    });
}
