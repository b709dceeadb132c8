use std::sync::Arc;
use tapgate_core::CardReading;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error};

/// Buffered payloads per subscriber before a slow viewer starts missing
/// messages. Card events arrive at human pace, so the buffer is generous.
const SUBSCRIBER_BUFFER: usize = 100;

struct HubShared {
    tx: broadcast::Sender<String>,
    last: RwLock<Option<CardReading>>,
}

/// Fan-out point for card readings.
///
/// Cheap to clone; all clones share the subscriber set and the last-reading
/// cache. The device loop is the only broadcaster; the WebSocket handlers
/// and the page renderer only read.
///
/// # Examples
///
/// ```
/// use tapgate_core::{CardReading, CardUid, ProgrammedToken};
/// use tapgate_hub::NotificationHub;
///
/// #[tokio::main]
/// async fn main() {
///     let hub = NotificationHub::new();
///     let mut viewer = hub.subscribe();
///
///     let reading = CardReading::new(
///         CardUid::new(vec![0x04, 0xA1, 0x2B, 0x7C]).unwrap(),
///         ProgrammedToken::new("DOOR1"),
///     );
///     hub.broadcast(&reading).await;
///
///     let payload = viewer.recv().await.unwrap();
///     assert_eq!(payload, r#"{"uid":"04A12B7C","idProgramado":"DOOR1"}"#);
/// }
/// ```
#[derive(Clone)]
pub struct NotificationHub {
    shared: Arc<HubShared>,
}

impl NotificationHub {
    /// Create a hub with the default per-subscriber buffer.
    pub fn new() -> Self {
        Self::with_capacity(SUBSCRIBER_BUFFER)
    }

    /// Create a hub with an explicit per-subscriber buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            shared: Arc::new(HubShared {
                tx,
                last: RwLock::new(None),
            }),
        }
    }

    /// Record the reading as last-known and fan it out to all current
    /// subscribers.
    ///
    /// Best-effort: viewers that disconnected or fell behind are skipped,
    /// and having no viewers at all is not an error.
    pub async fn broadcast(&self, reading: &CardReading) {
        *self.shared.last.write().await = Some(reading.clone());

        let payload = match serde_json::to_string(reading) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to serialize reading, broadcast skipped");
                return;
            }
        };

        let delivered = self.shared.tx.send(payload).unwrap_or(0);
        debug!(uid = %reading.uid(), subscribers = delivered, "reading broadcast");
    }

    /// Subscribe to future broadcasts.
    ///
    /// Subscribers only see readings broadcast after they join; nothing is
    /// replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.shared.tx.subscribe()
    }

    /// The most recently broadcast reading, if any.
    pub async fn last_reading(&self) -> Option<CardReading> {
        self.shared.last.read().await.clone()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.tx.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
