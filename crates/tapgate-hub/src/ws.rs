//! WebSocket endpoint of the notification channel.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::debug;

use crate::hub::NotificationHub;

/// WebSocket endpoint for viewers.
pub(crate) async fn notify_ws(ws: WebSocketUpgrade, State(hub): State<NotificationHub>) -> Response {
    ws.on_upgrade(|socket| handle_viewer(socket, hub))
}

async fn handle_viewer(socket: WebSocket, hub: NotificationHub) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = hub.subscribe();

    debug!("viewer connected");

    // Forward broadcasts to this viewer until it goes away or falls so far
    // behind that its buffer lapses (best-effort delivery, no catch-up).
    let send_task = tokio::spawn(async move {
        while let Ok(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Drain the incoming side to keep the connection alive; viewers are
    // passive and send nothing we interpret.
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    send_task.abort();
    debug!("viewer disconnected");
}
