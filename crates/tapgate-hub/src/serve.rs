//! Router construction and server startup.

use axum::{Router, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{hub::NotificationHub, page, ws};

/// State shared with the page handler.
#[derive(Clone)]
pub(crate) struct PageState {
    pub(crate) hub: NotificationHub,
    pub(crate) notify_port: u16,
}

/// Build the page server router.
///
/// `notify_port` is baked into the page so the embedded script knows where
/// the notification channel lives.
pub fn page_router(hub: NotificationHub, notify_port: u16) -> Router {
    Router::new()
        .route("/", get(page::index))
        .layer(TraceLayer::new_for_http())
        .with_state(PageState { hub, notify_port })
}

/// Build the notification channel router.
pub fn notify_router(hub: NotificationHub) -> Router {
    Router::new().route("/", get(ws::notify_ws)).with_state(hub)
}

/// Handles of the two running hub servers.
pub struct HubServers {
    /// Address the page server actually bound to.
    pub page_addr: SocketAddr,
    /// Address the notification channel actually bound to.
    pub notify_addr: SocketAddr,
    page_task: JoinHandle<()>,
    notify_task: JoinHandle<()>,
}

impl HubServers {
    /// Stop both servers.
    pub fn shutdown(&self) {
        self.page_task.abort();
        self.notify_task.abort();
    }
}

/// Bind and start the page server and the notification channel.
///
/// Both run on their own tasks; the returned handles report the bound
/// addresses (useful when binding to port 0) and allow shutdown. Accepting
/// and pumping viewer connections needs no further involvement from the
/// caller.
///
/// # Errors
///
/// Returns an error if either listener cannot be bound.
pub async fn serve(
    hub: NotificationHub,
    page_addr: SocketAddr,
    notify_addr: SocketAddr,
) -> std::io::Result<HubServers> {
    let page_listener = TcpListener::bind(page_addr).await?;
    let notify_listener = TcpListener::bind(notify_addr).await?;

    let page_addr = page_listener.local_addr()?;
    let notify_addr = notify_listener.local_addr()?;

    info!(%page_addr, "page server listening");
    info!(%notify_addr, "notification channel listening");

    let page_app = page_router(hub.clone(), notify_addr.port());
    let page_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(page_listener, page_app).await {
            error!(error = %e, "page server stopped");
        }
    });

    let notify_app = notify_router(hub);
    let notify_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(notify_listener, notify_app).await {
            error!(error = %e, "notification channel stopped");
        }
    });

    Ok(HubServers {
        page_addr,
        notify_addr,
        page_task,
        notify_task,
    })
}
