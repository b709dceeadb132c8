//! Viewer notification hub for the Tapgate access terminal.
//!
//! The hub fans the latest card reading out to any number of passively
//! connected WebSocket viewers and serves a minimal page that subscribes
//! itself. Delivery is best-effort: disconnected or lagging viewers are
//! skipped silently, nothing is queued for late joiners, and the only state
//! kept is the last reading so a freshly loaded page starts from something.
//!
//! The page server and the notification channel listen on distinct ports;
//! both run on their own tasks so viewer connectivity is serviced
//! independently of whatever the device loop is doing.

mod hub;
mod page;
mod serve;
mod ws;

pub use hub::NotificationHub;
pub use page::render_index;
pub use serve::{HubServers, notify_router, page_router, serve};
