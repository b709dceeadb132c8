//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled
//! programmatically without requiring physical hardware.

pub mod panel;
pub mod transport;

// Re-export commonly used types
pub use panel::{MockPanel, MockPanelHandle, PanelEvent};
pub use transport::{MockCardTransport, MockTransportHandle};
