//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome/Chromium via WebSocket and speaks the CDP JSON-RPC
//! protocol. Only the pieces the page probe needs are here: discovery,
//! target attachment and `Runtime.evaluate`.
//!
//! Start Chrome with remote debugging:
//! ```bash
//! chrome --remote-debugging-port=9222
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::{CdpClient, find_page};
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
