//! # Racketeer Browser
//!
//! A [`racketeer_protocols::DomProbe`] that drives a real browser tab over
//! the Chrome DevTools Protocol, so the bust scanner can run against the
//! live game page.

pub mod cdp;
pub mod probe;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use probe::CdpDomProbe;
