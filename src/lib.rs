//! WebDriver-style automation for Safari over the WebKit remote debugging
//! protocol.
//!
//! Safari exposes the same devtools command/event protocol as other WebKit
//! browsers, but mobile Safari hides it behind the iOS Web Inspector
//! service, which multiplexes one channel across every debuggable
//! application on the device. This crate provides both halves:
//!
//! - [`SafariSession`] drives a page through the inspector multiplexer,
//!   tracking applications, page listings, and the active target.
//! - [`WebSocketSession`] drives a directly-debuggable target over a plain
//!   devtools WebSocket endpoint.
//!
//! Both ride the same [`Debugger`] dispatcher: commands get monotonically
//! increasing ids, responses are correlated back to their callers with
//! per-command timeouts, and unsolicited events fan out to registered
//! listeners. Commands are plain values built by the [`domains`] functions;
//! error-shaped responses surface as [`Error::CommandFailed`] with the
//! originating command attached.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use safari_webdriver::{WebSocketSession, domains::page};
//!
//! # async fn run() -> safari_webdriver::Result<()> {
//! let session = WebSocketSession::connect("ws://127.0.0.1:9222/devtools/page/1").await?;
//! session
//!     .send(&page::navigate("https://example.com"), Duration::from_secs(30))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`devtools`] | Commands, dispatcher, results, events, domain builders |
//! | [`inspector`] | iOS Web Inspector wire model and session multiplexer |
//! | [`session`] | Debugger wired over the inspector channel |
//! | [`transport`] | WebSocket transport for direct targets |
//! | [`error`] | Error types and `Result` alias |

// ============================================================================
// Modules
// ============================================================================

pub mod devtools;
pub mod error;
pub mod inspector;
pub mod session;
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

pub use devtools::{
    Command, Debugger, DevtoolsEvent, DevtoolsObject, DevtoolsResult, EventListener, IdGenerator,
    MessageSink, PendingCommand, ProcessIdGenerator, classify_response, domains,
};
pub use error::{Error, Result};
pub use inspector::{
    AppListing, DevtoolsListener, InspectorApplication, InspectorMessage, InspectorMessenger,
    InspectorPage, InspectorSink, InspectorStream, PageTarget,
};
pub use session::SafariSession;
pub use transport::WebSocketSession;
