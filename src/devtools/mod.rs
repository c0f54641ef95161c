//! Devtools protocol layer: commands, dispatch, results, and events.
//!
//! This is the request/response correlation engine of the crate. Callers
//! build a [`Command`], hand it to the [`Debugger`], and get back either a
//! [`DevtoolsResult`] or a typed error; unsolicited [`DevtoolsEvent`]s fan
//! out to registered listeners.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`command`] | Command and parameter-object value types |
//! | [`debugger`] | Id assignment, pending table, event fan-out |
//! | [`domains`] | Per-domain command builder functions |
//! | [`message`] | Result wrapping, event parsing, response classification |

// ============================================================================
// Submodules
// ============================================================================

/// Command and parameter-object value types.
pub mod command;

/// Command dispatcher over a message transport.
pub mod debugger;

/// Per-domain command builders.
pub mod domains;

/// Result and event message types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, DevtoolsObject};
pub use debugger::{
    Debugger, EventListener, IdGenerator, MessageSink, PendingCommand, ProcessIdGenerator,
};
pub use message::{DevtoolsEvent, DevtoolsResult, classify_response};
