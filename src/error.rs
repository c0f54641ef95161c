//! Error types for the Safari WebDriver bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use safari_webdriver::{Result, SafariSession, domains};
//! use std::time::Duration;
//!
//! async fn example(session: &SafariSession) -> Result<()> {
//!     let cmd = domains::page::navigate("https://example.com");
//!     session.send(&cmd, Duration::from_secs(30)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Transport | [`Error::Transport`], [`Error::ConnectionClosed`], [`Error::WebSocket`] |
//! | Command | [`Error::CommandTimeout`], [`Error::CommandFailed`] |
//! | Protocol | [`Error::ProtocolViolation`], [`Error::ReceiveLoop`] |
//! | Session | [`Error::NoActiveTarget`], [`Error::NoDevtoolsListener`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::devtools::command::Command;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Transport submission failure.
    ///
    /// Returned when a message cannot be handed to the underlying transport.
    /// Fatal to that one request only; nothing is retried.
    #[error("Transport failure: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// Connection closed while a request was in flight.
    ///
    /// Returned to callers whose pending commands were abandoned because the
    /// session or transport went away.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Command Errors
    // ========================================================================
    /// Command response not received within the timeout.
    ///
    /// The pending entry is removed before this is returned, so a late
    /// response is silently dropped.
    #[error("Command {id} timed out after {timeout_ms}ms")]
    CommandTimeout {
        /// The assigned command id that timed out.
        id: u64,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The remote debugger answered with an error response.
    ///
    /// Carries the originating command and the raw response for diagnostics.
    /// Raised when the response contains an `error` key or `wasThrown: true`.
    #[error("Command {} returned an error response", command.method())]
    CommandFailed {
        /// The command that caused the error.
        command: Command,
        /// The raw error response as received.
        response: Value,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The remote side violated an invariant of the inspector protocol.
    ///
    /// Fatal to the receive loop: the model of the remote protocol is wrong,
    /// so processing stops rather than guessing.
    #[error("Protocol violation: {message}")]
    ProtocolViolation {
        /// Description of the violated invariant.
        message: String,
    },

    /// The inspector receive loop terminated prematurely.
    ///
    /// Surfaced to waiters of blocking operations and to [`close`] callers
    /// after the loop died from a transport error or protocol violation.
    ///
    /// [`close`]: crate::inspector::InspectorMessenger::close
    #[error("Inspector receive loop terminated: {message}")]
    ReceiveLoop {
        /// The failure that stopped the loop.
        message: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// No (application, page) target has been selected yet.
    ///
    /// Returned by operations that route through the active target.
    #[error("No active page target")]
    NoActiveTarget,

    /// No devtools listener registered to receive forwarded data.
    ///
    /// Returned by `send_command` when nothing would observe the reply.
    #[error("No devtools listener registered")]
    NoDevtoolsListener,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint URL parse error.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a transport failure error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a command timeout error.
    #[inline]
    pub fn command_timeout(id: u64, timeout_ms: u64) -> Self {
        Self::CommandTimeout { id, timeout_ms }
    }

    /// Creates a command failure error from the command and raw response.
    #[inline]
    pub fn command_failed(command: Command, response: Value) -> Self {
        Self::CommandFailed { command, response }
    }

    /// Creates a protocol violation error.
    #[inline]
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Creates a receive loop termination error.
    #[inline]
    pub fn receive_loop(message: impl Into<String>) -> Self {
        Self::ReceiveLoop {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::CommandTimeout { .. })
    }

    /// Returns `true` if this is an error response from the remote debugger.
    #[inline]
    #[must_use]
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    /// Returns `true` if this is a protocol invariant violation.
    #[inline]
    #[must_use]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }

    /// Returns `true` if this is a transport or connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::ConnectionClosed | Self::WebSocket(_) | Self::Io(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::transport("socket write failed");
        assert_eq!(err.to_string(), "Transport failure: socket write failed");
    }

    #[test]
    fn test_command_failed_display() {
        let command = Command::new("Network.enable");
        let err = Error::command_failed(command, json!({"error": {}}));
        assert_eq!(
            err.to_string(),
            "Command Network.enable returned an error response"
        );
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::command_timeout(7, 5000);
        let other_err = Error::transport("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_protocol_violation() {
        let violation = Error::protocol_violation("unknown selector");
        let other = Error::ConnectionClosed;

        assert!(violation.is_protocol_violation());
        assert!(!other.is_protocol_violation());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::transport("test").is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::NoActiveTarget.is_connection_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
