//! Transports for directly-debuggable targets.
//!
//! Desktop-style targets expose their devtools socket as a plain WebSocket
//! endpoint, with no inspector multiplexer in between. [`WebSocketSession`]
//! drives a [`Debugger`](crate::devtools::Debugger) straight over that
//! socket.

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket-backed debugging session.
pub mod websocket;

// ============================================================================
// Re-exports
// ============================================================================

pub use websocket::WebSocketSession;
