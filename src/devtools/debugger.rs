//! Command dispatcher for a devtools remote debugger.
//!
//! Turns a send-only message transport into a request/response API with
//! timeouts and typed errors, plus a fan-out channel for unsolicited events.
//!
//! # Correlation
//!
//! Every outbound command gets a fresh integer id from an [`IdGenerator`]
//! and a single-use [`oneshot`] slot registered in an id-keyed table.
//! Registration happens before transport submission, so a response can never
//! be lost between registration and delivery, and events flow through
//! without blocking command callers.
//!
//! Commands are never retried: protocol commands are not assumed idempotent.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::devtools::command::Command;
use crate::devtools::message::{DevtoolsEvent, DevtoolsResult, classify_response};
use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Map of command ids to response slots.
type PendingMap = FxHashMap<u64, oneshot::Sender<Value>>;

/// Event listener callback type.
///
/// Invoked for every unsolicited event, in registration order, on the task
/// delivering the message. A slow listener stalls further event and response
/// processing, so listeners must not block.
pub type EventListener = Arc<dyn Fn(&DevtoolsEvent) + Send + Sync>;

// ============================================================================
// IdGenerator
// ============================================================================

/// Source of command ids, injectable for deterministic tests.
pub trait IdGenerator: Send + Sync {
    /// Returns the next command id.
    fn next_id(&self) -> u64;
}

/// Default id source: a process-wide monotonic counter starting at 0.
///
/// Process-wide so that several debuggers sharing one transport never issue
/// colliding ids.
#[derive(Debug, Default)]
pub struct ProcessIdGenerator;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

impl IdGenerator for ProcessIdGenerator {
    fn next_id(&self) -> u64 {
        NEXT_ID.fetch_add(1, Ordering::Relaxed)
    }
}

// ============================================================================
// MessageSink
// ============================================================================

/// Outbound half of the debugger transport.
///
/// Implementations hand a structured payload to the wire; failures are
/// surfaced synchronously to the sender and affect that one request only.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Submits one message to the transport.
    async fn send_message(&self, message: Value) -> Result<()>;
}

// ============================================================================
// PendingCommand
// ============================================================================

/// Handle for one in-flight command.
///
/// Created at send time; fulfilled exactly once when the matching response
/// arrives, or abandoned on timeout or send failure. Never reused.
#[derive(Debug)]
pub struct PendingCommand {
    pub(crate) id: u64,
    pub(crate) response: oneshot::Receiver<Value>,
}

impl PendingCommand {
    /// Returns the assigned command id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the dispatcher abandoned this
    /// command before a response arrived.
    pub async fn response(self) -> Result<Value> {
        self.response.await.map_err(|_| Error::ConnectionClosed)
    }
}

// ============================================================================
// Debugger
// ============================================================================

/// Request/response dispatcher over a fire-and-forget message transport.
///
/// # Thread Safety
///
/// `Debugger` is `Send + Sync`; `send` may be called concurrently from any
/// number of tasks. [`on_message`](Debugger::on_message) must be invoked by
/// a single delivering task so messages are processed in arrival order.
pub struct Debugger {
    sink: Arc<dyn MessageSink>,
    ids: Arc<dyn IdGenerator>,
    pending: Mutex<PendingMap>,
    // Append-only; listeners are never removed.
    listeners: RwLock<Vec<EventListener>>,
}

impl Debugger {
    /// Creates a debugger over the given sink with the default id source.
    #[must_use]
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self::with_id_generator(sink, Arc::new(ProcessIdGenerator))
    }

    /// Creates a debugger with an injected id source.
    #[must_use]
    pub fn with_id_generator(sink: Arc<dyn MessageSink>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            sink,
            ids,
            pending: Mutex::new(PendingMap::default()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Sends a command without waiting for its response.
    ///
    /// The pending entry is registered before the message is handed to the
    /// transport; if submission fails the entry is removed and the failure
    /// propagates to the caller. No retry.
    ///
    /// # Errors
    ///
    /// Propagates the transport submission failure.
    pub async fn send_async(&self, command: &Command) -> Result<PendingCommand> {
        let id = self.ids.next_id();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        let message = command.to_message(id);
        if let Err(e) = self.sink.send_message(message).await {
            self.pending.lock().remove(&id);
            return Err(e);
        }

        trace!(id, method = command.method(), "Command sent");
        Ok(PendingCommand { id, response: rx })
    }

    /// Sends a command and waits up to `command_timeout` for its response.
    ///
    /// On timeout the stale pending entry is removed before the error
    /// propagates, so a late response cannot leak to any caller.
    ///
    /// # Errors
    ///
    /// - transport submission failure, propagated from [`send_async`](Debugger::send_async)
    /// - [`Error::CommandTimeout`] if no response arrives in time
    /// - [`Error::CommandFailed`] if the response carries an error marker or
    ///   `wasThrown: true`
    /// - [`Error::ConnectionClosed`] if the session died while waiting
    pub async fn send(&self, command: &Command, command_timeout: Duration) -> Result<DevtoolsResult> {
        let pending = self.send_async(command).await?;
        let id = pending.id;

        match timeout(command_timeout, pending.response).await {
            Ok(Ok(response)) => classify_response(command, response),
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                debug!(id, "Removed timed-out command");
                Err(Error::command_timeout(
                    id,
                    u64::try_from(command_timeout.as_millis()).unwrap_or(u64::MAX),
                ))
            }
        }
    }

    /// Delivery callback for every inbound transport message.
    ///
    /// A message with an `id` fulfills the matching pending command (the
    /// raw message, whatever its shape — classification happens in `send`).
    /// A message with a `method` fans out to every listener in registration
    /// order on the calling task. Anything else is silently dropped: the
    /// remote side emits occasional messages outside the defined protocol.
    pub fn on_message(&self, message: Value) {
        if let Some(id) = message.get("id").and_then(Value::as_u64) {
            let tx = self.pending.lock().remove(&id);
            match tx {
                Some(tx) => {
                    let _ = tx.send(message);
                }
                None => trace!(id, "Response for unknown or abandoned command"),
            }
        } else if message.get("method").is_some() {
            let event = DevtoolsEvent::from_json(&message);
            let listeners = self.listeners.read().clone();
            for listener in &listeners {
                listener(&event);
            }
        } else {
            trace!("Dropping unidentifiable inbound message");
        }
    }

    /// Registers an event listener; safe to call from any thread.
    pub fn add_event_listener(&self, listener: EventListener) {
        self.listeners.write().push(listener);
    }

    /// Returns the number of in-flight commands.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Abandons every in-flight command.
    ///
    /// Each waiter wakes with [`Error::ConnectionClosed`]. Called when the
    /// session dies so that no caller hangs forever.
    pub fn abort_pending(&self) {
        let abandoned: Vec<_> = self.pending.lock().drain().collect();
        if !abandoned.is_empty() {
            debug!(count = abandoned.len(), "Abandoned pending commands");
        }
        // Dropping the senders wakes the receivers with a recv error.
    }
}

// ============================================================================
// Tests
// ============================================================================
