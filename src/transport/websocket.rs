//! WebSocket-backed debugging session.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use url::Url;

use crate::devtools::command::Command;
use crate::devtools::debugger::{Debugger, EventListener, MessageSink, PendingCommand};
use crate::devtools::message::DevtoolsResult;
use crate::error::Result;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// WsSink
// ============================================================================

/// Write half of the socket, shared by concurrent senders.
struct WsSink {
    writer: AsyncMutex<SplitSink<WsStream, Message>>,
}

#[async_trait]
impl MessageSink for WsSink {
    async fn send_message(&self, message: Value) -> Result<()> {
        let text = serde_json::to_string(&message)?;
        self.writer.lock().await.send(Message::text(text)).await?;
        Ok(())
    }
}

// ============================================================================
// WebSocketSession
// ============================================================================

/// A debugging session over a devtools WebSocket endpoint.
pub struct WebSocketSession {
    debugger: Arc<Debugger>,
    sink: Arc<WsSink>,
    read_task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl WebSocketSession {
    /// Connects to a `ws://` devtools endpoint and starts reading from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`](crate::Error::Url) for an unparseable endpoint
    /// and [`Error::WebSocket`](crate::Error::WebSocket) if the handshake
    /// fails.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)?;
        let (stream, _response) = connect_async(url.as_str()).await?;
        debug!(%url, "WebSocket connected");

        let (writer, reader) = stream.split();
        let sink = Arc::new(WsSink {
            writer: AsyncMutex::new(writer),
        });
        let debugger = Arc::new(Debugger::new(Arc::clone(&sink) as Arc<dyn MessageSink>));
        let read_task = tokio::spawn(read_loop(reader, Arc::clone(&debugger)));
        Ok(Self {
            debugger,
            sink,
            read_task: Mutex::new(Some(read_task)),
            closed: AtomicBool::new(false),
        })
    }

    /// Sends a devtools command and waits for its classified result.
    pub async fn send(&self, command: &Command, timeout: Duration) -> Result<DevtoolsResult> {
        self.debugger.send(command, timeout).await
    }

    /// Sends a devtools command without waiting for its response.
    pub async fn send_async(&self, command: &Command) -> Result<PendingCommand> {
        self.debugger.send_async(command).await
    }

    /// Registers a listener for unsolicited devtools events.
    pub fn add_event_listener(&self, listener: EventListener) {
        self.debugger.add_event_listener(listener);
    }

    /// Returns the number of in-flight commands.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.debugger.pending_count()
    }

    /// Closes the socket and abandons every in-flight command. Idempotent.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let task = self.read_task.lock().take();
        if let Some(task) = task {
            task.abort();
            let _ = task.await;
        }
        // Best effort; the peer may already be gone.
        let _ = self
            .sink
            .writer
            .lock()
            .await
            .send(Message::Close(None))
            .await;
        self.debugger.abort_pending();
        Ok(())
    }
}

impl Drop for WebSocketSession {
    fn drop(&mut self) {
        if let Some(task) = self.read_task.lock().take() {
            task.abort();
        }
    }
}

// ============================================================================
// Read loop
// ============================================================================

/// Feeds inbound frames to the dispatcher until the socket goes away, then
/// wakes every in-flight command with a connection error.
async fn read_loop(mut reader: SplitStream<WsStream>, debugger: Arc<Debugger>) {
    while let Some(frame) = reader.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(message) => debugger.on_message(message),
                Err(e) => warn!(error = %e, "Dropping unparseable frame"),
            },
            Ok(Message::Close(_)) => {
                debug!("WebSocket closed by peer");
                break;
            }
            // Pings are answered by the protocol layer.
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "WebSocket read failed");
                break;
            }
        }
    }
    debugger.abort_pending();
}

// ============================================================================
// Tests
// ============================================================================
