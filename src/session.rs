//! Safari debugging session: a [`Debugger`] riding the inspector channel.
//!
//! The [`InspectorMessenger`] moves opaque devtools payloads between this
//! client and the attached page; the [`Debugger`] gives those payloads
//! request/response semantics. [`SafariSession`] wires the two together:
//! outbound commands are wrapped in `ForwardSocketData` envelopes, and
//! unwrapped `ApplicationSentData` payloads feed the dispatcher.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::devtools::command::Command;
use crate::devtools::debugger::{Debugger, EventListener, MessageSink, PendingCommand};
use crate::devtools::message::DevtoolsResult;
use crate::error::Result;
use crate::inspector::message::InspectorPage;
use crate::inspector::messenger::{AppListing, InspectorMessenger, InspectorSink, InspectorStream};

// ============================================================================
// MessengerSink
// ============================================================================

/// Adapts the messenger's data channel to the debugger's sink seam.
struct MessengerSink {
    messenger: Arc<InspectorMessenger>,
}

#[async_trait]
impl MessageSink for MessengerSink {
    async fn send_message(&self, message: Value) -> Result<()> {
        self.messenger.send_command(message).await
    }
}

// ============================================================================
// SafariSession
// ============================================================================

/// One debugging session against a Safari instance behind the Web Inspector.
pub struct SafariSession {
    messenger: Arc<InspectorMessenger>,
    debugger: Arc<Debugger>,
}

impl SafariSession {
    /// Builds a session over the two halves of an inspector channel.
    ///
    /// The messenger's devtools listener is registered here, before any
    /// command can be sent, so no inbound payload ever arrives unobserved.
    #[must_use]
    pub fn new(sink: Arc<dyn InspectorSink>, stream: Box<dyn InspectorStream>) -> Self {
        let messenger = Arc::new(InspectorMessenger::new(sink, stream));
        let debugger = Arc::new(Debugger::new(Arc::new(MessengerSink {
            messenger: Arc::clone(&messenger),
        })));
        let dispatcher = Arc::clone(&debugger);
        messenger.set_event_listener(Arc::new(move |payload| dispatcher.on_message(payload)));
        Self {
            messenger,
            debugger,
        }
    }

    /// Announces this connection to the inspector service.
    pub async fn connect(&self) -> Result<()> {
        self.messenger.send_connect().await
    }

    /// Routes devtools traffic to the given (application, page) pair.
    ///
    /// Returns `false` when that pair was already active.
    pub async fn switch_to(&self, app_id: &str, page_id: u32) -> Result<bool> {
        self.messenger.send_switch_to(app_id, page_id).await
    }

    /// Switches to another page of the active application.
    pub async fn switch_to_page(&self, page_id: u32) -> Result<bool> {
        self.messenger.send_switch_to_page(page_id).await
    }

    /// Requests a fresh page listing for the active application.
    pub async fn list_pages(&self) -> Result<()> {
        self.messenger.send_list_pages().await
    }

    /// Waits until the active application's page listing is on hand.
    pub async fn await_pages(&self) -> Result<Vec<InspectorPage>> {
        self.messenger.await_pages().await
    }

    /// Waits for the listings of every application hosted by the
    /// application with the given bundle id.
    pub async fn await_all_app_listings(&self, host_bundle_id: &str) -> Result<Vec<AppListing>> {
        self.messenger.await_all_app_listings(host_bundle_id).await
    }

    /// Returns the page id of the active target, if any.
    pub async fn active_page_id(&self) -> Option<u32> {
        self.messenger.active_page_id().await
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

    /// Closes the session.
    ///
    /// Every in-flight command wakes with a connection error, then the
    /// inspector channel shuts down. Idempotent.
    pub async fn close(&self) -> Result<()> {
        self.debugger.abort_pending();
        self.messenger.close().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use serde_json::json;
    use tokio::sync::mpsc;

    use crate::devtools::domains::{network, page};
    use crate::error::Error;
    use crate::inspector::message::InspectorMessage;

    struct RecordingSink {
        sent: Mutex<Vec<InspectorMessage>>,
    }

    #[async_trait]
    impl InspectorSink for RecordingSink {
        async fn send_message(&self, message: InspectorMessage) -> Result<()> {
            self.sent.lock().push(message);
            Ok(())
        }
    }

    struct ChannelStream(mpsc::UnboundedReceiver<Value>);

    #[async_trait]
    impl InspectorStream for ChannelStream {
        async fn receive_message(&mut self) -> Result<Option<Value>> {
            Ok(self.0.recv().await)
        }
    }

    fn session() -> (
        Arc<SafariSession>,
        Arc<RecordingSink>,
        mpsc::UnboundedSender<Value>,
    ) {
        let sink = Arc::new(RecordingSink {
            sent: Mutex::new(Vec::new()),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Arc::new(SafariSession::new(
            Arc::clone(&sink) as Arc<dyn InspectorSink>,
            Box::new(ChannelStream(rx)),
        ));
        (session, sink, tx)
    }

    /// Waits for a devtools payload to appear in the sink and returns it
    /// with its assigned command id.
    async fn sent_command(sink: &RecordingSink) -> (u64, Value) {
        loop {
            let found = sink.sent.lock().iter().rev().find_map(|m| match m {
                InspectorMessage::ForwardSocketData { socket_data, .. } => {
                    socket_data.get("id").and_then(Value::as_u64).map(|id| (id, socket_data.clone()))
                }
                _ => None,
            });
            if let Some(found) = found {
                return found;
            }
            tokio::task::yield_now().await;
        }
    }

    fn sent_data(payload: Value) -> Value {
        InspectorMessage::ApplicationSentData {
            application_id: "PID:1".to_string(),
            message_data: payload,
            destination: None,
        }
        .to_json()
        .expect("serialize")
    }

    #[tokio::test]
    async fn test_connect_reports_identifier() {
        let (session, sink, _tx) = session();
        session.connect().await.expect("connect");
        assert!(matches!(
            sink.sent.lock().as_slice(),
            [InspectorMessage::ReportIdentifier { .. }]
        ));
    }

    #[tokio::test]
    async fn test_command_round_trip_through_inspector_channel() {
        let (session, sink, tx) = session();
        session.switch_to("PID:1", 1).await.expect("switch");

        let sender = Arc::clone(&session);
        let task = tokio::spawn(async move {
            sender
                .send(&network::enable(), Duration::from_secs(5))
                .await
        });

        let (id, wrapped) = sent_command(&sink).await;
        assert_eq!(wrapped["method"], json!("Network.enable"));
        tx.send(sent_data(json!({"id": id, "result": {"ok": true}})))
            .expect("inject");

        let result = task.await.expect("join").expect("result");
        assert_eq!(result.json(), &json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_error_response_carries_command() {
        let (session, sink, tx) = session();
        session.switch_to("PID:1", 1).await.expect("switch");

        let sender = Arc::clone(&session);
        let command = page::navigate("https://example.com");
        let command_clone = command.clone();
        let task = tokio::spawn(async move {
            sender.send(&command_clone, Duration::from_secs(5)).await
        });

        let (id, _) = sent_command(&sink).await;
        tx.send(sent_data(json!({"id": id, "error": {"message": "nope"}})))
            .expect("inject");

        let err = task.await.expect("join").expect_err("failure");
        match err {
            Error::CommandFailed { command: failed, .. } => assert_eq!(failed, command),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_events_reach_session_listeners() {
        let (session, _sink, tx) = session();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&observed);
        session.add_event_listener(Arc::new(move |event| {
            recorder.lock().push(event.method().to_string());
        }));

        tx.send(sent_data(json!({
            "method": "Page.loadEventFired",
            "params": {"timestamp": 1.0},
        })))
        .expect("inject");

        while observed.lock().is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(*observed.lock(), vec!["Page.loadEventFired".to_string()]);
    }

    #[tokio::test]
    async fn test_close_aborts_in_flight_commands() {
        let (session, _sink, _tx) = session();
        session.switch_to("PID:1", 1).await.expect("switch");

        let sender = Arc::clone(&session);
        let task = tokio::spawn(async move {
            sender
                .send(&network::enable(), Duration::from_secs(30))
                .await
        });
        while session.pending_count() == 0 {
            tokio::task::yield_now().await;
        }

        session.close().await.expect("close");
        let err = task.await.expect("join").expect_err("aborted");
        assert!(matches!(err, Error::ConnectionClosed));
        assert_eq!(session.pending_count(), 0);
    }
}
