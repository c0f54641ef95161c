//! Session multiplexer over the Web Inspector channel.
//!
//! The inspector shares one channel between every debuggable application on
//! the device. [`InspectorMessenger`] tracks which applications exist, which
//! page listings have arrived, and which (application, page) pair devtools
//! traffic currently targets. A single receive loop applies inbound messages
//! to that state in arrival order; callers block on [`await_pages`] or
//! [`await_all_app_listings`] until the state they need has materialized.
//!
//! [`await_pages`]: InspectorMessenger::await_pages
//! [`await_all_app_listings`]: InspectorMessenger::await_all_app_listings

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::inspector::message::{InspectorApplication, InspectorMessage, InspectorPage};

// ============================================================================
// Transport seams
// ============================================================================

/// Write half of the inspector channel. Shared by every sender.
#[async_trait]
pub trait InspectorSink: Send + Sync {
    async fn send_message(&self, message: InspectorMessage) -> Result<()>;
}

/// Read half of the inspector channel. Owned by the receive loop.
///
/// `Ok(None)` means the transport reached end of stream.
#[async_trait]
pub trait InspectorStream: Send {
    async fn receive_message(&mut self) -> Result<Option<Value>>;
}

/// Receives the devtools payloads the attached page sends back.
pub type DevtoolsListener = Arc<dyn Fn(Value) + Send + Sync>;

// ============================================================================
// State types
// ============================================================================

/// An application paired with its page listing.
///
/// `listing` is `None` until the application's first listing arrives, and
/// again after [`InspectorMessenger::send_list_pages`] invalidates it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppListing {
    pub app: InspectorApplication,
    pub listing: Option<Vec<InspectorPage>>,
}

/// The (application, page) pair devtools traffic is currently routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub app_id: String,
    pub page_id: u32,
}

/// State shared between the messenger handle and its receive loop.
struct Shared {
    /// Application id to listing. Guarded by a synchronous lock; never held
    /// across an await.
    listings: Mutex<FxHashMap<String, AppListing>>,
    /// Bumped after every listings mutation so waiters re-probe.
    changed: watch::Sender<u64>,
    /// The switch path holds this lock across a transport send, so it must
    /// be the async flavor.
    active: AsyncMutex<Option<PageTarget>>,
    devtools_listener: Mutex<Option<DevtoolsListener>>,
    failure: Mutex<Option<String>>,
    loop_done: AtomicBool,
}

impl Shared {
    fn bump(&self) {
        self.changed.send_modify(|n| *n += 1);
    }

    fn insert_application(&self, app: InspectorApplication) {
        let mut listings = self.listings.lock();
        let listing = listings
            .get(&app.application_id)
            .and_then(|existing| existing.listing.clone());
        listings.insert(app.application_id.clone(), AppListing { app, listing });
        drop(listings);
        self.bump();
    }

    /// Applies one inbound message to the shared state.
    ///
    /// An error here is fatal to the receive loop: the inspector sent
    /// something this protocol model cannot account for.
    async fn handle_message(&self, message: InspectorMessage) -> Result<()> {
        match message {
            InspectorMessage::ApplicationConnected(app)
            | InspectorMessage::ApplicationUpdated(app) => {
                self.insert_application(app);
            }

            InspectorMessage::ApplicationDisconnected(app) => {
                let mut active = self.active.lock().await;
                if active
                    .as_ref()
                    .is_some_and(|target| target.app_id == app.application_id)
                {
                    *active = None;
                }
                drop(active);
                self.listings.lock().remove(&app.application_id);
                self.bump();
            }

            InspectorMessage::ApplicationSentData { message_data, .. } => {
                let listener = self.devtools_listener.lock().clone();
                match listener {
                    Some(listener) => listener(message_data),
                    None => return Err(Error::NoDevtoolsListener),
                }
            }

            InspectorMessage::ApplicationSentListing {
                application_id,
                listing,
            } => {
                let mut listings = self.listings.lock();
                let entry = listings.get_mut(&application_id).ok_or_else(|| {
                    Error::protocol_violation(format!(
                        "received listing for unknown app: {application_id}"
                    ))
                })?;
                let mut pages: Vec<InspectorPage> = listing.into_values().collect();
                pages.sort_by_key(|page| page.page_id);
                entry.listing = Some(pages);
                drop(listings);
                self.bump();
            }

            InspectorMessage::ReportConnectedApplicationList {
                application_dictionary,
            } => {
                for app in application_dictionary.into_values() {
                    self.insert_application(app);
                }
            }

            InspectorMessage::ReportConnectedDriverList { driver_dictionary } => {
                // Never observed populated; flag the first time it happens.
                if !driver_dictionary.is_empty() {
                    return Err(Error::protocol_violation(format!(
                        "unexpected connected drivers: {driver_dictionary:?}"
                    )));
                }
            }

            InspectorMessage::ReportSetup(_) => {
                trace!("connection setup acknowledged");
            }

            other => {
                return Err(Error::protocol_violation(format!(
                    "did not expect to receive message: {other:?}"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// InspectorMessenger
// ============================================================================

/// Multiplexes devtools traffic over a Web Inspector channel.
pub struct InspectorMessenger {
    sink: Arc<dyn InspectorSink>,
    connection_id: String,
    sender_id: String,
    shared: Arc<Shared>,
    receive_task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl InspectorMessenger {
    /// Creates a messenger and spawns its receive loop over `stream`.
    pub fn new(sink: Arc<dyn InspectorSink>, stream: Box<dyn InspectorStream>) -> Self {
        let (changed, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            listings: Mutex::new(FxHashMap::default()),
            changed,
            active: AsyncMutex::new(None),
            devtools_listener: Mutex::new(None),
            failure: Mutex::new(None),
            loop_done: AtomicBool::new(false),
        });
        let receive_task = tokio::spawn(receive_loop(Arc::clone(&shared), stream));
        Self {
            sink,
            connection_id: Uuid::new_v4().to_string(),
            sender_id: Uuid::new_v4().to_string(),
            shared,
            receive_task: Mutex::new(Some(receive_task)),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the connection identifier stamped on every outbound message.
    #[inline]
    #[must_use]
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Registers the listener that receives devtools payloads from the
    /// attached page. Must be set before any payload arrives.
    pub fn set_event_listener(&self, listener: DevtoolsListener) {
        *self.shared.devtools_listener.lock() = Some(listener);
    }

    /// Returns the page id of the active target, if any.
    pub async fn active_page_id(&self) -> Option<u32> {
        self.shared
            .active
            .lock()
            .await
            .as_ref()
            .map(|target| target.page_id)
    }

    /// Announces this connection to the inspector service.
    pub async fn send_connect(&self) -> Result<()> {
        self.send_message(InspectorMessage::ReportIdentifier {
            connection_id: self.connection_id.clone(),
        })
        .await
    }

    /// Routes devtools traffic to `page_id` within the active application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveTarget`] if no target is active.
    pub async fn send_switch_to_page(&self, page_id: u32) -> Result<bool> {
        let mut active = self.shared.active.lock().await;
        let app_id = active
            .as_ref()
            .ok_or(Error::NoActiveTarget)?
            .app_id
            .clone();
        self.switch_locked(&mut active, app_id, page_id).await
    }

    /// Routes devtools traffic to the given (application, page) pair.
    ///
    /// Returns `false` without sending anything when the pair is already
    /// active. Returns `true` after a setup message was sent.
    pub async fn send_switch_to(&self, app_id: &str, page_id: u32) -> Result<bool> {
        let mut active = self.shared.active.lock().await;
        self.switch_locked(&mut active, app_id.to_string(), page_id)
            .await
    }

    async fn switch_locked(
        &self,
        active: &mut Option<PageTarget>,
        app_id: String,
        page_id: u32,
    ) -> Result<bool> {
        // A ForwardSocketSetup for an already-set-up socket can make the
        // application disconnect, at least on iOS 9, so never resend one.
        if active
            .as_ref()
            .is_some_and(|target| target.app_id == app_id && target.page_id == page_id)
        {
            return Ok(false);
        }
        self.send_message(InspectorMessage::ForwardSocketSetup {
            application_id: app_id.clone(),
            connection_id: self.connection_id.clone(),
            page_id,
            sender: self.sender_id.clone(),
            automatically_pause: false,
        })
        .await?;
        *active = Some(PageTarget { app_id, page_id });
        Ok(true)
    }

    /// Invalidates the active application's listing and requests a fresh one.
    ///
    /// The stale listing is dropped before the request goes out, so
    /// [`await_pages`](Self::await_pages) afterwards observes only the reply.
    pub async fn send_list_pages(&self) -> Result<()> {
        let active = self.shared.active.lock().await;
        let app_id = active
            .as_ref()
            .ok_or(Error::NoActiveTarget)?
            .app_id
            .clone();
        {
            let mut listings = self.shared.listings.lock();
            if let Some(entry) = listings.get_mut(&app_id) {
                entry.listing = None;
            }
        }
        self.shared.bump();
        self.send_message(InspectorMessage::ForwardGetListing {
            application_id: app_id,
            connection_id: self.connection_id.clone(),
        })
        .await
    }

    /// Forwards one devtools command to the active target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveTarget`] if no target is active, or
    /// [`Error::NoDevtoolsListener`] if no listener is registered to receive
    /// the eventual response.
    pub async fn send_command(&self, command: Value) -> Result<()> {
        let active = self.shared.active.lock().await;
        let target = active.as_ref().ok_or(Error::NoActiveTarget)?.clone();
        if self.shared.devtools_listener.lock().is_none() {
            return Err(Error::NoDevtoolsListener);
        }
        self.send_message(InspectorMessage::ForwardSocketData {
            application_id: target.app_id,
            connection_id: self.connection_id.clone(),
            page_id: target.page_id,
            sender: self.sender_id.clone(),
            socket_data: command,
        })
        .await
    }

    /// Returns the active application's pages, or `None` while no listing
    /// is on hand.
    pub async fn get_pages(&self) -> Result<Option<Vec<InspectorPage>>> {
        let active = self.shared.active.lock().await;
        let app_id = &active.as_ref().ok_or(Error::NoActiveTarget)?.app_id;
        Ok(self
            .shared
            .listings
            .lock()
            .get(app_id)
            .and_then(|entry| entry.listing.clone()))
    }

    /// Returns the listings of every web-content application hosted by the
    /// application with bundle id `host_bundle_id`, once all of them have a
    /// listing on hand. `None` while any is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] if several applications claim
    /// the host bundle id.
    pub fn get_all_app_listings(&self, host_bundle_id: &str) -> Result<Option<Vec<AppListing>>> {
        let listings = self.shared.listings.lock();
        let host_app_ids: Vec<&str> = listings
            .values()
            .filter(|entry| entry.app.bundle_id == host_bundle_id)
            .map(|entry| entry.app.application_id.as_str())
            .collect();
        if host_app_ids.len() > 1 {
            return Err(Error::protocol_violation(format!(
                "multiple matching host apps: {host_app_ids:?}"
            )));
        }
        let Some(&host_app_id) = host_app_ids.first() else {
            return Ok(None);
        };
        let mut children: Vec<AppListing> = listings
            .values()
            .filter(|entry| entry.app.host_application_id.as_deref() == Some(host_app_id))
            .cloned()
            .collect();
        if children.is_empty() || children.iter().any(|child| child.listing.is_none()) {
            return Ok(None);
        }
        children.sort_by(|a, b| a.app.application_id.cmp(&b.app.application_id));
        Ok(Some(children))
    }

    /// Waits until the active application's listing is on hand.
    ///
    /// Re-probes after every state change; fails instead of hanging once
    /// the receive loop has terminated.
    pub async fn await_pages(&self) -> Result<Vec<InspectorPage>> {
        let mut rx = self.shared.changed.subscribe();
        loop {
            if let Some(pages) = self.get_pages().await? {
                return Ok(pages);
            }
            if self.shared.loop_done.load(Ordering::Acquire) {
                return Err(self.loop_failure());
            }
            if rx.changed().await.is_err() {
                return Err(self.loop_failure());
            }
        }
    }

    /// Waits until [`get_all_app_listings`](Self::get_all_app_listings)
    /// returns a value for `host_bundle_id`.
    ///
    /// Same wake/terminate discipline as [`await_pages`](Self::await_pages).
    pub async fn await_all_app_listings(&self, host_bundle_id: &str) -> Result<Vec<AppListing>> {
        let mut rx = self.shared.changed.subscribe();
        loop {
            if let Some(listings) = self.get_all_app_listings(host_bundle_id)? {
                return Ok(listings);
            }
            if self.shared.loop_done.load(Ordering::Acquire) {
                return Err(self.loop_failure());
            }
            if rx.changed().await.is_err() {
                return Err(self.loop_failure());
            }
        }
    }

    fn loop_failure(&self) -> Error {
        let failure = self.shared.failure.lock().clone();
        Error::receive_loop(
            failure.unwrap_or_else(|| "inspector receive loop terminated".to_string()),
        )
    }

    async fn send_message(&self, message: InspectorMessage) -> Result<()> {
        trace!(?message, "inspector message sent");
        self.sink.send_message(message).await
    }

    /// Stops the receive loop. Idempotent.
    ///
    /// Aborting the loop cancels it mid-await, so the termination marker is
    /// stored here as well; every blocked waiter wakes with an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReceiveLoop`] if the loop had already failed before
    /// this call, carrying the recorded failure.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let task = self.receive_task.lock().take();
        if let Some(task) = task {
            task.abort();
            let _ = task.await;
        }
        let failure = self.shared.failure.lock().clone();
        self.shared.loop_done.store(true, Ordering::Release);
        self.shared.bump();
        match failure {
            Some(failure) => Err(Error::receive_loop(failure)),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    pub(crate) async fn handle_message(&self, message: InspectorMessage) -> Result<()> {
        self.shared.handle_message(message).await
    }

    #[cfg(test)]
    pub(crate) fn loop_finished(&self) -> bool {
        self.shared.loop_done.load(Ordering::Acquire)
    }
}

impl Drop for InspectorMessenger {
    fn drop(&mut self) {
        if let Some(task) = self.receive_task.lock().take() {
            task.abort();
        }
        self.shared.loop_done.store(true, Ordering::Release);
        self.shared.bump();
    }
}

// ============================================================================
// Receive loop
// ============================================================================

/// Applies inbound messages to the shared state, strictly in arrival order.
async fn receive_loop(shared: Arc<Shared>, mut stream: Box<dyn InspectorStream>) {
    loop {
        match stream.receive_message().await {
            Ok(Some(value)) => {
                let outcome = match InspectorMessage::from_json(&value) {
                    Ok(message) => {
                        trace!(?message, "inspector message received");
                        shared.handle_message(message).await
                    }
                    Err(e) => Err(e),
                };
                if let Err(e) = outcome {
                    error!(error = %e, "inspector receive loop failed");
                    *shared.failure.lock() = Some(e.to_string());
                    break;
                }
            }
            Ok(None) => {
                warn!("web inspector closed unexpectedly");
                *shared.failure.lock() = Some("web inspector closed unexpectedly".to_string());
                break;
            }
            Err(e) => {
                error!(error = %e, "inspector receive failed");
                *shared.failure.lock() = Some(e.to_string());
                break;
            }
        }
    }
    shared.loop_done.store(true, Ordering::Release);
    // Final bump so every waiter re-probes and observes the termination.
    shared.bump();
    debug!("inspector receive loop terminated");
}

// ============================================================================
// Tests
// ============================================================================
