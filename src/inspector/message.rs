//! Web Inspector wire message model.
//!
//! The iOS Web Inspector service multiplexes devtools traffic for every
//! debuggable application over one channel. Its messages are dictionaries
//! with an Objective-C selector name (`_rpc_*`) and an argument dictionary
//! whose keys carry a `WIR` prefix. This module models them as one serde
//! enum tagged by selector, so the receive loop can match on message kind
//! directly.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Applications and pages
// ============================================================================

/// A debuggable application reported by the inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorApplication {
    /// Per-boot application identifier, e.g. `PID:1234`.
    #[serde(rename = "WIRApplicationIdentifierKey")]
    pub application_id: String,
    /// Stable bundle identifier, e.g. `com.apple.mobilesafari`.
    #[serde(rename = "WIRApplicationBundleIdentifierKey")]
    pub bundle_id: String,
    #[serde(rename = "WIRApplicationNameKey")]
    pub name: String,
    #[serde(rename = "WIRIsApplicationActiveKey", default)]
    pub is_active: bool,
    #[serde(rename = "WIRIsApplicationProxyKey", default)]
    pub is_proxy: bool,
    /// Set on web-content child processes; names the application id of the
    /// host application they render for.
    #[serde(
        rename = "WIRHostApplicationIdentifierKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub host_application_id: Option<String>,
}

/// A debuggable page within an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorPage {
    #[serde(rename = "WIRPageIdentifierKey")]
    pub page_id: u32,
    #[serde(rename = "WIRTitleKey", default)]
    pub title: String,
    #[serde(rename = "WIRTypeKey", default)]
    pub page_type: String,
    #[serde(rename = "WIRURLKey", default)]
    pub url: String,
}

// ============================================================================
// InspectorMessage
// ============================================================================

/// One message on the Web Inspector channel, in either direction.
///
/// Serialized form is `{"__selector": "_rpc_...", "__argument": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__selector", content = "__argument")]
pub enum InspectorMessage {
    /// Announces this connection to the inspector service.
    #[serde(rename = "_rpc_reportIdentifier:")]
    ReportIdentifier {
        #[serde(rename = "WIRConnectionIdentifierKey")]
        connection_id: String,
    },

    /// Attaches the connection to one page of one application.
    #[serde(rename = "_rpc_forwardSocketSetup:")]
    ForwardSocketSetup {
        #[serde(rename = "WIRApplicationIdentifierKey")]
        application_id: String,
        #[serde(rename = "WIRConnectionIdentifierKey")]
        connection_id: String,
        #[serde(rename = "WIRPageIdentifierKey")]
        page_id: u32,
        #[serde(rename = "WIRSenderKey")]
        sender: String,
        #[serde(rename = "WIRAutomaticallyPause")]
        automatically_pause: bool,
    },

    /// Requests a fresh page listing for an application.
    #[serde(rename = "_rpc_forwardGetListing:")]
    ForwardGetListing {
        #[serde(rename = "WIRApplicationIdentifierKey")]
        application_id: String,
        #[serde(rename = "WIRConnectionIdentifierKey")]
        connection_id: String,
    },

    /// Carries one devtools command to the attached page.
    #[serde(rename = "_rpc_forwardSocketData:")]
    ForwardSocketData {
        #[serde(rename = "WIRApplicationIdentifierKey")]
        application_id: String,
        #[serde(rename = "WIRConnectionIdentifierKey")]
        connection_id: String,
        #[serde(rename = "WIRPageIdentifierKey")]
        page_id: u32,
        #[serde(rename = "WIRSenderKey")]
        sender: String,
        #[serde(rename = "WIRSocketDataKey")]
        socket_data: Value,
    },

    #[serde(rename = "_rpc_applicationConnected:")]
    ApplicationConnected(InspectorApplication),

    #[serde(rename = "_rpc_applicationUpdated:")]
    ApplicationUpdated(InspectorApplication),

    #[serde(rename = "_rpc_applicationDisconnected:")]
    ApplicationDisconnected(InspectorApplication),

    /// Carries one devtools response or event from the attached page.
    #[serde(rename = "_rpc_applicationSentData:")]
    ApplicationSentData {
        #[serde(rename = "WIRApplicationIdentifierKey")]
        application_id: String,
        #[serde(rename = "WIRMessageDataKey")]
        message_data: Value,
        #[serde(
            rename = "WIRDestinationKey",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        destination: Option<String>,
    },

    /// A page listing, keyed by page identifier.
    #[serde(rename = "_rpc_applicationSentListing:")]
    ApplicationSentListing {
        #[serde(rename = "WIRApplicationIdentifierKey")]
        application_id: String,
        #[serde(rename = "WIRListingKey")]
        listing: BTreeMap<String, InspectorPage>,
    },

    /// The application roster, keyed by application identifier.
    #[serde(rename = "_rpc_reportConnectedApplicationList:")]
    ReportConnectedApplicationList {
        #[serde(rename = "WIRApplicationDictionaryKey")]
        application_dictionary: BTreeMap<String, InspectorApplication>,
    },

    /// The remote-automation driver roster. Observed empty in practice.
    #[serde(rename = "_rpc_reportConnectedDriverList:")]
    ReportConnectedDriverList {
        #[serde(rename = "WIRDriverDictionaryKey")]
        driver_dictionary: BTreeMap<String, Value>,
    },

    /// Connection-setup acknowledgement. Payload is ignored.
    #[serde(rename = "_rpc_reportSetup:")]
    ReportSetup(Value),
}

impl InspectorMessage {
    /// Parses an inbound inspector message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] for an unrecognized selector or
    /// a malformed argument dictionary.
    pub fn from_json(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| {
            let selector = value
                .get("__selector")
                .and_then(Value::as_str)
                .unwrap_or("<missing>");
            Error::protocol_violation(format!(
                "unparseable inspector message with selector {selector}: {e}"
            ))
        })
    }

    /// Serializes this message for the wire.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
