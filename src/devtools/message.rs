//! Result and event message types.
//!
//! An inbound debugger message is classified, never thrown eagerly at
//! receive time: the dispatcher stores the raw response and classification
//! happens when the caller asks for the result. Exactly two outcomes exist
//! for a response — a [`DevtoolsResult`] wrapping the success payload, or
//! [`Error::CommandFailed`] carrying the original command plus the raw
//! response. Unsolicited messages become [`DevtoolsEvent`]s.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};

use crate::devtools::command::Command;
use crate::error::{Error, Result};

// ============================================================================
// DevtoolsResult
// ============================================================================

/// The payload of a successful command response.
#[derive(Debug, Clone, PartialEq)]
pub struct DevtoolsResult {
    json: Value,
}

impl DevtoolsResult {
    fn from_response(response: &Value) -> Self {
        let json = response
            .get("result")
            .cloned()
            .unwrap_or(Value::Object(Map::new()));
        Self { json }
    }

    /// Returns the result payload.
    #[inline]
    #[must_use]
    pub fn json(&self) -> &Value {
        &self.json
    }
}

// ============================================================================
// Response Classification
// ============================================================================

/// Classifies a raw response as success or error.
///
/// A response containing an `error` key, or with `wasThrown` set true, is an
/// error outcome carrying the originating command and the raw response.
///
/// # Errors
///
/// Returns [`Error::CommandFailed`] for error-shaped responses.
pub fn classify_response(command: &Command, response: Value) -> Result<DevtoolsResult> {
    let was_thrown = response
        .get("wasThrown")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if response.get("error").is_some() || was_thrown {
        return Err(Error::command_failed(command.clone(), response));
    }
    Ok(DevtoolsResult::from_response(&response))
}

// ============================================================================
// DevtoolsEvent
// ============================================================================

/// An unsolicited notification pushed by the remote debugger.
///
/// # Format
///
/// ```json
/// {"method": "<Domain>.<event>", "params": {...}}
/// ```
///
/// `params` defaults to an empty object when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct DevtoolsEvent {
    method: String,
    params: Value,
}

impl DevtoolsEvent {
    pub(crate) fn from_json(message: &Value) -> Self {
        let method = message
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let params = message
            .get("params")
            .cloned()
            .unwrap_or(Value::Object(Map::new()));
        Self { method, params }
    }

    /// Returns the `<Domain>.<event>` method name.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the event parameters.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Returns the domain part of the method name.
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.method.split('.').next().unwrap_or_default()
    }

    /// Returns the event-name part of the method name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.method.split('.').nth(1).unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn command() -> Command {
        Command::new("Network.setCacheDisabled").with_bool("cacheDisabled", false)
    }

    #[test]
    fn test_classify_success() {
        let response = json!({"id": 77, "result": {"key1": "value1"}});
        let result = classify_response(&command(), response).expect("success");
        assert_eq!(result.json(), &json!({"key1": "value1"}));
    }

    #[test]
    fn test_classify_success_without_result_payload() {
        let response = json!({"id": 5});
        let result = classify_response(&command(), response).expect("success");
        assert_eq!(result.json(), &json!({}));
    }

    #[test]
    fn test_classify_error_marker() {
        let response = json!({"id": 77, "error": {}});
        let err = classify_response(&command(), response.clone()).unwrap_err();
        match err {
            Error::CommandFailed {
                command: failed,
                response: raw,
            } => {
                assert_eq!(failed, command());
                assert_eq!(raw, response);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_was_thrown() {
        let response = json!({"id": 77, "wasThrown": true});
        let err = classify_response(&command(), response.clone()).unwrap_err();
        match err {
            Error::CommandFailed { response: raw, .. } => assert_eq!(raw, response),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_was_thrown_false_is_success() {
        let response = json!({"id": 77, "wasThrown": false, "result": {"value": 1}});
        let result = classify_response(&command(), response).expect("success");
        assert_eq!(result.json(), &json!({"value": 1}));
    }

    #[test]
    fn test_event_accessors() {
        let event = DevtoolsEvent::from_json(&json!({
            "method": "Page.loadEventFired",
            "params": {"timestamp": 12.5},
        }));
        assert_eq!(event.method(), "Page.loadEventFired");
        assert_eq!(event.domain(), "Page");
        assert_eq!(event.name(), "loadEventFired");
        assert_eq!(event.params(), &json!({"timestamp": 12.5}));
    }

    #[test]
    fn test_event_params_default_to_empty_object() {
        let event = DevtoolsEvent::from_json(&json!({"method": "Page.frameDetached"}));
        assert_eq!(event.params(), &json!({}));
    }
}
