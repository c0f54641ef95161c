//! Command and parameter-object value types.
//!
//! A [`Command`] is a (method name, parameter mapping) pair. There is no
//! per-command type hierarchy: every devtools command is structurally
//! identical, so one data-driven value type covers them all and the
//! [`domains`](crate::devtools::domains) modules provide plain builder
//! functions per protocol domain.
//!
//! Builder methods take `self` and return a fresh value; `Command` is
//! `Clone`, so a partially-built command can be kept and extended along
//! several paths:
//!
//! ```
//! use safari_webdriver::Command;
//!
//! let base = Command::new("Network.enable");
//! let sized = base.clone().with_i64("maxTotalBufferSize", 1 << 20);
//! assert_ne!(base, sized);
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

// ============================================================================
// Command
// ============================================================================

/// A command message in the devtools protocol.
///
/// Equality is structural over the method name and parameter mapping
/// (parameter order is irrelevant).
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    method: String,
    params: Map<String, Value>,
}

impl Command {
    /// Creates a command with no parameters.
    #[inline]
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Map::new(),
        }
    }

    /// Returns the `<Domain>.<action>` method name.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the parameter mapping.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    fn insert(mut self, name: &str, value: Value) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    /// Adds a boolean parameter.
    #[inline]
    #[must_use]
    pub fn with_bool(self, name: &str, value: bool) -> Self {
        self.insert(name, Value::Bool(value))
    }

    /// Adds an integer parameter.
    #[inline]
    #[must_use]
    pub fn with_i64(self, name: &str, value: i64) -> Self {
        self.insert(name, json!(value))
    }

    /// Adds a floating-point parameter.
    #[inline]
    #[must_use]
    pub fn with_f64(self, name: &str, value: f64) -> Self {
        self.insert(name, json!(value))
    }

    /// Adds a string parameter.
    #[inline]
    #[must_use]
    pub fn with_str(self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, Value::String(value.into()))
    }

    /// Adds a nested object parameter.
    #[inline]
    #[must_use]
    pub fn with_object(self, name: &str, value: DevtoolsObject) -> Self {
        self.insert(name, value.into_value())
    }

    /// Adds a homogeneous number-array parameter.
    #[must_use]
    pub fn with_number_array(self, name: &str, values: impl IntoIterator<Item = i64>) -> Self {
        let array = values.into_iter().map(|n| json!(n)).collect();
        self.insert(name, Value::Array(array))
    }

    /// Adds a homogeneous string-array parameter.
    #[must_use]
    pub fn with_string_array<S: Into<String>>(
        self,
        name: &str,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let array = values
            .into_iter()
            .map(|s| Value::String(s.into()))
            .collect();
        self.insert(name, Value::Array(array))
    }

    /// Adds a homogeneous object-array parameter.
    #[must_use]
    pub fn with_object_array(
        self,
        name: &str,
        values: impl IntoIterator<Item = DevtoolsObject>,
    ) -> Self {
        let array = values.into_iter().map(DevtoolsObject::into_value).collect();
        self.insert(name, Value::Array(array))
    }

    /// Converts this command into a wire message carrying the given id.
    ///
    /// The `params` key is omitted entirely when there are no parameters:
    /// `{"method": "<Domain>.<action>", "params": {...}, "id": <int>}`.
    #[must_use]
    pub fn to_message(&self, id: u64) -> Value {
        let mut message = Map::new();
        message.insert("method".to_string(), Value::String(self.method.clone()));
        if !self.params.is_empty() {
            message.insert("params".to_string(), Value::Object(self.params.clone()));
        }
        message.insert("id".to_string(), json!(id));
        Value::Object(message)
    }

    /// Parses a wire message back into its id and command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] if the message lacks a string
    /// `method` or an integer `id`, or if `params` is present but not an
    /// object.
    pub fn from_message(message: &Value) -> Result<(u64, Self)> {
        let method = message
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::protocol_violation("command message lacks a method"))?;
        let id = message
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::protocol_violation("command message lacks an id"))?;
        let params = match message.get("params") {
            None => Map::new(),
            Some(Value::Object(params)) => params.clone(),
            Some(_) => {
                return Err(Error::protocol_violation(
                    "command params is not an object",
                ));
            }
        };
        Ok((
            id,
            Self {
                method: method.to_string(),
                params,
            },
        ))
    }
}

// ============================================================================
// DevtoolsObject
// ============================================================================

/// A typed parameter object nested inside a [`Command`].
///
/// Same fluent shape as [`Command`] minus the method name. Used for values
/// like highlight configs or call arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevtoolsObject {
    fields: Map<String, Value>,
}

impl DevtoolsObject {
    /// Creates an empty object.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the field mapping.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn insert(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Adds a boolean field.
    #[inline]
    #[must_use]
    pub fn with_bool(self, name: &str, value: bool) -> Self {
        self.insert(name, Value::Bool(value))
    }

    /// Adds an integer field.
    #[inline]
    #[must_use]
    pub fn with_i64(self, name: &str, value: i64) -> Self {
        self.insert(name, json!(value))
    }

    /// Adds a floating-point field.
    #[inline]
    #[must_use]
    pub fn with_f64(self, name: &str, value: f64) -> Self {
        self.insert(name, json!(value))
    }

    /// Adds a string field.
    #[inline]
    #[must_use]
    pub fn with_str(self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, Value::String(value.into()))
    }

    /// Adds a nested object field.
    #[inline]
    #[must_use]
    pub fn with_object(self, name: &str, value: DevtoolsObject) -> Self {
        let nested = value.into_value();
        self.insert(name, nested)
    }

    fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

// ============================================================================
// Tests
// ============================================================================
