//! Typed access to invocation arguments.

use crate::error::RagError;

/// Wrapper around the argument mapping of one invocation.
#[derive(Debug, Clone)]
pub struct CapabilityArguments {
    value: serde_json::Value,
}

impl CapabilityArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, RagError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| RagError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Deserialize the entire mapping into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, RagError> {
        serde_json::from_value(self.value.clone())
            .map_err(|e| RagError::InvalidArgument(format!("Failed to deserialize arguments: {e}")))
    }

    /// Wrap arguments as sent by the model.
    ///
    /// Some models send the mapping as a JSON-encoded string; that form is
    /// decoded first, and an empty string counts as `{}`.
    pub fn decode(value: serde_json::Value) -> Result<Self, RagError> {
        let value = match value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str::<serde_json::Value>(trimmed).map_err(|e| {
                        RagError::InvalidArgument(format!("Failed to decode arguments: {e}"))
                    })?
                }
            }
            other => other,
        };
        Ok(Self::new(value))
    }
}
