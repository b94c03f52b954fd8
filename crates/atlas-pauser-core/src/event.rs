//! Decoding of trigger events into commands.
//!
//! Events arrive as Pub/Sub messages whose `data` field holds a
//! base64-encoded JSON payload:
//!
//! ```json
//! { "action": "pause", "project_name": "dev0-document-service0", "cluster": "cluster0" }
//! ```

use std::collections::BTreeMap;

use base64::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PauserError, Result};
use crate::types::{Action, Command};

/// A trigger event as delivered by the message bus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Base64-encoded JSON payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Message attributes. Not consulted.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Message id assigned by the bus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Publish timestamp assigned by the bus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,
}

impl Event {
    /// Parse an event from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `PauserError::InvalidData` if the text is not a JSON event object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PauserError::InvalidData(format!("event: {e}")))
    }

    /// Build an event carrying the given command.
    #[must_use]
    pub fn encode(command: &Command) -> Self {
        Self::from_payload(&serde_json::json!({
            "action": command.action.as_str(),
            "project_name": command.project_name,
            "cluster": command.cluster,
        }))
    }

    /// Build an event carrying an arbitrary JSON payload, unvalidated.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            data: Some(BASE64_STANDARD.encode(payload.to_string())),
            ..Self::default()
        }
    }

    /// Decode and validate the command carried by this event.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`ErrorKind::Event`](crate::ErrorKind::Event)
    /// if `data` is missing, is not base64-encoded JSON, lacks one of the
    /// required keys, or names an unknown action.
    pub fn decode(&self) -> Result<Command> {
        match self.data.as_deref() {
            Some(data) if !data.trim().is_empty() => decode_payload(data),
            _ => Err(PauserError::MissingData(self.describe())),
        }
    }

    fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// Decode a base64 payload into a command.
///
/// # Errors
///
/// See [`Event::decode`].
pub fn decode_payload(data: &str) -> Result<Command> {
    let bytes = BASE64_STANDARD
        .decode(data.trim())
        .map_err(|e| PauserError::InvalidData(format!("base64: {e}")))?;

    let payload: Value = serde_json::from_slice(&bytes)
        .map_err(|e| PauserError::InvalidData(format!("json: {e}")))?;

    let Value::Object(payload) = payload else {
        return Err(PauserError::InvalidData(
            "payload is not a JSON object".to_string(),
        ));
    };

    let action = required(&payload, "action")?;
    let project_name = required(&payload, "project_name")?;
    let cluster = cluster_name(required(&payload, "cluster")?)?;

    Ok(Command {
        action: action.parse::<Action>()?,
        project_name: project_name.to_string(),
        cluster: cluster.to_string(),
    })
}

fn required<'a>(payload: &'a Map<String, Value>, key: &'static str) -> Result<&'a str> {
    match payload.get(key) {
        None | Some(Value::Null) => Err(PauserError::MissingKey(key)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(PauserError::InvalidField {
            key,
            reason: "value is empty",
        }),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(PauserError::InvalidField {
            key,
            reason: "value is not a string",
        }),
    }
}

/// A cluster name must stay a single path segment of the cluster resource.
fn cluster_name(name: &str) -> Result<&str> {
    let reserved = |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control();
    if name == "." || name == ".." || name.contains(reserved) {
        return Err(PauserError::InvalidField {
            key: "cluster",
            reason: "not a valid cluster name",
        });
    }
    Ok(name)
}
