use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::Provenance;

/// A request from a caller (popup, CLI, native-messaging host).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Request {
    /// Extract the transcript of the current page. Takes no parameters.
    Extract,
}

/// The single answer to an extraction request.
///
/// Callers should branch on `ok` only; `error` is a human-readable diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    pub fn success(text: impl Into<String>, provenance: &Provenance) -> Self {
        Self {
            ok: true,
            text: Some(text.into()),
            source: Some(provenance.to_string()),
            error: None,
        }
    }

    pub fn failure(error: &Error) -> Self {
        Self {
            ok: false,
            text: None,
            source: None,
            error: Some(error.to_string()),
        }
    }

    /// Format as JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Format as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
