// ABOUTME: COROS response envelope decoding
// ABOUTME: Every upstream reply is wrapped in {result, message, data}
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::constants::coros;
use crate::errors::{AppError, AppResult};

/// Ordered JSON object, used wherever the upstream shape is open-ended
pub type JsonMap = Map<String, Value>;

/// Upstream response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Business status; `"0000"` means success
    #[serde(default, deserialize_with = "null_as_empty")]
    pub result: String,
    /// Human-readable status message
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// Payload, absent on most failures
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Whether the business status is the success sentinel
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == coros::SUCCESS_RESULT
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode a raw body
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` when the body is not a valid envelope.
    pub fn parse(body: &str) -> AppResult<Self> {
        serde_json::from_str(body).map_err(|e| {
            AppError::decode(
                coros::SERVICE,
                format!("Malformed response body: {e} ({})", preview(body)),
            )
        })
    }
}

/// Treat an explicit `null` like a missing string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Short body excerpt for error messages
fn preview(body: &str) -> String {
    const LIMIT: usize = 120;
    if body.chars().count() > LIMIT {
        format!("{}...", body.chars().take(LIMIT).collect::<String>())
    } else {
        body.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_null_status_fields_decode_as_empty() {
        let envelope = Envelope::<JsonMap>::parse(r#"{"result":"0001","message":null}"#).unwrap();

        assert_eq!(envelope.result, "0001");
        assert_eq!(envelope.message, "");
        assert!(!envelope.is_success());
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_null_result_is_not_success() {
        let envelope = Envelope::<JsonMap>::parse(r#"{"result":null,"data":{}}"#).unwrap();

        assert!(!envelope.is_success());
        assert_eq!(envelope.message, "");
    }
}
