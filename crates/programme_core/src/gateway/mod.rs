//! Remote data-access contract.
//!
//! # Responsibility
//! - Describe the narrow request/response capability the services consume.
//! - Carry the normalized remote failure shape.
//!
//! # Invariants
//! - Implementations return the raw response body; envelope handling and
//!   decoding belong to the normalizer.
//! - Timeouts and retries are the implementation's concern; services never
//!   retry.

pub mod memory;
pub mod routes;

pub use memory::{InMemoryGateway, RecordedRequest};
pub use routes::ApiRoutes;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

pub type GatewayResult<T> = Result<T, GatewayError>;

/// HTTP verb of a gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized remote failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    /// Human-readable message suitable for display.
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Field-keyed validation messages.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            errors: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Builds the normalized error from an error response body.
    ///
    /// Reads `message` and the field-keyed `errors` map; falls back to
    /// `transport_message`, then to a generic message.
    pub fn from_response_body(
        status: Option<u16>,
        body: Option<&Value>,
        transport_message: Option<&str>,
    ) -> Self {
        let message = body
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .or(transport_message.filter(|message| !message.trim().is_empty()))
            .unwrap_or(FALLBACK_ERROR_MESSAGE)
            .to_string();

        let mut errors = BTreeMap::new();
        if let Some(Value::Object(fields)) = body.and_then(|body| body.get("errors")) {
            for (field, messages) in fields {
                let messages = match messages {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    Value::String(single) => vec![single.clone()],
                    _ => Vec::new(),
                };
                errors.insert(field.clone(), messages);
            }
        }

        Self {
            message,
            status,
            errors,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Asynchronous request/response capability of the remote store.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn get(&self, path: &str) -> GatewayResult<Value>;
    async fn post(&self, path: &str, body: Option<Value>) -> GatewayResult<Value>;
    async fn put(&self, path: &str, body: Option<Value>) -> GatewayResult<Value>;
    async fn delete(&self, path: &str) -> GatewayResult<Value>;
}

#[async_trait]
impl<T: RemoteGateway + ?Sized> RemoteGateway for Arc<T> {
    async fn get(&self, path: &str) -> GatewayResult<Value> {
        (**self).get(path).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> GatewayResult<Value> {
        (**self).post(path, body).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> GatewayResult<Value> {
        (**self).put(path, body).await
    }

    async fn delete(&self, path: &str) -> GatewayResult<Value> {
        (**self).delete(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::GatewayError;
    use serde_json::json;

    #[test]
    fn from_response_body_reads_message_and_field_errors() {
        let body = json!({
            "message": "The given data was invalid.",
            "errors": {"title": ["The title field is required."], "type": "Unknown type"}
        });
        let err = GatewayError::from_response_body(Some(422), Some(&body), Some("Request failed"));
        assert_eq!(err.message, "The given data was invalid.");
        assert_eq!(err.status, Some(422));
        assert_eq!(err.errors["title"], vec!["The title field is required."]);
        assert_eq!(err.errors["type"], vec!["Unknown type"]);
    }

    #[test]
    fn from_response_body_falls_back_to_transport_then_generic_message() {
        let err = GatewayError::from_response_body(None, None, Some("Network Error"));
        assert_eq!(err.message, "Network Error");
        assert!(err.errors.is_empty());

        let err = GatewayError::from_response_body(Some(500), Some(&json!({})), None);
        assert_eq!(err.message, "An error occurred");
    }

    #[test]
    fn builder_collects_field_errors() {
        let err = GatewayError::new("invalid")
            .with_status(404)
            .with_field_error("title", "required");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "invalid");
        assert_eq!(err.errors["title"], vec!["required"]);
    }
}
