use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::record::{Record, SubmissionPayload};

#[derive(Clone, Debug, Default)]
pub struct StoreOptions {
    pub endpoint: String,
    /// Request timeout; `None` leaves the transport default in place.
    pub timeout_seconds: Option<u64>,
}

/// Failure classes a caller has to handle. `fetch_all` only ever fails
/// with `Network` or `Protocol` once the store is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client could not be set up; no request was sent.
    Config,
    /// No response arrived.
    Network,
    /// A response arrived but its status or body was not usable.
    Protocol,
    /// A well-formed response reported an application failure.
    Remote,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("response body is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a list of records, got {found}")]
    NotAList { found: &'static str },

    #[error("record {index} is not a valid record object: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record sheet is unavailable: {message}")]
    SheetUnavailable { message: String },

    #[error("{message}")]
    Remote { message: String },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidEndpoint { .. } | StoreError::HttpClientBuild { .. } => {
                ErrorKind::Config
            }
            StoreError::Network { .. } => ErrorKind::Network,
            StoreError::Status { .. }
            | StoreError::Decode { .. }
            | StoreError::NotAList { .. }
            | StoreError::InvalidRecord { .. }
            | StoreError::SheetUnavailable { .. } => ErrorKind::Protocol,
            StoreError::Remote { .. } => ErrorKind::Remote,
        }
    }

    /// True when the store could be reached but the sheet behind it could
    /// not be read, either because it is missing or access is denied.
    /// A sub-kind of `Protocol`.
    pub fn is_sheet_unavailable(&self) -> bool {
        match self {
            StoreError::SheetUnavailable { .. } => true,
            StoreError::Status { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}

/// Decoded body of a successful append.
#[derive(Clone, Debug, PartialEq)]
pub struct Ack {
    pub body: Value,
}

/// Client for the remote record store: one endpoint, read-all via GET and
/// append-one via POST. Single attempt per call, no retries.
#[derive(Clone, Debug)]
pub struct RecordStore {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl RecordStore {
    pub fn new(options: &StoreOptions) -> Result<Self, StoreError> {
        let endpoint =
            reqwest::Url::parse(options.endpoint.trim()).map_err(|_| StoreError::InvalidEndpoint {
                url: options.endpoint.clone(),
            })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(StoreError::InvalidEndpoint {
                url: options.endpoint.clone(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = options.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|source| StoreError::HttpClientBuild { source })?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    pub async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching records");
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|source| StoreError::Network { source })?;
        let body = read_success_body(response).await?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|source| StoreError::Decode { source })?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                tracing::error!(body = %other, "record store did not return a list");
                if let Some(message) = remote_error_message(&other) {
                    return Err(StoreError::SheetUnavailable { message });
                }
                return Err(StoreError::NotAList {
                    found: json_kind(&other),
                });
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Record>(item)
                    .map_err(|source| StoreError::InvalidRecord { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = records.len(), "records fetched");
        Ok(records)
    }

    pub async fn append(&self, payload: &SubmissionPayload) -> Result<Ack, StoreError> {
        tracing::debug!(endpoint = %self.endpoint, "appending record");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|source| StoreError::Network { source })?;
        let body = read_success_body(response).await?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|source| StoreError::Decode { source })?;

        // The store may report failure inside a 200 response.
        if let Some(message) = remote_error_message(&value) {
            return Err(StoreError::Remote { message });
        }
        Ok(Ack { body: value })
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), body = %body, "record store returned an error response");
        return Err(StoreError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|source| StoreError::Network { source })?;
    Ok(bytes.to_vec())
}

/// Message of an `{"status": "error", "message": ...}` body.
fn remote_error_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    if object.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    let message = match object.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Some(message)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
