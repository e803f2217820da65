//! HTTP client for the remote inventory service.
//!
//! Pushes single records (create = POST, replace = PUT) to the `inventory`
//! and `inventory-aggregate` endpoints. Payloads are validated before any
//! request is made; failures are returned as-is, never retried. This client
//! is independent of the reconciliation pass.

use reqwest::{Client, Method};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, info};

use skusync_inventory::DerivedInventoryRecord;

/// Record types accepted by the remote service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RemoteRecordKind {
    Inventory,
    InventoryAggregate,
}

impl RemoteRecordKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            RemoteRecordKind::Inventory => "inventory",
            RemoteRecordKind::InventoryAggregate => "inventory-aggregate",
        }
    }

    /// Payload keys that must be present and truthy.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            RemoteRecordKind::Inventory => &["skuBatchId", "skuId", "warehouseId"],
            RemoteRecordKind::InventoryAggregate => &["skuBatchId", "skuId"],
        }
    }
}

impl core::fmt::Display for RemoteRecordKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.endpoint())
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload {
        kind: RemoteRecordKind,
        reason: String,
    },
    #[error("{method} {url} failed: {source}")]
    Http {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
    },
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Check that `payload` is a JSON object carrying every required identifier.
pub fn validate_payload(kind: RemoteRecordKind, payload: &JsonValue) -> Result<(), TransportError> {
    let Some(object) = payload.as_object() else {
        return Err(TransportError::InvalidPayload {
            kind,
            reason: "payload is not a JSON object".to_string(),
        });
    };

    let missing: Vec<&str> = kind
        .required_fields()
        .iter()
        .copied()
        .filter(|field| !object.get(*field).is_some_and(is_truthy))
        .collect();

    if !missing.is_empty() {
        return Err(TransportError::InvalidPayload {
            kind,
            reason: format!("required fields missing: {}", missing.join(", ")),
        });
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct RemoteInventoryClient {
    client: Client,
    base_url: String,
}

impl RemoteInventoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    pub fn url_for(&self, kind: RemoteRecordKind) -> String {
        format!("{}{}", self.base_url, kind.endpoint())
    }

    /// POST a new record.
    pub async fn create(&self, kind: RemoteRecordKind, payload: &JsonValue) -> Result<(), TransportError> {
        self.send(Method::POST, kind, payload).await
    }

    /// PUT (replace) an existing record.
    pub async fn replace(&self, kind: RemoteRecordKind, payload: &JsonValue) -> Result<(), TransportError> {
        self.send(Method::PUT, kind, payload).await
    }

    /// POST a derived inventory row to the `inventory` endpoint.
    pub async fn create_inventory_record(&self, record: &DerivedInventoryRecord) -> Result<(), TransportError> {
        let payload = serde_json::to_value(record)?;
        self.create(RemoteRecordKind::Inventory, &payload).await
    }

    async fn send(&self, method: Method, kind: RemoteRecordKind, payload: &JsonValue) -> Result<(), TransportError> {
        let url = self.url_for(kind);

        if let Err(e) = validate_payload(kind, payload) {
            error!(%method, endpoint = kind.endpoint(), error = %e, "rejected remote inventory request");
            return Err(e);
        }

        let response = self
            .client
            .request(method.clone(), &url)
            .json(payload)
            .send()
            .await
            .map_err(|source| {
                error!(%method, endpoint = kind.endpoint(), error = %source, "remote inventory request failed");
                TransportError::Http {
                    method: method.clone(),
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%method, endpoint = kind.endpoint(), status = status.as_u16(), "remote inventory request failed");
            return Err(TransportError::Status {
                method,
                url,
                status: status.as_u16(),
            });
        }

        info!(%method, endpoint = kind.endpoint(), "remote inventory request successful");
        Ok(())
    }
}
