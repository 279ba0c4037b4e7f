//! Workflow events handed to the background job bus.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use swc_telemetry::Metrics;
use tracing::{debug, info};

use crate::error::{MessagingError, MessagingResult};

/// Upserts the user as an advocate in the CRM.
pub const UPSERT_ADVOCATE_EVENT_NAME: &str = "capitol-canary.upsert-advocate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub name: String,
    pub data: Value,
}

impl WorkflowEvent {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Payload of [`UPSERT_ADVOCATE_EVENT_NAME`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAdvocatePayload {
    pub campaign_id: u64,
    pub user_id: String,
    pub opts: UpsertAdvocateOpts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAdvocateOpts {
    pub is_sms_optin: bool,
}

/// Destination for workflow events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: &WorkflowEvent) -> MessagingResult<()>;
}

/// Posts events as JSON to an ingest endpoint.
pub struct HttpEventSink {
    client: Client,
    endpoint: String,
    metrics: Metrics,
}

impl HttpEventSink {
    pub fn new(endpoint: &str, metrics: Metrics) -> Self {
        info!("Initialized event sink for {}", endpoint);
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            metrics,
        }
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn send(&self, event: &WorkflowEvent) -> MessagingResult<()> {
        let fail = |message: String| MessagingError::Event {
            name: event.name.clone(),
            message,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(format!("ingest returned status {}", response.status())));
        }

        self.metrics.inc_events_emitted(&event.name);
        debug!(event = %event.name, "Workflow event sent");
        Ok(())
    }
}

/// Logs and drops events. Used when no bus is configured.
#[derive(Default)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn send(&self, event: &WorkflowEvent) -> MessagingResult<()> {
        info!(event = %event.name, "No event sink configured, dropping event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_payload_shape() {
        let payload = UpsertAdvocatePayload {
            campaign_id: 42,
            user_id: "user-1".to_string(),
            opts: UpsertAdvocateOpts { is_sms_optin: true },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["campaignId"], 42);
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["opts"]["isSmsOptin"], true);
    }

    #[tokio::test]
    async fn test_noop_sink_accepts_events() {
        let sink = NoopEventSink;
        let event = WorkflowEvent::new(UPSERT_ADVOCATE_EVENT_NAME, Value::Null);
        assert!(sink.send(&event).await.is_ok());
    }
}
