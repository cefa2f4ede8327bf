//! HTTP sender forwarding event envelopes to the Kyma event bus.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::value::RawValue;
use tracing::{error, info};

use super::payload::{EventRequestPayload, PayloadValidator};
use crate::apperrors::AppError;

/// Forwards normalized events to the event bus.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send_to_kyma(
        &self,
        event_type: &str,
        event_type_version: &str,
        event_id: &str,
        source_id: &str,
        data: Box<RawValue>,
    ) -> Result<(), AppError>;
}

/// Sender that POSTs envelopes to the Kyma event bus publish endpoint.
///
/// Each call makes exactly one request; failures are not retried.
#[derive(Clone)]
pub struct KymaSender {
    client: Client,
    validator: Arc<dyn PayloadValidator>,
    events_url: String,
}

impl KymaSender {
    pub fn new(
        client: Client,
        validator: Arc<dyn PayloadValidator>,
        events_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            validator,
            events_url: events_url.into(),
        }
    }
}

#[async_trait]
impl Sender for KymaSender {
    async fn send_to_kyma(
        &self,
        event_type: &str,
        event_type_version: &str,
        event_id: &str,
        source_id: &str,
        data: Box<RawValue>,
    ) -> Result<(), AppError> {
        let payload =
            EventRequestPayload::new(event_type, event_type_version, event_id, source_id, data);

        self.validator.validate(&payload).map_err(|e| {
            error!(event_type = %event_type, error = %e, "kyma_payload_invalid");
            AppError::Internal(e.message().to_string())
        })?;

        let body = serde_json::to_vec(&payload).map_err(|e| {
            error!(error = %e, "kyma_payload_serialize_failed");
            AppError::Internal(format!("failed to serialize event payload: {}", e))
        })?;

        let response = self
            .client
            .post(&self.events_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    url = %self.events_url,
                    is_timeout = e.is_timeout(),
                    error = %e,
                    "kyma_request_failed"
                );
                AppError::Internal(format!("failed to send event to Kyma: {}", e))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(
                url = %self.events_url,
                status_code = status.as_u16(),
                response_body = %body,
                "kyma_event_rejected"
            );
            return Err(AppError::Internal(format!(
                "event bus responded with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        info!(
            event_type = %payload.event_type,
            event_id = %payload.event_id,
            event_time = %payload.event_time,
            source_id = %payload.source_id,
            "kyma_event_sent"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apperrors::ErrorCode;
    use crate::events::payload::EnvelopeValidator;
    use chrono::{DateTime, Utc};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn data() -> Box<RawValue> {
        RawValue::from_string(r#"{"TestJSON":"test"}"#.to_string()).unwrap()
    }

    fn sender(url: String) -> KymaSender {
        KymaSender::new(Client::new(), Arc::new(EnvelopeValidator), url)
    }

    struct RejectingValidator;

    impl PayloadValidator for RejectingValidator {
        fn validate(&self, _payload: &EventRequestPayload) -> Result<(), AppError> {
            Err(AppError::Internal("test".to_string()))
        }
    }

    #[tokio::test]
    async fn test_send_succeeds_on_200() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/events"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let sender = sender(format!("{}/v1/events", mock_server.uri()));
        let result = sender
            .send_to_kyma("message", "v1", "", "slack-connector-app", data())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_posts_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let before = Utc::now().timestamp();
        sender(mock_server.uri())
            .send_to_kyma("message", "v1", "Ev1", "slack-connector-app", data())
            .await
            .unwrap();
        let after = Utc::now().timestamp();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);

        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["event-type"], "message");
        assert_eq!(body["event-type-version"], "v1");
        assert_eq!(body["event-id"], "Ev1");
        assert_eq!(body["source-id"], "slack-connector-app");
        assert_eq!(body["data"], serde_json::json!({"TestJSON": "test"}));

        let event_time = DateTime::parse_from_rfc3339(body["event-time"].as_str().unwrap())
            .unwrap()
            .timestamp();
        assert!(event_time >= before && event_time <= after);
    }

    #[tokio::test]
    async fn test_send_fails_on_non_200() {
        for status in [201u16, 400, 500] {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status))
                .expect(1)
                .mount(&mock_server)
                .await;

            let err = sender(mock_server.uri())
                .send_to_kyma("message", "v1", "", "slack-connector-app", data())
                .await
                .unwrap_err();

            assert_eq!(err.code(), ErrorCode::Internal);
            assert!(err.message().contains(&status.to_string()));
        }
    }

    #[tokio::test]
    async fn test_send_fails_on_invalid_payload_without_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let sender = KymaSender::new(Client::new(), Arc::new(RejectingValidator), mock_server.uri());
        let err = sender
            .send_to_kyma("", "v1", "", "slack-connector-app", data())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Internal);
    }

    #[tokio::test]
    async fn test_send_fails_on_missing_event_type() {
        let mock_server = MockServer::start().await;

        let err = sender(mock_server.uri())
            .send_to_kyma("", "", "", "slack-connector-app", data())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Internal);
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_fails_on_unreachable_url() {
        let err = sender("test".to_string())
            .send_to_kyma("message", "v1", "", "slack-connector-app", data())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Internal);
    }
}
