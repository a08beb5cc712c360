//! Azure Communication Services email transport
//!
//! Sends mail through the `emails:send` REST operation, authenticated with an HMAC-SHA256
//! signature over the request date, host and body hash.

mod config;
mod factory;
mod payload;
mod response;

pub mod signer;

use std::{fmt, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub use config::{AzureConfig, Endpoint, DEFAULT_API_VERSION};
pub use factory::AzureTransportFactory;
pub use payload::{EmailPayload, EXCLUDED_HEADERS};
pub use response::{interpret_response, ACCEPTED, UNEXPECTED_RESPONSE};
pub use signer::{AuthHeaders, RequestSigner};

use crate::{
    domain::communication::{
        email::Email,
        envelope::Envelope,
        transport::{ConfigurationError, MailerError, SendResult, Transport},
    },
    infrastructure::http::{HttpExecutor, HttpRequest},
};

/// Identifies one send attempt.
///
/// The id is used as the idempotency key, so a retry that should be deduplicated by the
/// provider must reuse the same context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestContext {
    /// Sent as `repeatability-request-id`, `operation-id` and `x-ms-client-request-id`
    pub request_id: Uuid,

    /// Signing time, sent as `x-ms-date` and `repeatability-first-sent`
    pub timestamp: DateTime<Utc>,
}

impl RequestContext {
    /// A fresh id stamped with the current time
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends email through Azure Communication Services
pub struct AzureTransport<H: HttpExecutor> {
    endpoint: Endpoint,
    signer: RequestSigner,
    api_version: String,
    engagement_tracking: bool,
    client: Arc<H>,
}

impl<H: HttpExecutor> AzureTransport<H> {
    /// Create a new transport
    ///
    /// # Arguments
    /// * `config` - The resource endpoint, access key and API options.
    /// * `client` - Executes the signed requests.
    pub fn new(config: &AzureConfig, client: Arc<H>) -> Result<Self, ConfigurationError> {
        let endpoint = Endpoint::parse(&config.endpoint)?;
        let signer = RequestSigner::new(endpoint.host(), &config.access_key)?;

        let api_version = match config.api_version.trim() {
            "" => DEFAULT_API_VERSION.to_string(),
            version => version.to_string(),
        };

        Ok(Self {
            endpoint,
            signer,
            api_version,
            engagement_tracking: config.engagement_tracking,
            client,
        })
    }

    /// The request path and query, e.g. `/emails:send?api-version=2023-03-31`
    pub fn path_and_query(&self) -> String {
        format!("/emails:send?api-version={}", self.api_version)
    }

    /// The absolute URL requests are sent to
    pub fn request_url(&self) -> String {
        format!("{}{}", self.endpoint.base_url(), self.path_and_query())
    }

    /// Build the signed request for one send attempt.
    ///
    /// The body is serialised once; the same bytes are hashed, signed and sent.
    pub fn build_request(
        &self,
        email: &Email,
        envelope: &Envelope,
        context: &RequestContext,
    ) -> Result<HttpRequest, MailerError> {
        let payload = EmailPayload::new(email, envelope, self.engagement_tracking);
        let body = serde_json::to_vec(&payload).context("failed to serialize the email payload")?;

        let path_and_query = self.path_and_query();
        let auth = self
            .signer
            .sign("POST", &path_and_query, &body, context.timestamp);

        let request_id = context.request_id.to_string();

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("x-ms-date".to_string(), auth.date.clone()),
            ("x-ms-content-sha256".to_string(), auth.content_hash),
            ("x-ms-client-request-id".to_string(), request_id.clone()),
            ("operation-id".to_string(), request_id.clone()),
            ("repeatability-request-id".to_string(), request_id),
            ("repeatability-first-sent".to_string(), auth.date),
            ("Authorization".to_string(), auth.authorization),
        ];

        Ok(HttpRequest {
            method: "POST".to_string(),
            url: self.request_url(),
            headers,
            body,
        })
    }

    /// Send one attempt with an explicit context
    pub async fn send_with_context(
        &self,
        email: &Email,
        envelope: &Envelope,
        context: &RequestContext,
    ) -> Result<SendResult, MailerError> {
        let request = self.build_request(email, envelope, context)?;

        debug!(
            "sending email {} to {} ({} bytes, {} recipients)",
            context.request_id,
            request.url,
            request.body.len(),
            envelope.recipient_count()
        );

        let response = self.client.execute(request).await.map_err(|e| {
            error!("email {} could not be delivered: {}", context.request_id, e);
            e
        })?;

        match interpret_response(response.status, &response.body) {
            Ok(SendResult::Success {
                provider_message_id,
            }) => {
                info!(
                    "email {} accepted as {}",
                    context.request_id, provider_message_id
                );

                Ok(SendResult::Success {
                    provider_message_id,
                })
            }
            Ok(SendResult::Failure(failure)) => {
                warn!(
                    "email {} rejected with status {} ({})",
                    context.request_id, failure.http_status, failure.error_code
                );

                Ok(SendResult::Failure(failure))
            }
            Err(e) => {
                error!("email {}: {}", context.request_id, e);

                Err(e)
            }
        }
    }
}

#[async_trait]
impl<H: HttpExecutor> Transport for AzureTransport<H> {
    async fn send(&self, email: &Email, envelope: &Envelope) -> Result<SendResult, MailerError> {
        self.send_with_context(email, envelope, &RequestContext::new())
            .await
    }
}

impl<H: HttpExecutor> fmt::Display for AzureTransport<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "azure+api://{}", self.endpoint.host())
    }
}

impl<H: HttpExecutor> fmt::Debug for AzureTransport<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureTransport")
            .field("endpoint", &self.endpoint)
            .field("signer", &self.signer)
            .field("api_version", &self.api_version)
            .field("engagement_tracking", &self.engagement_tracking)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use testresult::TestResult;

    use crate::{
        domain::communication::{email::Attachment, transport::ApiFailure},
        infrastructure::http::{HttpResponse, MockHttpExecutor},
    };

    use super::*;

    const KEY: &str = "c2VjcmV0LWtleS1ieXRlcw==";
    const ENDPOINT: &str = "https://my-acs.communication.azure.com";

    fn context() -> RequestContext {
        RequestContext {
            request_id: Uuid::nil(),
            timestamp: Utc.with_ymd_and_hms(2023, 8, 1, 10, 0, 0).unwrap(),
        }
    }

    fn transport(client: MockHttpExecutor) -> TestResult<AzureTransport<MockHttpExecutor>> {
        Ok(AzureTransport::new(
            &AzureConfig::new(ENDPOINT, KEY),
            Arc::new(client),
        )?)
    }

    fn message() -> TestResult<(Email, Envelope)> {
        let email = Email::new("Hello")
            .html("<p>Hi <img src=\"cid:logo.png\"></p>")
            .text("Hi")
            .header("X-Campaign", "spring")
            .attach(Attachment::inline("logo.png", "image/png", vec![0x89, 0x50]));

        let envelope = Envelope::new(
            "sender@example.com".parse()?,
            vec!["Jane <jane@example.com>".parse()?],
        )?;

        Ok((email, envelope))
    }

    #[test]
    fn test_request_url() -> TestResult {
        let transport = AzureTransport::new(
            &AzureConfig::new("my-acs.communication.azure.com/", KEY).with_api_version("2024-01-01"),
            Arc::new(MockHttpExecutor::new()),
        )?;

        assert_eq!(
            transport.request_url(),
            "https://my-acs.communication.azure.com/emails:send?api-version=2024-01-01"
        );
        assert_eq!(
            transport.to_string(),
            "azure+api://my-acs.communication.azure.com"
        );

        Ok(())
    }

    #[test]
    fn test_build_request_headers() -> TestResult {
        let (email, envelope) = message()?;
        let request = transport(MockHttpExecutor::new())?.build_request(&email, &envelope, &context())?;

        let id = Uuid::nil().to_string();
        let date = "Tue, 01 Aug 2023 10:00:00 GMT";

        assert_eq!(request.method, "POST");
        assert_eq!(
            request.url,
            "https://my-acs.communication.azure.com/emails:send?api-version=2023-03-31"
        );
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("x-ms-date"), Some(date));
        assert_eq!(request.header("repeatability-first-sent"), Some(date));
        assert_eq!(request.header("repeatability-request-id"), Some(id.as_str()));
        assert_eq!(request.header("operation-id"), Some(id.as_str()));
        assert_eq!(request.header("x-ms-client-request-id"), Some(id.as_str()));

        Ok(())
    }

    #[test]
    fn test_signature_covers_the_exact_body_sent() -> TestResult {
        let (email, envelope) = message()?;
        let request = transport(MockHttpExecutor::new())?.build_request(&email, &envelope, &context())?;

        let expected = signer::sign(
            "POST",
            "/emails:send?api-version=2023-03-31",
            "my-acs.communication.azure.com",
            &request.body,
            KEY,
            context().timestamp,
        )?;

        assert_eq!(
            request.header("x-ms-content-sha256"),
            Some(expected.content_hash.as_str())
        );
        assert_eq!(
            request.header("authorization"),
            Some(expected.authorization.as_str())
        );

        Ok(())
    }

    #[test]
    fn test_build_request_body() -> TestResult {
        let (email, envelope) = message()?;
        let request = transport(MockHttpExecutor::new())?.build_request(&email, &envelope, &context())?;

        let body: Value = serde_json::from_slice(&request.body)?;

        assert_eq!(body["senderAddress"], json!("sender@example.com"));
        assert_eq!(
            body["recipients"]["to"],
            json!([{"address": "jane@example.com", "displayName": "Jane"}])
        );
        assert_eq!(body["headers"], json!({"X-Campaign": "spring"}));
        assert_eq!(body["attachments"][0]["content_id"], json!("logo.png"));
        assert_eq!(body["userEngagementTrackingDisabled"], json!(false));

        Ok(())
    }

    #[test]
    fn test_each_send_gets_a_fresh_request_id() {
        assert_ne!(RequestContext::new().request_id, RequestContext::new().request_id);
    }

    #[test]
    fn test_invalid_key_fails_construction() {
        let result = AzureTransport::new(
            &AzureConfig::new(ENDPOINT, "%%%"),
            Arc::new(MockHttpExecutor::new()),
        );

        assert!(matches!(result, Err(ConfigurationError::InvalidAccessKey)));
    }

    #[tokio::test]
    async fn test_send_success() -> TestResult {
        let mut client = MockHttpExecutor::new();

        client
            .expect_execute()
            .times(1)
            .withf(|request| {
                request.url.ends_with("/emails:send?api-version=2023-03-31")
                    && request.header("authorization").is_some()
            })
            .returning(|_| {
                Ok(HttpResponse {
                    status: 202,
                    body: br#"{"id":"abc-123","status":"Running"}"#.to_vec(),
                })
            });

        let (email, envelope) = message()?;
        let result = transport(client)?.send(&email, &envelope).await?;

        assert_eq!(
            result,
            SendResult::Success {
                provider_message_id: "abc-123".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_rejected() -> TestResult {
        let mut client = MockHttpExecutor::new();

        client.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 400,
                body: br#"{"error":{"code":"InvalidArgument","message":"bad address"}}"#.to_vec(),
            })
        });

        let (email, envelope) = message()?;
        let result = transport(client)?.send(&email, &envelope).await?;

        assert_eq!(
            result,
            SendResult::Failure(ApiFailure {
                error_code: "InvalidArgument".to_string(),
                error_message: "bad address".to_string(),
                http_status: 400,
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_transport_error_is_not_a_failure() -> TestResult {
        let mut client = MockHttpExecutor::new();

        client
            .expect_execute()
            .times(1)
            .returning(|_| Err(MailerError::Transport(anyhow!("connection refused"))));

        let (email, envelope) = message()?;
        let result = transport(client)?.send(&email, &envelope).await;

        assert!(matches!(result, Err(MailerError::Transport(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_malformed_acceptance_is_a_protocol_error() -> TestResult {
        let mut client = MockHttpExecutor::new();

        client.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 202,
                body: b"not json".to_vec(),
            })
        });

        let (email, envelope) = message()?;
        let result = transport(client)?.send(&email, &envelope).await;

        assert!(matches!(result, Err(MailerError::Protocol(_))));

        Ok(())
    }
}
