//! reqwest backed HTTP executor

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use clap::Parser;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method,
};
use tracing::debug;

use crate::domain::communication::transport::MailerError;

use super::{HttpExecutor, HttpRequest, HttpResponse};

/// HTTP client configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    #[clap(long = "http-timeout-secs", env = "HTTP_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Sends requests with a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor
    pub fn new(config: &HttpClientConfig) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build the HTTP client")?;

        Ok(Self { client })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, MailerError> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| anyhow!("invalid header name \"{name}\""))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| anyhow!("invalid value for header \"{name}\""))?;

        map.append(name, value);
    }

    Ok(map)
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    #[mutants::skip]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, MailerError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| anyhow!("invalid HTTP method \"{}\"", request.method))?;

        let headers = header_map(&request.headers)?;

        debug!(method = %method, url = %request.url, "sending HTTP request");

        let response = self
            .client
            .request(method, &request.url)
            .headers(headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}
