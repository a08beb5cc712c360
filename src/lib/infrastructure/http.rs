//! HTTP execution
//!
//! The mail transports build fully signed requests and hand them to an [`HttpExecutor`]; the
//! executor owns connections, TLS and timeouts.

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::transport::MailerError;

mod reqwest_client;

pub use reqwest_client::{HttpClientConfig, ReqwestExecutor};

/// A request ready to be sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method, e.g. `POST`
    pub method: String,

    /// The absolute URL
    pub url: String,

    /// Headers, in the order they are sent
    pub headers: Vec<(String, String)>,

    /// The body, sent verbatim
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Get the value of a header by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response received from the remote server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The status code
    pub status: u16,

    /// The raw body
    pub body: Vec<u8>,
}

/// Executes HTTP requests
#[async_trait]
pub trait HttpExecutor: Send + Sync + 'static {
    /// Send a request and read the whole response.
    ///
    /// Fails with [`MailerError::Transport`] when no response was received.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, MailerError>;
}

#[cfg(test)]
mock! {
    pub HttpExecutor {}

    #[async_trait]
    impl HttpExecutor for HttpExecutor {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, MailerError>;
    }
}
