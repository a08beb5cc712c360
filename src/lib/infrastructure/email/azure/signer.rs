//! HMAC-SHA256 request signing
//!
//! The provider authenticates a request by recomputing
//!
//! ```text
//! METHOD\nPATH_AND_QUERY\nDATE;HOST;CONTENT_HASH
//! ```
//!
//! with the shared access key, where `CONTENT_HASH` is the base64 SHA-256 digest of the exact
//! body bytes on the wire.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::domain::communication::transport::ConfigurationError;

type HmacSha256 = Hmac<Sha256>;

/// The headers covered by the signature, in signing order
pub const SIGNED_HEADERS: &str = "x-ms-date;host;x-ms-content-sha256";

/// Authentication header values for a single request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Value of the `Authorization` header
    pub authorization: String,

    /// Value of the `x-ms-date` header
    pub date: String,

    /// Value of the `x-ms-content-sha256` header
    pub content_hash: String,
}

/// Format a timestamp as an RFC 1123 date, e.g. `Tue, 01 Aug 2023 10:00:00 GMT`
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Base64 encoded SHA-256 digest of `body`
pub fn content_hash(body: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(body))
}

/// Split an endpoint into its lower-cased scheme, if it has an `http(s)://` prefix in any case,
/// and the rest.
pub fn split_scheme(endpoint: &str) -> (Option<&'static str>, &str) {
    let endpoint = endpoint.trim();

    for scheme in ["https", "http"] {
        let prefix_len = scheme.len() + 3;

        if let Some(prefix) = endpoint.get(..prefix_len) {
            if prefix.eq_ignore_ascii_case(&format!("{scheme}://")) {
                return (Some(scheme), &endpoint[prefix_len..]);
            }
        }
    }

    (None, endpoint)
}

/// Strip a leading `https://` or `http://` and trailing slashes from an endpoint
pub fn signing_host(endpoint: &str) -> &str {
    split_scheme(endpoint).1.trim_end_matches('/')
}

/// Build the canonical string the signature is computed over
pub fn string_to_sign(
    method: &str,
    path_and_query: &str,
    date: &str,
    host: &str,
    content_hash: &str,
) -> String {
    format!(
        "{}\n{}\n{};{};{}",
        method.to_ascii_uppercase(),
        path_and_query,
        date,
        host,
        content_hash
    )
}

/// Sign a request in one go.
///
/// Prefer [`RequestSigner`] when signing more than once with the same key.
pub fn sign(
    method: &str,
    path_and_query: &str,
    host: &str,
    body: &[u8],
    secret_key_base64: &str,
    timestamp: DateTime<Utc>,
) -> Result<AuthHeaders, ConfigurationError> {
    let signer = RequestSigner::new(host, secret_key_base64)?;

    Ok(signer.sign(method, path_and_query, body, timestamp))
}

/// Signs requests for one host with one access key
#[derive(Clone)]
pub struct RequestSigner {
    host: String,
    mac: HmacSha256,
}

impl RequestSigner {
    /// Create a signer.
    ///
    /// # Arguments
    /// * `endpoint` - The resource host, with or without a scheme.
    /// * `secret_key_base64` - The base64 encoded access key.
    pub fn new(endpoint: &str, secret_key_base64: &str) -> Result<Self, ConfigurationError> {
        let host = signing_host(endpoint);
        if host.is_empty() {
            return Err(ConfigurationError::MissingEndpoint);
        }

        let secret_key_base64 = secret_key_base64.trim();
        if secret_key_base64.is_empty() {
            return Err(ConfigurationError::MissingAccessKey);
        }

        let key = STANDARD
            .decode(secret_key_base64)
            .map_err(|_| ConfigurationError::InvalidAccessKey)?;

        let mac =
            HmacSha256::new_from_slice(&key).map_err(|_| ConfigurationError::InvalidAccessKey)?;

        Ok(Self {
            host: host.to_string(),
            mac,
        })
    }

    /// The host included in every signature
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Compute the authentication headers for `body`, which must be the exact bytes sent.
    pub fn sign(
        &self,
        method: &str,
        path_and_query: &str,
        body: &[u8],
        timestamp: DateTime<Utc>,
    ) -> AuthHeaders {
        let date = format_date(timestamp);
        let content_hash = content_hash(body);
        let to_sign = string_to_sign(method, path_and_query, &date, &self.host, &content_hash);

        let mut mac = self.mac.clone();
        mac.update(to_sign.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        AuthHeaders {
            authorization: format!(
                "HMAC-SHA256 SignedHeaders={}&Signature={}",
                SIGNED_HEADERS, signature
            ),
            date,
            content_hash,
        }
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("host", &self.host)
            .field("key", &"********")
            .finish()
    }
}
