//! Interpretation of `emails:send` responses

use serde::Deserialize;

use crate::domain::communication::transport::{ApiFailure, MailerError, SendResult};

/// The only status that means the provider queued the message
pub const ACCEPTED: u16 = 202;

/// Error code reported when a rejection carries no error envelope
pub const UNEXPECTED_RESPONSE: &str = "UnexpectedResponse";

#[derive(Debug, Deserialize)]
struct AcceptedBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Classify a provider response.
///
/// A `202` must carry `{"id": ...}`; anything else there is a [`MailerError::Protocol`].
/// Every other status is a [`SendResult::Failure`], using the provider's `{"error": {...}}`
/// envelope when the body has one and it names an error code.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<SendResult, MailerError> {
    if status == ACCEPTED {
        let accepted: AcceptedBody = serde_json::from_slice(body).map_err(|e| {
            MailerError::Protocol(format!("could not read the message id from the response: {e}"))
        })?;

        return Ok(SendResult::Success {
            provider_message_id: accepted.id,
        });
    }

    let detail = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| Some((envelope.error.code?, envelope.error.message)));

    let failure = match detail {
        Some((code, message)) => ApiFailure {
            error_code: code,
            error_message: message.unwrap_or_default(),
            http_status: status,
        },
        None => ApiFailure {
            error_code: UNEXPECTED_RESPONSE.to_string(),
            error_message: format!(
                "Unable to send an email: {} (code {}).",
                String::from_utf8_lossy(body),
                status
            ),
            http_status: status,
        },
    };

    Ok(SendResult::Failure(failure))
}
