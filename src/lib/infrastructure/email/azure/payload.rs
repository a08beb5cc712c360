//! JSON body of the `emails:send` operation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::domain::communication::{
    email::{Attachment, AttachmentBody, Email, Headers},
    email_addresses::Address,
    envelope::Envelope,
};

/// Headers the provider sets itself or that duplicate envelope and content fields.
/// Compared case-insensitively.
pub const EXCLUDED_HEADERS: &[&str] = &[
    "x-ms-client-request-id",
    "operation-id",
    "repeatability-request-id",
    "repeatability-first-sent",
    "authorization",
    "x-ms-content-sha256",
    "x-ms-date",
    "received",
    "dkim-signature",
    "content-transfer-encoding",
    "from",
    "to",
    "cc",
    "bcc",
    "subject",
    "content-type",
    "reply-to",
];

/// The request body sent to the provider
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPayload<'a> {
    content: Content<'a>,
    recipients: Recipients<'a>,
    sender_address: &'a str,
    attachments: Vec<AttachmentPayload<'a>>,
    user_engagement_tracking_disabled: bool,
    headers: Option<CustomHeaders<'a>>,
    importance: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reply_to: Vec<RecipientPayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content<'a> {
    html: Option<&'a str>,
    plain_text: Option<&'a str>,
    subject: &'a str,
}

#[derive(Debug, Serialize)]
struct Recipients<'a> {
    to: Vec<RecipientPayload<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cc: Vec<RecipientPayload<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc: Vec<RecipientPayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecipientPayload<'a> {
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

impl<'a> From<&'a Address> for RecipientPayload<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            address: address.email().as_str(),
            display_name: address.name(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentPayload<'a> {
    name: &'a str,
    content_in_base64: String,
    content_type: &'a str,
    #[serde(rename = "content_id", skip_serializing_if = "Option::is_none")]
    content_id: Option<&'a str>,
}

impl<'a> From<&'a Attachment> for AttachmentPayload<'a> {
    fn from(attachment: &'a Attachment) -> Self {
        let content_in_base64 = match &attachment.body {
            AttachmentBody::Raw(bytes) => STANDARD.encode(bytes),
            AttachmentBody::Base64(text) => text.replace(['\r', '\n'], ""),
        };

        Self {
            name: &attachment.filename,
            content_in_base64,
            content_type: &attachment.content_type,
            content_id: attachment
                .is_inline()
                .then_some(attachment.filename.as_str()),
        }
    }
}

/// Custom headers serialised as a JSON object in insertion order
#[derive(Debug)]
struct CustomHeaders<'a>(Vec<(&'a str, &'a str)>);

impl<'a> CustomHeaders<'a> {
    /// Returns `None` when nothing is left after dropping excluded headers
    fn from_headers(headers: &'a Headers) -> Option<Self> {
        let kept: Vec<_> = headers
            .iter()
            .filter(|(name, _)| !is_excluded(name))
            .collect();

        (!kept.is_empty()).then_some(Self(kept))
    }
}

impl Serialize for CustomHeaders<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }

        map.end()
    }
}

fn is_excluded(name: &str) -> bool {
    EXCLUDED_HEADERS
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(name))
}

impl<'a> EmailPayload<'a> {
    /// Map an email and its envelope to the provider's request body
    pub fn new(email: &'a Email, envelope: &'a Envelope, engagement_tracking: bool) -> Self {
        let map = |addresses: &'a [Address]| -> Vec<RecipientPayload<'a>> {
            addresses.iter().map(RecipientPayload::from).collect()
        };

        Self {
            content: Content {
                html: email.html.as_deref(),
                plain_text: email.text.as_deref(),
                subject: &email.subject,
            },
            recipients: Recipients {
                to: map(envelope.to_recipients()),
                cc: map(envelope.cc_recipients()),
                bcc: map(envelope.bcc_recipients()),
            },
            sender_address: envelope.sender().email().as_str(),
            attachments: email.attachments.iter().map(AttachmentPayload::from).collect(),
            user_engagement_tracking_disabled: !engagement_tracking,
            headers: CustomHeaders::from_headers(&email.headers),
            importance: email.priority.as_str(),
            reply_to: map(envelope.reply_to_addresses()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use testresult::TestResult;

    use crate::domain::communication::email::Priority;

    use super::*;

    fn envelope() -> TestResult<Envelope> {
        Ok(Envelope::new(
            "sender@example.com".parse()?,
            vec!["Jane Doe <jane@example.com>".parse()?, "bob@example.com".parse()?],
        )?)
    }

    fn to_json(email: &Email, envelope: &Envelope, tracking: bool) -> TestResult<Value> {
        Ok(serde_json::to_value(EmailPayload::new(email, envelope, tracking))?)
    }

    #[test]
    fn test_minimal_payload() -> TestResult {
        let email = Email::new("Hello").html("<p>Hi</p>").text("Hi");

        let json = to_json(&email, &envelope()?, true)?;

        assert_eq!(
            json,
            json!({
                "content": {"html": "<p>Hi</p>", "plainText": "Hi", "subject": "Hello"},
                "recipients": {
                    "to": [
                        {"address": "jane@example.com", "displayName": "Jane Doe"},
                        {"address": "bob@example.com"}
                    ]
                },
                "senderAddress": "sender@example.com",
                "attachments": [],
                "userEngagementTrackingDisabled": false,
                "headers": null,
                "importance": "normal"
            })
        );

        Ok(())
    }

    #[test]
    fn test_cc_bcc_and_reply_to_are_emitted_when_present() -> TestResult {
        let envelope = envelope()?
            .cc(vec!["Carol <carol@example.com>".parse()?])
            .bcc(vec!["dave@example.com".parse()?, "erin@example.com".parse()?])
            .reply_to(vec!["replies@example.com".parse()?]);

        let json = to_json(&Email::new("Hello"), &envelope, true)?;

        assert_eq!(
            json["recipients"]["cc"],
            json!([{"address": "carol@example.com", "displayName": "Carol"}])
        );
        assert_eq!(
            json["recipients"]["bcc"],
            json!([{"address": "dave@example.com"}, {"address": "erin@example.com"}])
        );
        assert_eq!(json["replyTo"], json!([{"address": "replies@example.com"}]));

        Ok(())
    }

    #[test]
    fn test_empty_cc_bcc_and_reply_to_are_omitted() -> TestResult {
        let json = to_json(&Email::new("Hello"), &envelope()?, true)?;

        assert!(json["recipients"].get("cc").is_none());
        assert!(json["recipients"].get("bcc").is_none());
        assert!(json.get("replyTo").is_none());

        Ok(())
    }

    #[test]
    fn test_tracking_flag_is_inverted() -> TestResult {
        let json = to_json(&Email::new("Hello"), &envelope()?, false)?;

        assert_eq!(json["userEngagementTrackingDisabled"], json!(true));

        Ok(())
    }

    #[test]
    fn test_importance_follows_priority() -> TestResult {
        let email = Email::new("Hello").priority(Priority::Highest);

        let json = to_json(&email, &envelope()?, true)?;

        assert_eq!(json["importance"], json!("highest"));

        Ok(())
    }

    #[test]
    fn test_excluded_headers_are_dropped_case_insensitively() -> TestResult {
        let email = Email::new("Hello")
            .header("X-Campaign", "spring")
            .header("Subject", "ignored")
            .header("AUTHORIZATION", "ignored")
            .header("Content-Transfer-Encoding", "ignored")
            .header("Reply-To", "ignored")
            .header("X-Priority-Tag", "Urgent");

        let envelope = envelope()?;
        let payload = EmailPayload::new(&email, &envelope, true);
        let raw = serde_json::to_string(&payload)?;

        assert!(raw.contains(r#""headers":{"X-Campaign":"spring","X-Priority-Tag":"Urgent"}"#));

        Ok(())
    }

    #[test]
    fn test_every_excluded_header_is_dropped_in_any_case() -> TestResult {
        let mut email = Email::new("Hello");

        for name in EXCLUDED_HEADERS {
            let mixed: String = name
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    if i % 2 == 0 {
                        c.to_ascii_uppercase()
                    } else {
                        c
                    }
                })
                .collect();

            email = email
                .header(name, "lower")
                .header(&name.to_ascii_uppercase(), "upper")
                .header(&mixed, "mixed");
        }

        let json = to_json(&email, &envelope()?, true)?;

        assert_eq!(json["headers"], Value::Null);

        Ok(())
    }

    #[test]
    fn test_headers_are_null_when_only_excluded_headers_remain() -> TestResult {
        let email = Email::new("Hello").header("From", "x@example.com");

        let json = to_json(&email, &envelope()?, true)?;

        assert_eq!(json["headers"], Value::Null);

        Ok(())
    }

    #[test]
    fn test_attachments() -> TestResult {
        let email = Email::new("Files")
            .attach(Attachment::inline("a.pdf", "application/pdf", b"%PDF".to_vec()))
            .attach(Attachment::new("b.txt", "text/plain", b"hello".to_vec()));

        let json = to_json(&email, &envelope()?, true)?;

        assert_eq!(
            json["attachments"],
            json!([
                {
                    "name": "a.pdf",
                    "contentInBase64": "JVBERg==",
                    "contentType": "application/pdf",
                    "content_id": "a.pdf"
                },
                {
                    "name": "b.txt",
                    "contentInBase64": "aGVsbG8=",
                    "contentType": "text/plain"
                }
            ])
        );

        Ok(())
    }

    #[test]
    fn test_pre_encoded_attachment_line_breaks_are_stripped() -> TestResult {
        let email = Email::new("Files").attach(Attachment::from_base64(
            "b.txt",
            "text/plain",
            "aGVs\r\nbG8=\r\n",
        ));
        let json = to_json(&email, &envelope()?, true)?;

        assert_eq!(json["attachments"][0]["contentInBase64"], json!("aGVsbG8="));

        Ok(())
    }
}
