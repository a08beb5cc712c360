//! Email attachments

/// How a mail client should present an attachment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Disposition {
    /// Offered as a downloadable file
    #[default]
    Attachment,

    /// Embedded in the body and referenced by `cid:<filename>`
    Inline,
}

/// The contents of an attachment
#[derive(Clone, PartialEq, Eq)]
pub enum AttachmentBody {
    /// Raw bytes
    Raw(Vec<u8>),

    /// Text that is already base64 encoded, possibly wrapped with CRLF line breaks
    Base64(String),
}

impl std::fmt::Debug for AttachmentBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw(bytes) => write!(f, "Raw({} bytes)", bytes.len()),
            Self::Base64(text) => write!(f, "Base64({} chars)", text.len()),
        }
    }
}

/// A file attached to an email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// The file name taken from the content disposition
    pub filename: String,

    /// The MIME type, e.g. `application/pdf`
    pub content_type: String,

    /// Attachment or inline
    pub disposition: Disposition,

    /// The file contents
    pub body: AttachmentBody,
}

impl Attachment {
    /// A regular attachment from raw bytes
    pub fn new(filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            disposition: Disposition::Attachment,
            body: AttachmentBody::Raw(bytes),
        }
    }

    /// An inline attachment from raw bytes
    pub fn inline(filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            disposition: Disposition::Inline,
            ..Self::new(filename, content_type, bytes)
        }
    }

    /// A regular attachment from text that is already base64 encoded
    pub fn from_base64(filename: &str, content_type: &str, encoded: &str) -> Self {
        Self {
            body: AttachmentBody::Base64(encoded.to_string()),
            ..Self::new(filename, content_type, Vec::new())
        }
    }

    /// Whether the attachment is embedded in the body
    pub fn is_inline(&self) -> bool {
        self.disposition == Disposition::Inline
    }
}
