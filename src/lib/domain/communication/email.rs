//! Email message

mod attachment;
mod headers;
mod priority;

pub use attachment::{Attachment, AttachmentBody, Disposition};
pub use headers::Headers;
pub use priority::{Priority, PriorityError};

/// The content of an email, independent of who sends or receives it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Email {
    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html: Option<String>,

    /// The plain text body of the email
    pub text: Option<String>,

    /// The priority of the email
    pub priority: Priority,

    /// Custom headers
    pub headers: Headers,

    /// Attached files, in order
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Create an email with a subject and no body
    pub fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            ..Self::default()
        }
    }

    /// Set the HTML body
    pub fn html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }

    /// Set the plain text body
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Set the priority
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Add a custom header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add an attachment
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_both_bodies() {
        let email = Email::new("Hello").html("<p>Hi</p>").text("Hi");

        assert_eq!(email.subject, "Hello");
        assert_eq!(email.html.as_deref(), Some("<p>Hi</p>"));
        assert_eq!(email.text.as_deref(), Some("Hi"));
        assert_eq!(email.priority, Priority::Normal);
    }

    #[test]
    fn test_attachments_keep_order() {
        let email = Email::new("Files")
            .attach(Attachment::new("a.pdf", "application/pdf", vec![1]))
            .attach(Attachment::inline("logo.png", "image/png", vec![2]));

        let names: Vec<_> = email.attachments.iter().map(|a| a.filename.as_str()).collect();

        assert_eq!(names, ["a.pdf", "logo.png"]);
        assert!(email.attachments[1].is_inline());
    }
}
