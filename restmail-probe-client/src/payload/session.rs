//! Complete client-side mail session transcripts.
//!
//! The transcript is written in one go without waiting for the server's
//! replies between commands, so every reply ends up in the same response
//! buffer and the caller only has to look for the final one.

use restmail_probe_common::LineEnding;

use crate::clock::{Clock, IdSource};

/// Name announced in `EHLO` and used as the `Message-ID` domain.
pub const DEFAULT_HELO: &str = "test-client";

/// Builder for a full `EHLO` .. `QUIT` session carrying one message.
///
/// # Examples
///
/// ```
/// use restmail_probe_client::{MailSession, SequentialIds, SystemClock};
///
/// let session = MailSession::new("a@b.com", "c@d.com", "Hello")
///     .build(&SystemClock, &SequentialIds::default());
///
/// let text = String::from_utf8(session).unwrap();
/// assert!(text.contains("RCPT TO:<c@d.com>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSession {
    from: String,
    to: String,
    subject: String,
    helo: String,
    line_ending: LineEnding,
}

impl MailSession {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            helo: DEFAULT_HELO.to_string(),
            line_ending: LineEnding::default(),
        }
    }

    /// Sets the name sent with `EHLO`.
    #[must_use]
    pub fn helo(mut self, helo: impl Into<String>) -> Self {
        self.helo = helo.into();
        self
    }

    #[must_use]
    pub const fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    #[must_use]
    pub fn from_addr(&self) -> &str {
        &self.from
    }

    #[must_use]
    pub fn to_addr(&self) -> &str {
        &self.to
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Renders the transcript, stamping `Date` and `Message-ID` from the
    /// given sources.
    pub fn build(&self, clock: &impl Clock, ids: &impl IdSource) -> Vec<u8> {
        let now = clock.now();
        let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
        let message_id = format!(
            "<test-{}-{}@{}>",
            now.timestamp(),
            ids.next_id(),
            single_line(&self.helo)
        );

        let from = single_line(&self.from);
        let to = single_line(&self.to);

        let message = [
            format!("From: {from}"),
            format!("To: {to}"),
            format!("Subject: {}", single_line(&self.subject)),
            format!("Date: {}", now.to_rfc2822()),
            format!("Message-ID: {message_id}"),
            "Content-Type: text/plain; charset=utf-8".to_string(),
            String::new(),
            "This is a test email sent by the restmail probe.".to_string(),
            String::new(),
            "Test details:".to_string(),
            format!("- Timestamp: {timestamp}"),
            format!("- From: {from}"),
            format!("- To: {to}"),
            String::new(),
            "If you're seeing this, the restmail-receiver is working correctly!".to_string(),
        ];

        let eol = self.line_ending.as_str();
        let mut session = String::with_capacity(1024);

        for line in [
            format!("EHLO {}", single_line(&self.helo)),
            format!("MAIL FROM:<{from}>"),
            format!("RCPT TO:<{to}>"),
            "DATA".to_string(),
        ] {
            session.push_str(&line);
            session.push_str(eol);
        }

        for line in &message {
            // Dot-stuffing (RFC 5321 4.5.2) keeps the terminator unique.
            if line.starts_with('.') {
                session.push('.');
            }
            session.push_str(line);
            session.push_str(eol);
        }

        for line in [".", "QUIT"] {
            session.push_str(line);
            session.push_str(eol);
        }

        session.into_bytes()
    }
}

/// Folds any embedded line breaks into spaces so a value can never start a
/// new command or header.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
