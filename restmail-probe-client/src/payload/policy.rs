//! Policy delegation requests.
//!
//! The request models the check an MTA makes at RCPT time. Only the
//! recipient varies; the rest describes a fixed synthetic client.

use std::fmt;

/// Client address from the documentation range (RFC 5737).
pub const CLIENT_ADDRESS: &str = "192.0.2.1";
pub const CLIENT_NAME: &str = "mail.example.com";
pub const SENDER: &str = "sender@example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRequest {
    recipient: String,
}

impl PolicyRequest {
    #[must_use]
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// The attributes in wire order.
    fn attributes(&self) -> [(&'static str, &str); 9] {
        [
            ("request", "smtpd_access_policy"),
            ("protocol_state", "RCPT"),
            ("protocol_name", "ESMTP"),
            ("client_address", CLIENT_ADDRESS),
            ("client_name", CLIENT_NAME),
            ("reverse_client_name", CLIENT_NAME),
            ("helo_name", CLIENT_NAME),
            ("sender", SENDER),
            ("recipient", &self.recipient),
        ]
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for PolicyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.attributes() {
            writeln!(f, "{key}={value}")?;
        }
        writeln!(f)
    }
}
