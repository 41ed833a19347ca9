//! Literal request payloads for the two endpoints.

mod policy;
mod session;

pub use policy::PolicyRequest;
pub use session::MailSession;
