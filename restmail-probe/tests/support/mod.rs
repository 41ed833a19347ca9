#![allow(dead_code)]

pub mod restmail;
pub mod stub_server;

pub use restmail::RestmailService;
pub use stub_server::StubServer;
