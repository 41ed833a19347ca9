//! In-process stand-in for the restmail receiver.
//!
//! Speaks just enough of both protocols to accept the probe's traffic: the
//! policy side approves recipients in one domain and rejects the rest, the
//! delivery side runs a line-based SMTP dialogue and answers the end of DATA
//! with the queued reply.

use std::net::SocketAddr;

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

pub struct RestmailService {
    policy_addr: SocketAddr,
    delivery_addr: SocketAddr,
    tasks: Vec<JoinHandle<()>>,
}

impl RestmailService {
    /// Starts both endpoints, accepting recipients `@{accepted_domain}`.
    ///
    /// # Errors
    ///
    /// Returns an error if either listener cannot bind.
    pub async fn start(accepted_domain: &str) -> std::io::Result<Self> {
        let policy = TcpListener::bind("127.0.0.1:0").await?;
        let delivery = TcpListener::bind("127.0.0.1:0").await?;
        let policy_addr = policy.local_addr()?;
        let delivery_addr = delivery.local_addr()?;

        let suffix = format!("@{accepted_domain}");
        let policy_task = tokio::spawn(async move {
            while let Ok((stream, _)) = policy.accept().await {
                let suffix = suffix.clone();
                tokio::spawn(async move {
                    let _ = handle_policy(stream, &suffix).await;
                });
            }
        });

        let delivery_task = tokio::spawn(async move {
            while let Ok((stream, _)) = delivery.accept().await {
                tokio::spawn(async move {
                    let _ = handle_delivery(stream).await;
                });
            }
        });

        Ok(Self {
            policy_addr,
            delivery_addr,
            tasks: vec![policy_task, delivery_task],
        })
    }

    #[must_use]
    pub const fn policy_port(&self) -> u16 {
        self.policy_addr.port()
    }

    #[must_use]
    pub const fn delivery_port(&self) -> u16 {
        self.delivery_addr.port()
    }

    pub fn shutdown(self) {
        for task in self.tasks {
            task.abort();
        }
    }
}

async fn handle_policy(stream: TcpStream, accepted_suffix: &str) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    let mut recipient = String::new();

    while reader.read_line(&mut line).await? > 0 {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            let response = if recipient.ends_with(accepted_suffix) {
                "action=OK\n\n"
            } else {
                "action=REJECT Domain not supported\n\n"
            };
            reader.get_mut().write_all(response.as_bytes()).await?;
            break;
        }

        if let Some(value) = trimmed.strip_prefix("recipient=") {
            recipient = value.to_string();
        }
        line.clear();
    }

    Ok(())
}

async fn handle_delivery(stream: TcpStream) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    let mut in_data = false;

    reader
        .get_mut()
        .write_all(b"220 localhost ESMTP Restmail-Receiver\r\n")
        .await?;

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();

        if in_data {
            if trimmed == "." {
                in_data = false;
                reader.get_mut().write_all(b"250 2.0.0 Ok: Queued\r\n").await?;
            }
            continue;
        }

        let command = trimmed.to_uppercase();
        let reply: &[u8] = if command.starts_with("EHLO") || command.starts_with("HELO") {
            b"250 Hello\r\n"
        } else if command.starts_with("MAIL FROM") || command.starts_with("RCPT TO") {
            b"250 Ok\r\n"
        } else if command == "DATA" {
            in_data = true;
            b"354 End data with <CR><LF>.<CR><LF>\r\n"
        } else if command == "QUIT" {
            reader.get_mut().write_all(b"221 Bye\r\n").await?;
            break;
        } else {
            b"500 Unknown\r\n"
        };

        reader.get_mut().write_all(reply).await?;
    }

    Ok(())
}
