//! A single request/response exchange over plain TCP.
//!
//! The exchange connects, writes the whole payload, then drains whatever the
//! peer sends until it either closes the connection or stays quiet for the
//! endpoint timeout. A quiet peer is treated as a finished response, not an
//! error: the services this probes send their final line and then idle
//! instead of hanging up.
//!
//! That rule cannot tell a peer that paused mid-response from one that is
//! done. It is kept as-is because changing it changes when a run passes.

use std::{borrow::Cow, net::SocketAddr};

use restmail_probe_common::{Endpoint, incoming, internal, outgoing};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, lookup_host},
    time::timeout,
};

use crate::error::{ExchangeError, Result};

/// Size of each read from the socket.
const CHUNK_SIZE: usize = 4096;

/// Upper bound on the bytes kept from one response (1MB).
const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

/// Why reading stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The peer closed its side of the connection.
    PeerClosed,
    /// No bytes arrived within the timeout.
    Quiescent,
    /// The response reached [`MAX_RESPONSE_SIZE`] and the rest was not read.
    Truncated,
}

/// The bytes collected from a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    bytes: Vec<u8>,
    completion: Completion,
}

impl Reply {
    #[must_use]
    pub const fn new(bytes: Vec<u8>, completion: Completion) -> Self {
        Self { bytes, completion }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub const fn completion(&self) -> Completion {
        self.completion
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The response as text, with invalid UTF-8 replaced rather than
    /// rejected.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Runs one exchange against `endpoint`.
///
/// There are no retries. The socket belongs to this call and is closed when
/// it returns, whichever way it returns.
///
/// # Errors
///
/// Returns an [`ExchangeError`] if the endpoint cannot be resolved or
/// connected to in time, or if the connection breaks while writing or
/// reading. A read timeout is not an error.
pub async fn exchange(endpoint: &Endpoint, payload: &[u8]) -> Result<Reply> {
    let target = endpoint.to_string();

    let mut stream = timeout(endpoint.timeout, connect(endpoint, &target))
        .await
        .map_err(|_| ExchangeError::ConnectTimeout {
            target: target.clone(),
            timeout: endpoint.timeout,
        })??;

    outgoing!(level = DEBUG, "Sending {} bytes to {target}", payload.len());

    stream
        .write_all(payload)
        .await
        .map_err(|source| ExchangeError::Write {
            target: target.clone(),
            source,
        })?;
    stream
        .flush()
        .await
        .map_err(|source| ExchangeError::Write {
            target: target.clone(),
            source,
        })?;

    let reply = drain(&mut stream, endpoint, &target).await?;

    incoming!(
        level = DEBUG,
        "Received {} bytes from {target} ({:?})",
        reply.bytes.len(),
        reply.completion
    );

    Ok(reply)
}

/// Resolves the endpoint and connects to the first address that accepts.
async fn connect(endpoint: &Endpoint, target: &str) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = lookup_host((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(|source| ExchangeError::Resolve {
            target: target.to_string(),
            source,
        })?
        .collect();

    let mut last_error = None;

    for addr in addrs {
        internal!("Connecting to {addr} for {target}");

        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                internal!(level = DEBUG, "Connection to {addr} failed: {err}");
                last_error = Some(err);
            }
        }
    }

    Err(last_error.map_or_else(
        || ExchangeError::NoAddress(target.to_string()),
        |source| ExchangeError::Connect {
            target: target.to_string(),
            source,
        },
    ))
}

/// Reads until the peer closes, goes quiet for the endpoint timeout, or the
/// response hits the size cap.
async fn drain(stream: &mut TcpStream, endpoint: &Endpoint, target: &str) -> Result<Reply> {
    let mut response = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    let completion = loop {
        let Ok(read) = timeout(endpoint.timeout, stream.read(&mut chunk)).await else {
            break Completion::Quiescent;
        };

        let n = read.map_err(|source| ExchangeError::Read {
            target: target.to_string(),
            source,
        })?;

        if n == 0 {
            break Completion::PeerClosed;
        }

        incoming!("{}", String::from_utf8_lossy(&chunk[..n]));

        // Only bytes that do not fit make the reply truncated.
        let room = MAX_RESPONSE_SIZE - response.len();
        if n > room {
            response.extend_from_slice(&chunk[..room]);
            break Completion::Truncated;
        }
        response.extend_from_slice(&chunk[..n]);
    };

    Ok(Reply::new(response, completion))
}
