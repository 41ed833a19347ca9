//! Scriptable TCP peer for probe tests.
//!
//! The stub records every byte it receives and, once the bytes seen on a
//! connection contain a trigger, writes a canned reply. After replying it
//! hangs up, resets the connection, or idles until the client goes away.
//!
//! # Example
//!
//! ```rust,no_run
//! use support::stub_server::StubServer;
//!
//! # async fn example() -> std::io::Result<()> {
//! let server = StubServer::builder()
//!     .reply_when("RCPT TO:", "250 2.0.0 Ok: Queued\r\n")
//!     .build()
//!     .await?;
//!
//! // Point the probe at server.addr()
//!
//! server.shutdown();
//! # Ok(())
//! # }
//! ```

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::RwLock,
    time::timeout,
};

#[derive(Clone, Default)]
struct StubConfig {
    greeting: Option<Vec<u8>>,
    trigger: Option<Vec<u8>>,
    reply: Vec<u8>,
    hang_up: bool,
    reset: bool,
}

pub struct StubServer {
    addr: SocketAddr,
    received: Arc<RwLock<Vec<u8>>>,
    connections: Arc<AtomicUsize>,
    shutdown: Arc<AtomicBool>,
}

impl StubServer {
    #[must_use]
    pub fn builder() -> StubServerBuilder {
        StubServerBuilder::default()
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Everything received so far, across all connections.
    pub async fn received(&self) -> String {
        String::from_utf8_lossy(&self.received.read().await).into_owned()
    }

    #[must_use]
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    async fn handle_client(
        mut stream: TcpStream,
        config: Arc<StubConfig>,
        received: Arc<RwLock<Vec<u8>>>,
    ) -> std::io::Result<()> {
        if let Some(greeting) = &config.greeting {
            stream.write_all(greeting).await?;
        }

        let mut seen = Vec::new();
        let mut chunk = [0u8; 4096];
        let mut replied = false;

        loop {
            let Ok(read) = timeout(Duration::from_secs(30), stream.read(&mut chunk)).await else {
                return Ok(());
            };

            let n = read?;
            if n == 0 {
                return Ok(());
            }

            seen.extend_from_slice(&chunk[..n]);
            received.write().await.extend_from_slice(&chunk[..n]);

            if !replied
                && let Some(trigger) = &config.trigger
                && seen.windows(trigger.len()).any(|w| w == trigger.as_slice())
            {
                stream.write_all(&config.reply).await?;
                stream.flush().await?;
                replied = true;

                if config.reset {
                    stream.set_linger(Some(Duration::ZERO))?;
                    return Ok(());
                }
                if config.hang_up {
                    return Ok(());
                }
            }
        }
    }
}

#[derive(Default)]
pub struct StubServerBuilder {
    config: StubConfig,
}

impl StubServerBuilder {
    /// Bytes written as soon as a client connects.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<Vec<u8>>) -> Self {
        self.config.greeting = Some(greeting.into());
        self
    }

    /// Write `reply` once the received bytes contain `trigger`.
    #[must_use]
    pub fn reply_when(mut self, trigger: impl Into<Vec<u8>>, reply: impl Into<Vec<u8>>) -> Self {
        self.config.trigger = Some(trigger.into());
        self.config.reply = reply.into();
        self
    }

    /// Close the connection right after replying instead of idling.
    #[must_use]
    pub const fn hang_up_after_reply(mut self) -> Self {
        self.config.hang_up = true;
        self
    }

    /// Abort the connection with a RST right after replying.
    #[must_use]
    pub const fn reset_after_reply(mut self) -> Self {
        self.config.reset = true;
        self
    }

    /// Binds to a random local port and starts accepting.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails.
    pub async fn build(self) -> std::io::Result<StubServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = Arc::new(self.config);
        let received = Arc::new(RwLock::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));

        let received_clone = Arc::clone(&received);
        let connections_clone = Arc::clone(&connections);
        let shutdown_clone = Arc::clone(&shutdown);

        tokio::spawn(async move {
            while !shutdown_clone.load(Ordering::Relaxed) {
                let accept = timeout(Duration::from_millis(100), listener.accept()).await;

                if let Ok(Ok((stream, _peer))) = accept {
                    connections_clone.fetch_add(1, Ordering::Relaxed);
                    let config = Arc::clone(&config);
                    let received = Arc::clone(&received_clone);

                    tokio::spawn(async move {
                        let _ = StubServer::handle_client(stream, config, received).await;
                    });
                }
            }
        });

        Ok(StubServer {
            addr,
            received,
            connections,
            shutdown,
        })
    }
}
