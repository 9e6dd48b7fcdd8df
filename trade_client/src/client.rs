//! Single-shot request/response exchange over one blocking connection.
//!
//! The response is delimited by the peer closing the connection. A transfer
//! cut short by a close looks exactly like a complete one, and a server that
//! keeps the connection open will run into the timeout. Both are accepted
//! limitations of this client.
use crate::connector::{Connector, TcpConnector, Transport};
use log::{debug, info};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};
use trade_common::envelope::{self, RawResponse};
use trade_common::net::{READ_CHUNK, REQUEST_TIMEOUT, TRADE_ENDPOINT};
use trade_common::{Result, TradeError, TradeMessage};

/// Frames a `TradeMessage` in a text envelope and performs one exchange.
#[derive(Debug, Clone)]
pub struct FramingClient<C> {
    connector: C,
    host: String,
    port: u16,
    endpoint: String,
    timeout: Duration,
}

impl FramingClient<TcpConnector> {
    /// Client talking TCP to `host:port`.
    pub fn tcp(host: &str, port: u16) -> Self {
        Self::new(TcpConnector::new(host, port), host, port)
    }
}

impl<C: Connector> FramingClient<C> {
    /// Creates a client; `host` and `port` only fill the `Host` header here.
    pub fn new(connector: C, host: &str, port: u16) -> Self {
        FramingClient {
            connector,
            host: host.to_string(),
            port,
            endpoint: TRADE_ENDPOINT.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the request path.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Overrides the connect + response window.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `request` and returns the response split into head and body.
    ///
    /// The connection lives only for the duration of this call.
    pub fn exchange(&self, request: &TradeMessage) -> Result<RawResponse> {
        let mut stream = self.connector.connect(self.timeout)?;
        let deadline = Instant::now() + self.timeout;

        let payload = request.encode();
        let framed = envelope::build_request(&self.host, self.port, &self.endpoint, &payload);
        info!(
            "POST {} to {}:{} ({} byte payload)",
            self.endpoint,
            self.host,
            self.port,
            payload.len()
        );

        stream
            .write_all(&framed)
            .and_then(|_| stream.flush())
            .map_err(TradeError::Connection)?;

        let raw = read_until_close(&mut stream, deadline, self.timeout)?;
        debug!("Received {} bytes before close", raw.len());
        envelope::split_response(&raw)
    }
}

fn read_until_close<T: Transport>(
    stream: &mut T,
    deadline: Instant,
    window: Duration,
) -> Result<Vec<u8>> {
    let mut response = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TradeError::Timeout(window));
        }
        stream.set_read_timeout(Some(remaining))?;

        match stream.read(&mut chunk) {
            Ok(0) => return Ok(response),
            Ok(n) => response.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(TradeError::Timeout(window));
            }
            Err(e) => return Err(TradeError::Connection(e)),
        }
    }
}
