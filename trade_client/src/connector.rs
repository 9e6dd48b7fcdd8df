//! Connection seam between the framing client and the network.
//!
//! `Connector::connect` is the only way the client acquires a transport, which
//! keeps socket handling out of the framing logic and lets tests substitute a
//! scripted stream.
use log::debug;
use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use trade_common::net::addr;
use trade_common::{Result, TradeError};

/// A bidirectional byte stream with a settable read timeout.
pub trait Transport: Read + Write {
    /// Bounds the next blocking read; `None` blocks indefinitely.
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }
}

/// Opens one fresh transport per call.
pub trait Connector {
    /// Stream type handed to the client.
    type Stream: Transport;

    /// Establishes a connection, giving up after `timeout`.
    fn connect(&self, timeout: Duration) -> Result<Self::Stream>;
}

/// Plain blocking TCP connector.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    host: String,
    port: u16,
}

impl TcpConnector {
    /// Creates a connector for `host:port`; resolution happens on connect.
    pub fn new(host: &str, port: u16) -> Self {
        TcpConnector {
            host: host.to_string(),
            port,
        }
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, timeout: Duration) -> Result<TcpStream> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(TradeError::Connection)?
            .collect();

        let mut last_err = None;
        for target in addrs {
            match TcpStream::connect_timeout(&target, timeout) {
                Ok(stream) => {
                    debug!("Connected to {}", target);
                    return Ok(stream);
                }
                Err(e) => {
                    debug!("Connect to {} failed: {}", target, e);
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) if e.kind() == ErrorKind::TimedOut => TradeError::Timeout(timeout),
            Some(e) => TradeError::Connection(e),
            None => TradeError::Connection(io::Error::new(
                ErrorKind::NotFound,
                format!("{} resolved to no addresses", addr(&self.host, self.port)),
            )),
        })
    }
}
