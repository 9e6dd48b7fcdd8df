//! Shared networking constants and helpers used by client and server.
use std::time::Duration;

/// TCP port the trade endpoint listens on.
pub const DEFAULT_PORT: u16 = 3000;
/// Host the client targets when none is given.
pub const DEFAULT_HOST: &str = "localhost";
/// Request path accepting binary trade messages.
pub const TRADE_ENDPOINT: &str = "/api/trade/sbe";
/// Window for connecting plus receiving the full response.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Size of each socket read while accumulating a response.
pub const READ_CHUNK: usize = 1024;

/// Helper to format a host with a port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}
