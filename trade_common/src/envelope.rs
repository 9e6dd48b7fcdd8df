//! Minimal HTTP/1.1-shaped text envelope around a binary payload.
//!
//! Only what the exchange needs is understood: the request line, a handful of
//! fixed headers and the blank line separating the head from the raw body.
use crate::error::TradeError;
use crate::result::Result;

/// Header/body separator.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
/// Content type of every binary payload.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Builds a `POST` request carrying `payload` verbatim after the headers.
pub fn build_request(host: &str, port: u16, endpoint: &str, payload: &[u8]) -> Vec<u8> {
    let head = format!(
        "POST {endpoint} HTTP/1.1\r\n\
         Host: {host}:{port}\r\n\
         Content-Type: {OCTET_STREAM}\r\n\
         Content-Length: {}\r\n\
         \r\n",
        payload.len()
    );
    let mut out = Vec::with_capacity(head.len() + payload.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(payload);
    out
}

/// Builds a response that asks the peer to treat connection close as the end.
pub fn build_response(status: u16, reason: &str, body: &[u8]) -> Vec<u8> {
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: {OCTET_STREAM}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    let mut out = Vec::with_capacity(head.len() + body.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    out
}

/// Returns the index just past the first `\r\n\r\n`, if present.
pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| pos + HEADER_TERMINATOR.len())
}

/// Case-insensitive `Content-Length` lookup in a header block.
pub fn content_length(head: &str) -> Option<usize> {
    head.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

/// A response split into its textual head and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Status line and headers, including the terminating blank line.
    pub head: String,
    /// Everything after the header terminator.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// First line of the head.
    pub fn status_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    /// Second token of the status line (e.g. `404`), if any.
    pub fn status_code(&self) -> Option<&str> {
        self.status_line().split_whitespace().nth(1)
    }

    /// True when the status line reports `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status_line().contains("200 OK")
    }
}

/// Splits an accumulated response at the first header terminator.
pub fn split_response(buf: &[u8]) -> Result<RawResponse> {
    let end = find_header_end(buf).ok_or_else(|| {
        TradeError::MalformedResponse(format!(
            "no header terminator in {} bytes of response",
            buf.len()
        ))
    })?;
    Ok(RawResponse {
        head: String::from_utf8_lossy(&buf[..end]).into_owned(),
        body: buf[end..].to_vec(),
    })
}
