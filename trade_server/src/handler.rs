//! Request parsing, routing and the echo transform.
//!
//! Every connection carries exactly one request. The reply always asks the
//! client to treat connection close as the end of the response.
use log::{debug, info, warn};
use std::io::{ErrorKind, Read};
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use trade_common::envelope::{content_length, find_header_end};
use trade_common::net::{READ_CHUNK, TRADE_ENDPOINT};
use trade_common::{Result, TRADE_MESSAGE_LEN, TradeError, TradeMessage};

/// Largest accepted header block.
const MAX_HEAD_LEN: usize = 8 * 1024;
/// Largest accepted body; anything bigger cannot be a single trade.
const MAX_BODY_LEN: usize = 4 * TRADE_MESSAGE_LEN;

/// Price multiplier applied by the echo transform.
pub const PRICE_FACTOR: f64 = 1.01;
/// Quantity multiplier applied by the echo transform.
pub const QUANTITY_FACTOR: i32 = 2;

/// Request methods recognised on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

/// Response statuses the server can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Status {
    #[strum(to_string = "OK")]
    Ok,
    #[strum(to_string = "Bad Request")]
    BadRequest,
    #[strum(to_string = "Not Found")]
    NotFound,
    #[strum(to_string = "Method Not Allowed")]
    MethodNotAllowed,
    #[strum(to_string = "Unprocessable Entity")]
    UnprocessableEntity,
}

impl Status {
    /// Numeric status code.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::UnprocessableEntity => 422,
        }
    }
}

/// Raw request split into head text and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    /// Request line and headers.
    pub head: String,
    /// `Content-Length` bytes following the head.
    pub body: Vec<u8>,
}

/// Reads one request: the head up to the blank line, then `Content-Length`
/// bytes of body.
pub fn read_request<R: Read>(stream: &mut R) -> Result<RawRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    let head_end = loop {
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
        if buf.len() > MAX_HEAD_LEN {
            return Err(TradeError::Format(format!(
                "request head exceeds {} bytes",
                MAX_HEAD_LEN
            )));
        }
        let n = read_some(stream, &mut chunk)?;
        if n == 0 {
            return Err(TradeError::Format(
                "connection closed before end of request head".to_string(),
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let body_len = content_length(&head).unwrap_or(0);
    if body_len > MAX_BODY_LEN {
        return Err(TradeError::Format(format!(
            "body of {} bytes exceeds {}",
            body_len, MAX_BODY_LEN
        )));
    }

    let mut body = buf.split_off(head_end);
    while body.len() < body_len {
        let n = read_some(stream, &mut chunk)?;
        if n == 0 {
            return Err(TradeError::Format(format!(
                "connection closed after {} of {} body bytes",
                body.len(),
                body_len
            )));
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(body_len);

    Ok(RawRequest { head, body })
}

fn read_some<R: Read>(stream: &mut R, chunk: &mut [u8]) -> Result<usize> {
    loop {
        match stream.read(chunk) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(TradeError::Io(e)),
        }
    }
}

/// Applies the echo transform: price × 1.01, quantity × 2, other fields kept.
///
/// Returns `None` when the doubled quantity does not fit in 32 bits.
pub fn transform(trade: &TradeMessage) -> Option<TradeMessage> {
    let quantity = trade.quantity.checked_mul(QUANTITY_FACTOR)?;
    Some(TradeMessage::new(
        trade.trade_id,
        trade.symbol,
        trade.price * PRICE_FACTOR,
        quantity,
    ))
}

/// Routes a parsed request and returns the status plus response body.
pub fn respond(request: &RawRequest) -> (Status, Vec<u8>) {
    let request_line = request.head.lines().next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path), Some(_version)) = (parts.next(), parts.next(), parts.next())
    else {
        warn!("Malformed request line: {:?}", request_line);
        return (Status::BadRequest, Vec::new());
    };

    if path != TRADE_ENDPOINT {
        debug!("No route for {}", path);
        return (Status::NotFound, Vec::new());
    }

    match Method::from_str(method) {
        Ok(Method::Post) => {}
        Ok(other) => {
            debug!("{} not allowed on {}", other, path);
            return (Status::MethodNotAllowed, Vec::new());
        }
        Err(_) => {
            warn!("Unknown method {:?}", method);
            return (Status::BadRequest, Vec::new());
        }
    }

    let trade = match TradeMessage::decode(&request.body) {
        Ok(trade) => trade,
        Err(e) => {
            warn!("Rejecting body: {}", e);
            return (Status::BadRequest, Vec::new());
        }
    };
    info!(
        "Trade received: id={} symbol={} price={} quantity={}",
        trade.trade_id,
        trade.symbol_char(),
        trade.price,
        trade.quantity
    );

    match transform(&trade) {
        Some(reply) => (Status::Ok, reply.encode().to_vec()),
        None => {
            warn!("Quantity {} overflows when doubled", trade.quantity);
            (Status::UnprocessableEntity, Vec::new())
        }
    }
}
