//! Fixed-layout binary trade message.
//!
//! The payload carries no header, tag or length prefix; field positions are
//! part of the contract:
//!
//! ```text
//! [0..8]   trade_id (u64 LE)
//! [8]      symbol   (u8, raw code point)
//! [9..17]  price    (f64 IEEE-754 LE)
//! [17..21] quantity (i32 LE, two's complement)
//! ```
//!
//! Byte order is explicit and independent of the host. Decoding reads the
//! first 21 bytes of a buffer and ignores anything after them.
use serde::{Deserialize, Serialize};

use crate::error::TradeError;
use crate::result::Result;

/// Encoded size of a [`TradeMessage`] in bytes.
pub const TRADE_MESSAGE_LEN: usize = 21;

const TRADE_ID_OFFSET: usize = 0;
const SYMBOL_OFFSET: usize = 8;
const PRICE_OFFSET: usize = 9;
const QUANTITY_OFFSET: usize = 17;

/// A single trade command as exchanged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeMessage {
    /// Trade identifier.
    pub trade_id: u64,
    /// Single-character instrument code (raw byte).
    pub symbol: u8,
    /// Unscaled price.
    pub price: f64,
    /// Signed quantity.
    pub quantity: i32,
}

impl TradeMessage {
    /// Creates a message from values already in their wire widths.
    pub fn new(trade_id: u64, symbol: u8, price: f64, quantity: i32) -> Self {
        TradeMessage {
            trade_id,
            symbol,
            price,
            quantity,
        }
    }

    /// Creates a message from wider input values, rejecting any field that
    /// does not fit its declared width with [`TradeError::FieldOverflow`].
    pub fn checked(trade_id: u128, symbol: u32, price: f64, quantity: i64) -> Result<Self> {
        let trade_id =
            u64::try_from(trade_id).map_err(|_| TradeError::overflow("trade_id", trade_id))?;
        let symbol = u8::try_from(symbol).map_err(|_| TradeError::overflow("symbol", symbol))?;
        let quantity =
            i32::try_from(quantity).map_err(|_| TradeError::overflow("quantity", quantity))?;
        Ok(Self::new(trade_id, symbol, price, quantity))
    }

    /// Symbol rendered as a character (Latin-1 interpretation of the byte).
    pub fn symbol_char(&self) -> char {
        char::from(self.symbol)
    }

    /// Encodes the message into its fixed 21-byte representation.
    pub fn encode(&self) -> [u8; TRADE_MESSAGE_LEN] {
        let mut buf = [0u8; TRADE_MESSAGE_LEN];
        buf[TRADE_ID_OFFSET..SYMBOL_OFFSET].copy_from_slice(&self.trade_id.to_le_bytes());
        buf[SYMBOL_OFFSET] = self.symbol;
        buf[PRICE_OFFSET..QUANTITY_OFFSET].copy_from_slice(&self.price.to_le_bytes());
        buf[QUANTITY_OFFSET..TRADE_MESSAGE_LEN].copy_from_slice(&self.quantity.to_le_bytes());
        buf
    }

    /// Appends the encoded bytes to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.encode());
    }

    /// Decodes a message from the first 21 bytes of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < TRADE_MESSAGE_LEN {
            return Err(TradeError::TruncatedMessage {
                needed: TRADE_MESSAGE_LEN,
                available: buf.len(),
            });
        }

        Ok(TradeMessage {
            trade_id: u64::from_le_bytes(read_array(buf, TRADE_ID_OFFSET)),
            symbol: buf[SYMBOL_OFFSET],
            price: f64::from_le_bytes(read_array(buf, PRICE_OFFSET)),
            quantity: i32::from_le_bytes(read_array(buf, QUANTITY_OFFSET)),
        })
    }
}

// Callers check the buffer length first.
fn read_array<const N: usize>(buf: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[offset..offset + N]);
    out
}
