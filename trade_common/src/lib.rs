//!
//! Common types and utilities shared by the trade server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `TradeError` used across the workspace.
//! - `result` — handy `Result<T, TradeError>` alias.
//! - `message` — the fixed 21-byte `TradeMessage` codec.
//! - `envelope` — text envelope built around the binary payload.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod envelope;
pub mod error;
pub mod message;
pub mod net;
pub mod result;

pub use envelope::RawResponse;
pub use error::TradeError;
pub use message::{TRADE_MESSAGE_LEN, TradeMessage};
pub use result::Result;
