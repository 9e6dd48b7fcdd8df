//! Client side of the binary trade exchange.
//!
//! - `connector` — seam through which a transport is opened.
//! - `client` — frames an encoded trade and performs one request/response exchange.
//! - `validator` — compares a decoded response with an injectable expectation.
//! - `harness` — glues the three together and summarises the outcome.
#![warn(missing_docs)]
pub mod client;
pub mod connector;
pub mod harness;
pub mod validator;

pub use client::FramingClient;
pub use connector::{Connector, TcpConnector, Transport};
pub use harness::{Outcome, Report, Verdict};
pub use validator::{EchoTransform, Expectation, Expected, Validation, Validator};
