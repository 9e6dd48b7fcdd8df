//! Trade Client — sends one binary trade message to the trade endpoint, decodes the
//! reply and checks that the server applied the expected transform (price × 1.01,
//! quantity × 2).
//!
//! Usage example (CLI):
//! ```bash
//! trade_client --host 127.0.0.1 --port 3000 --symbol A --price 99.5 --quantity 1000
//! ```
//!
//! The process exits with status 0 when the response validates and 1 otherwise.
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use trade_client::harness::{self, Report};
use trade_client::{FramingClient, Validator};
use trade_common::{Result, TradeMessage};

fn main() -> Result<ExitCode> {
    init_logger();
    let args = Args::parse();

    let request = TradeMessage::checked(args.trade_id, args.symbol, args.price, args.quantity)?;
    info!(
        "Trade request: id={} symbol={} price={} quantity={}",
        request.trade_id,
        request.symbol_char(),
        request.price,
        request.quantity
    );

    let client = FramingClient::tcp(&args.host, args.port).with_endpoint(&args.endpoint);
    let validator = Validator::default();

    let outcome = match harness::run(&client, &validator, &request) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Exchange failed: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = Report::new(request, outcome);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!("Result: {}", report.verdict);
    if report.outcome.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
