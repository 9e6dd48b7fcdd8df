//! Reference server for the binary trade endpoint.
//!
//! Accepts `POST /api/trade/sbe` carrying one 21-byte trade message and answers
//! with the same trade, price scaled by 1.01 and quantity doubled. One request
//! per connection; every response is sent with `Connection: close` and the
//! socket is closed afterwards.
//!
//! Threads:
//! - the main thread runs the accept loop (`TradeReceiver`);
//! - a fixed pool of workers (`worker::spawn_workers`) receives accepted
//!   `TcpStream`s over a `crossbeam_channel` and serves them one by one.
//!
//! Ctrl+C sets a shutdown flag; the accept loop exits, the channel is dropped
//! and the workers finish their current connection before joining.
#![warn(missing_docs)]
mod args;
mod handler;
mod receiver;
mod worker;

use crate::args::Args;
use crate::receiver::TradeReceiver;
use clap::Parser;
use crossbeam_channel::unbounded;
use log::{error, info};
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use trade_common::{Result, TradeError};

fn main() -> Result<(), TradeError> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down server...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| TradeError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let (conn_tx, conn_rx) = unbounded::<TcpStream>();
    let workers = worker::spawn_workers(args.workers.max(1), conn_rx);

    let receiver = TradeReceiver::new(&args.bind)?;
    let result = receiver.receive_loop_with_channel(conn_tx, shutdown);
    if let Err(e) = &result {
        error!("Receiver loop failed: {}", e);
    }

    for handle in workers {
        if handle.join().is_err() {
            error!("Worker thread panicked");
        }
    }
    info!("Server stopped");
    result
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
