//! Fixed pool of connection workers fed over a crossbeam channel.
use crate::handler::{self, Status};
use crossbeam_channel::Receiver;
use log::{debug, error, info, warn};
use std::io::Write;
use std::net::TcpStream;
use std::thread::{self, JoinHandle};
use trade_common::envelope::build_response;
use trade_common::net::REQUEST_TIMEOUT;
use trade_common::{Result, TradeError};

/// Spawns `count` workers that each serve connections until `rx` disconnects.
pub fn spawn_workers(count: usize, rx: Receiver<TcpStream>) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let rx = rx.clone();
            thread::spawn(move || {
                debug!("Worker {} started", id);
                for stream in rx.iter() {
                    if let Err(e) = handle_connection(stream) {
                        error!("Worker {}: connection error: {}", id, e);
                    }
                }
                debug!("Worker {} stopping", id);
            })
        })
        .collect()
}

/// Serves exactly one request on `stream`, then closes it.
pub fn handle_connection(mut stream: TcpStream) -> Result<()> {
    let peer = stream.peer_addr()?;
    stream.set_read_timeout(Some(REQUEST_TIMEOUT))?;

    let (status, body) = match handler::read_request(&mut stream) {
        Ok(request) => handler::respond(&request),
        Err(TradeError::Format(reason)) => {
            warn!("Bad request from {}: {}", peer, reason);
            (Status::BadRequest, Vec::new())
        }
        Err(e) => return Err(e),
    };

    info!("{} -> {} {}", peer, status.code(), status);
    stream.write_all(&build_response(status.code(), &status.to_string(), &body))?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Read;
    use std::net::TcpListener;
    use trade_common::envelope::{build_request, split_response};
    use trade_common::net::TRADE_ENDPOINT;
    use trade_common::TradeMessage;

    fn round_trip(request: &[u8]) -> Vec<u8> {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = unbounded();
        let workers = spawn_workers(2, rx);

        let mut client = TcpStream::connect(addr).unwrap();
        let (accepted, _) = listener.accept().unwrap();
        tx.send(accepted).unwrap();
        drop(tx);

        client.write_all(request).unwrap();
        let mut response = Vec::new();
        client.read_to_end(&mut response).unwrap();

        for handle in workers {
            handle.join().unwrap();
        }
        response
    }

    #[test]
    fn serves_one_trade_then_closes() {
        let trade = TradeMessage::new(12345, b'A', 99.5, 1000);
        let raw = round_trip(&build_request("127.0.0.1", 3000, TRADE_ENDPOINT, &trade.encode()));

        let response = split_response(&raw).unwrap();
        assert!(response.is_ok());
        assert!(response.head.contains("Connection: close\r\n"));
        let reply = TradeMessage::decode(&response.body).unwrap();
        assert_eq!(reply.quantity, 2000);
        assert!((reply.price - 100.495).abs() < 1e-9);
    }

    #[test]
    fn undecodable_body_gets_bad_request() {
        let raw = round_trip(b"POST /api/trade/sbe HTTP/1.1\r\nContent-Length: 5\r\n\r\nshort");
        let response = split_response(&raw).unwrap();
        assert_eq!(response.status_code(), Some("400"));
        assert!(response.body.is_empty());
    }
}
