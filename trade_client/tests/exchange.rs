// trade_client/tests/exchange.rs
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use trade_client::harness::{self, Outcome};
use trade_client::{FramingClient, Validator};
use trade_common::envelope::{build_request, build_response, content_length, find_header_end};
use trade_common::net::TRADE_ENDPOINT;
use trade_common::{TRADE_MESSAGE_LEN, TradeError, TradeMessage};

const HOST: &str = "127.0.0.1";

fn reference_trade() -> TradeMessage {
    TradeMessage::new(12345, b'A', 99.5, 1000)
}

/// Reads one request (head plus `Content-Length` bytes of body).
fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 256];
    loop {
        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).into_owned();
            let len = content_length(&head).unwrap_or(0);
            if buf.len() >= end + len {
                return buf;
            }
        }
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            return buf;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Accepts a single connection on an ephemeral port and hands it to `handler`
/// together with the request bytes. The join handle yields the request.
fn serve_once<F>(handler: F) -> (u16, JoinHandle<Vec<u8>>)
where
    F: FnOnce(&mut TcpStream, &[u8]) + Send + 'static,
{
    let listener = TcpListener::bind((HOST, 0)).expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        handler(&mut stream, &request);
        request
    });
    (port, handle)
}

fn echo_transform(stream: &mut TcpStream, request: &[u8]) {
    let end = find_header_end(request).expect("request head");
    let trade = TradeMessage::decode(&request[end..]).expect("request body");
    let reply = TradeMessage::new(
        trade.trade_id,
        trade.symbol,
        trade.price * 1.01,
        trade.quantity * 2,
    );
    stream
        .write_all(&build_response(200, "OK", &reply.encode()))
        .expect("write response");
}

#[test]
fn echo_server_response_validates() {
    let (port, server) = serve_once(echo_transform);
    let client = FramingClient::tcp(HOST, port);

    let outcome = harness::run(&client, &Validator::default(), &reference_trade()).unwrap();
    assert!(outcome.passed());
    match outcome {
        Outcome::Validated { response, validation } => {
            assert_eq!(response.trade_id, 12345);
            assert_eq!(response.symbol, b'A');
            assert_eq!(response.quantity, 2000);
            assert!(validation.price_match && validation.quantity_match);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let received = server.join().unwrap();
    let expected = build_request(HOST, port, TRADE_ENDPOINT, &reference_trade().encode());
    assert_eq!(received, expected);
    assert_eq!(received.len() - find_header_end(&received).unwrap(), TRADE_MESSAGE_LEN);
}

#[test]
fn wrong_transform_is_reported_not_raised() {
    let (port, server) = serve_once(|stream, _| {
        let reply = TradeMessage::new(12345, b'A', 100.495, 1999);
        stream
            .write_all(&build_response(200, "OK", &reply.encode()))
            .unwrap();
    });
    let client = FramingClient::tcp(HOST, port);

    let outcome = harness::run(&client, &Validator::default(), &reference_trade()).unwrap();
    assert!(!outcome.passed());
    match outcome {
        Outcome::Validated { validation, .. } => {
            assert!(validation.price_match);
            assert!(!validation.quantity_match);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn non_ok_status_skips_validation() {
    let (port, server) = serve_once(|stream, _| {
        stream
            .write_all(&build_response(404, "Not Found", b""))
            .unwrap();
    });
    let client = FramingClient::tcp(HOST, port);

    let outcome = harness::run(&client, &Validator::default(), &reference_trade()).unwrap();
    assert_eq!(
        outcome,
        Outcome::Rejected {
            status_line: "HTTP/1.1 404 Not Found".to_string()
        }
    );
    server.join().unwrap();
}

#[test]
fn close_without_terminator_is_malformed() {
    let (port, server) = serve_once(|stream, _| {
        stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Type: x").unwrap();
    });
    let client = FramingClient::tcp(HOST, port);

    let err = client.exchange(&reference_trade()).unwrap_err();
    assert!(matches!(err, TradeError::MalformedResponse(_)), "{err:?}");
    server.join().unwrap();
}

#[test]
fn short_body_is_truncated() {
    let (port, server) = serve_once(|stream, _| {
        stream
            .write_all(&build_response(200, "OK", &[0u8; 10]))
            .unwrap();
    });
    let client = FramingClient::tcp(HOST, port);

    let err = harness::run(&client, &Validator::default(), &reference_trade()).unwrap_err();
    assert!(
        matches!(err, TradeError::TruncatedMessage { needed: 21, available: 10 }),
        "{err:?}"
    );
    server.join().unwrap();
}

#[test]
fn held_open_connection_times_out() {
    let (port, server) = serve_once(|stream, _| {
        // Full response, but the connection stays open past the client's window.
        let reply = TradeMessage::new(12345, b'A', 100.495, 2000);
        stream
            .write_all(&build_response(200, "OK", &reply.encode()))
            .unwrap();
        thread::sleep(Duration::from_millis(1500));
    });
    let window = Duration::from_millis(300);
    let client = FramingClient::tcp(HOST, port).with_timeout(window);

    let started = Instant::now();
    let err = client.exchange(&reference_trade()).unwrap_err();
    assert!(matches!(err, TradeError::Timeout(t) if t == window), "{err:?}");
    assert!(started.elapsed() < Duration::from_millis(1400));
    server.join().unwrap();
}

#[test]
fn silent_server_times_out() {
    let (port, server) = serve_once(|_, _| thread::sleep(Duration::from_millis(1000)));
    let client = FramingClient::tcp(HOST, port).with_timeout(Duration::from_millis(200));

    let err = harness::run(&client, &Validator::default(), &reference_trade()).unwrap_err();
    assert!(matches!(err, TradeError::Timeout(_)), "{err:?}");
    server.join().unwrap();
}

#[test]
fn refused_connection_is_a_connection_error() {
    let port = {
        let listener = TcpListener::bind((HOST, 0)).unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = FramingClient::tcp(HOST, port);

    let err = client.exchange(&reference_trade()).unwrap_err();
    assert!(matches!(err, TradeError::Connection(_)), "{err:?}");
}
