use crossbeam_channel::Sender;
use log::{debug, error, info};
use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use trade_common::{Result, TradeError};

/// How often the accept loop re-checks the shutdown flag while idle.
const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// TCP acceptor for the trade endpoint.
///
/// Accepted connections are handed to the worker pool through a channel; the
/// receiver itself never reads from a client.
pub struct TradeReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl TradeReceiver {
    /// Bind a new TCP receiver to the provided `bind_addr` (e.g., `0.0.0.0:3000`).
    pub fn new(bind_addr: &str) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket })
    }

    /// Accepts connections and forwards them to `tx` until `shutdown` is set.
    pub(crate) fn receive_loop_with_channel(
        self,
        tx: Sender<TcpStream>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        info!("Trade server is started on {}", self.socket.local_addr()?);

        while !shutdown.load(Ordering::Relaxed) {
            match self.socket.accept() {
                Ok((stream, addr)) => {
                    debug!("Accepted {}", addr);
                    stream.set_nonblocking(false)?;
                    tx.send(stream)
                        .map_err(|e| TradeError::ChannelSend(e.to_string()))?;
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        info!("Accept loop stopping...");
        Ok(())
    }
}
