//! Network thread (§5): owns the read half of the FSD TCP socket on a
//! dedicated background thread, decodes PDUs with (A)/(B), and pushes
//! semantic events onto a bounded channel the simulator thread drains once
//! per frame.
//!
//! Grounded on the teacher's `soap_client::pool::ConnectionPool`
//! (`thread::Builder::spawn`, `Arc<AtomicBool>` running flag, join-on-drop)
//! simplified from a pool of pre-warmed connections to a single persistent
//! socket, since spec.md §5 describes exactly one live FSD connection per
//! session with no reconnection pooling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, warn};

use crate::error::{ProtocolError, TransportError};
use crate::pdu::{self, Pdu};
use crate::statistics::StatisticsEngine;
use crate::transport::LineTransport;

/// Capacity of the network-thread → simulator-thread event queue. Sized
/// generously above any plausible per-frame burst of traffic.
const EVENT_QUEUE_CAPACITY: usize = 1024;

/// One semantic event handed from the network thread to the simulator
/// thread (§5). PDUs are forwarded wholesale; parse failures are reported
/// separately so the caller can log-and-skip per §7 rather than treating
/// them as fatal.
#[derive(Debug)]
pub enum NetworkEvent {
    Pdu(Pdu),
    ProtocolError(ProtocolError),
    Disconnected(TransportError),
}

/// Owns the network thread and the channel it feeds. Dropping a
/// `Connection` signals the thread to stop and joins it with a bounded wait
/// (§5 "disconnect ... joins the network thread with a bounded wait").
pub struct Connection {
    events: Receiver<NetworkEvent>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Connection {
    /// Spawns the network thread over `read_half`, a transport clone whose
    /// socket shares the underlying fd with the simulator thread's write
    /// half (see [`crate::transport::LineTransport::try_clone`]). `stats`
    /// is shared with the owning [`crate::session::Session`] so inbound
    /// traffic counts toward the same counters as outbound sends.
    pub fn spawn(mut read_half: LineTransport, stats: Arc<StatisticsEngine>) -> Self {
        let (tx, rx): (Sender<NetworkEvent>, Receiver<NetworkEvent>) = bounded(EVENT_QUEUE_CAPACITY);
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let worker = thread::Builder::new().name("fsd-network".to_string());
        let handle = worker
            .spawn(move || {
                while thread_running.load(Ordering::Relaxed) {
                    match read_half.read_line() {
                        Ok(Some(line)) => {
                            debug!("<< {line}");
                            match pdu::parse_line(&line) {
                                Ok(pdu) => {
                                    stats.increment_received();
                                    if tx.send(NetworkEvent::Pdu(pdu)).is_err() {
                                        break;
                                    }
                                }
                                Err(e) => {
                                    warn!("dropping malformed PDU: {e}");
                                    stats.increment_error();
                                    if tx.send(NetworkEvent::ProtocolError(e)).is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                        Ok(None) => {
                            let _ = tx.send(NetworkEvent::Disconnected(TransportError::Closed(
                                "peer closed connection".to_string(),
                            )));
                            break;
                        }
                        Err(e) => {
                            let _ = tx.send(NetworkEvent::Disconnected(e));
                            break;
                        }
                    }
                }
            })
            .expect("failed to spawn fsd-network thread");

        Connection {
            events: rx,
            running,
            handle: Some(handle),
        }
    }

    /// Non-blocking drain of every event queued since the last call,
    /// satisfying §5's "drains it at the top of each frame" ordering
    /// guarantee (the channel is FIFO and the decoder is serial, so
    /// per-callsign wire order is preserved).
    pub fn drain(&self) -> Vec<NetworkEvent> {
        self.events.try_iter().collect()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            // The read is already unblocked by the peer socket having been
            // closed by the caller before dropping this Connection; join
            // is therefore expected to return promptly. A hung read would
            // block here indefinitely since std sockets have no portable
            // "interrupt a blocking read" primitive; callers close the
            // socket first (see Session::disconnect) to avoid this.
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::{TcpListener, TcpStream};
    use std::time::Duration;

    #[test]
    fn forwards_parsed_pdus_in_wire_order() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.write_all(b"$DISERVER:CLIENT:v1:abc\r\n#PCN1:SERVER:HBEAT\r\n").unwrap();
            thread::sleep(Duration::from_millis(50));
        });

        let stream = TcpStream::connect(addr).unwrap();
        let transport = LineTransport::new(stream);
        let connection = Connection::spawn(transport, StatisticsEngine::new());

        thread::sleep(Duration::from_millis(100));
        let events = connection.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], NetworkEvent::Pdu(Pdu::ServerIdentification(_))));
        assert!(matches!(events[1], NetworkEvent::Pdu(Pdu::Heartbeat(_))));

        server.join().unwrap();
    }

    #[test]
    fn reports_disconnect_on_peer_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (_sock, _) = listener.accept().unwrap();
        });

        let stream = TcpStream::connect(addr).unwrap();
        let transport = LineTransport::new(stream);
        let connection = Connection::spawn(transport, StatisticsEngine::new());

        server.join().unwrap();
        thread::sleep(Duration::from_millis(100));

        let events = connection.drain();
        assert!(matches!(events.last(), Some(NetworkEvent::Disconnected(_))));
    }
}
