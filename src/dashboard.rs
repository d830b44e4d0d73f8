// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::{log, state::Telemetry};
use std::{
    error::Error,
    fmt::Display,
    io::{self, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, SendError, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

/// Serves the most recent telemetry snapshot as one JSON object per TCP
/// connection, so the dashboard values can be watched with nothing fancier
/// than netcat.
pub struct Dashboard {
    tx: mpsc::Sender<Telemetry>,
    addr: SocketAddr,
    handle: JoinHandle<DashboardResult<()>>,
    should_stop: Arc<AtomicBool>,
}

impl Dashboard {
    /// Creates and binds the dashboard server. Lines about connections go
    /// through the given logger branch.
    pub fn new(addr: SocketAddr, branch: Sender<log::Line>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Telemetry>();
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_ref = should_stop.clone();
        let listener = TcpListener::bind(addr)?;
        let addr = listener.local_addr()?;

        Ok(Self {
            tx,
            addr,
            handle: thread::spawn(move || -> DashboardResult<()> {
                let mut state: Option<Telemetry> = None;

                loop {
                    if should_stop_ref.load(Ordering::Relaxed) {
                        break;
                    }

                    let (stream, peer) = match listener.accept() {
                        Ok(v) => v,
                        Err(_) => continue,
                    };

                    let _ = branch.send(log::Line::Info(format!(
                        "received connection to dashboard from {}",
                        peer
                    )));

                    while let Ok(v) = rx.try_recv() {
                        state = Some(v);
                    }

                    if handle_connection(state.as_ref(), stream).is_err() {
                        let _ = branch.send(log::Line::Warn(format!(
                            "dropped dashboard connection from {}",
                            peer
                        )));
                    }
                }

                Ok(())
            }),
            should_stop,
        })
    }

    /// Publishes a new snapshot; connections accepted after this see it.
    #[inline]
    pub fn set(&self, telemetry: Telemetry) -> Result<(), SendError<Telemetry>> {
        self.tx.send(telemetry)
    }

    /// The address the dashboard actually bound, useful when constructed on
    /// port 0.
    #[inline]
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops the dashboard thread. Returns the error returned by the
    /// `JoinHandle::join()` call.
    pub fn stop_thread(self) -> thread::Result<DashboardResult<()>> {
        self.should_stop.store(true, Ordering::Relaxed);

        // The thread blocks in `accept()`, poke it awake to see the flag.
        let _ = TcpStream::connect(self.addr);
        self.handle.join()
    }
}

/// Writes the snapshot out as JSON and closes; `{}` if nothing has been
/// published yet.
fn handle_connection(state: Option<&Telemetry>, mut stream: TcpStream) -> io::Result<()> {
    let json = match state {
        Some(telemetry) => serde_json::to_string(telemetry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        None => String::from("{}"),
    };

    stream.write_all(json.as_bytes())?;
    stream.write_all(b"\n")
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Clone, Copy, Debug)]
pub struct DashboardError;

impl Error for DashboardError {}

impl Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error when starting, stopping, or running the dashboard thread"
        )
    }
}
