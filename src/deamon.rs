// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use std::{
    io::{self, Read},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
        Arc,
    },
    thread::{self, JoinHandle},
};
use xrplink::bot::State;

/// Represents a deamon which runs a thread retrieving mode commands over TCP
/// and forwarding them to all given `Sender`s. This stands in for a driver
/// station: whatever tooling the operator has can switch the robot's mode by
/// writing one command frame to the deamon's port.
pub struct Deamon {
    handle: JoinHandle<()>,
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
}

impl Deamon {
    /// Size of a command frame; commands shorter than this are padded out
    /// with zero bytes.
    pub const CMD_SIZE: usize = 16;

    /// Creates and starts a new deamon thread given a `Vec` of
    /// `mpsc::Sender<State>`. Each decoded mode command is forwarded to each
    /// of these senders, if a `Sender::send()` call returns an error it is
    /// removed from the `Vec` for future iterations. Frames that decode to
    /// no known mode are dropped.
    pub fn new(addr: SocketAddr, mut txs: Vec<Sender<State>>) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_thread = stop.clone();
        let listener = TcpListener::bind(addr)?;
        let addr = listener.local_addr()?;

        let handle = thread::spawn(move || {
            for stream in listener.incoming() {
                if stop_thread.load(Ordering::Relaxed) {
                    return;
                }

                let mut s = match stream {
                    Ok(s) => s,
                    Err(_) => continue,
                };

                let mut cmd = [0u8; Self::CMD_SIZE];

                match s.read(&mut cmd) {
                    Ok(n) if n > 0 => (),
                    _ => continue,
                }

                let state = match parse_mode(&cmd) {
                    Some(v) => v,
                    None => continue,
                };

                txs.retain(|tx| tx.send(state).is_ok());
            }
        });

        Ok(Self { handle, addr, stop })
    }

    /// The address the deamon actually bound, useful when constructed on
    /// port 0.
    #[inline]
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops the thread used for listening for deamon commands from the client.
    /// Returns the error returned by the `JoinHandle::join()` call.
    pub fn stop_thread(self) -> thread::Result<()> {
        self.stop.store(true, Ordering::Relaxed);

        // The thread blocks in `incoming()`, poke it awake to see the flag.
        let _ = TcpStream::connect(self.addr);
        self.handle.join()
    }
}

/// Decodes a command frame into the mode it requests. Frames carry an ASCII
/// command padded with zero bytes; "estop" is accepted as a synonym for
/// "disable" since a stopped XRP is just one with zeroed motors.
#[must_use]
pub fn parse_mode(cmd: &[u8; Deamon::CMD_SIZE]) -> Option<State> {
    let end = cmd.iter().position(|b| *b == 0).unwrap_or(cmd.len());

    match &cmd[..end] {
        b"teleop" => Some(State::Teleop(None)),
        b"auton" => Some(State::Autonomous(None)),
        b"disable" | b"estop" => Some(State::Disabled(None)),
        b"test" => Some(State::Test(None)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_mode, Deamon};
    use std::{io::Write, net::TcpStream, sync::mpsc, thread, time::Duration};
    use xrplink::bot::State;

    fn frame(cmd: &[u8]) -> [u8; Deamon::CMD_SIZE] {
        let mut f = [0u8; Deamon::CMD_SIZE];
        f[..cmd.len()].copy_from_slice(cmd);
        f
    }

    #[test]
    fn known_commands() {
        assert!(matches!(
            parse_mode(&frame(b"teleop")),
            Some(State::Teleop(None))
        ));
        assert!(matches!(
            parse_mode(&frame(b"auton")),
            Some(State::Autonomous(None))
        ));
        assert!(matches!(
            parse_mode(&frame(b"disable")),
            Some(State::Disabled(None))
        ));
        assert!(matches!(
            parse_mode(&frame(b"estop")),
            Some(State::Disabled(None))
        ));
        assert!(matches!(parse_mode(&frame(b"test")), Some(State::Test(None))));
    }

    #[test]
    fn junk_is_dropped() {
        assert!(parse_mode(&frame(b"")).is_none());
        assert!(parse_mode(&frame(b"teleport")).is_none());
        assert!(parse_mode(&[0xffu8; Deamon::CMD_SIZE]).is_none());
    }

    #[test]
    fn commands_are_forwarded() {
        let (tx, rx) = mpsc::channel();
        let deamon = Deamon::new("127.0.0.1:0".parse().unwrap(), vec![tx]).unwrap();

        let mut stream = TcpStream::connect(deamon.addr()).unwrap();
        stream.write_all(&frame(b"auton")).unwrap();
        drop(stream);

        // The deamon reads on its own thread, give it a moment.
        thread::sleep(Duration::from_millis(200));

        assert!(matches!(rx.try_recv(), Ok(State::Autonomous(None))));

        deamon.stop_thread().unwrap();
    }

    /// `stop_thread()` must return without a command connection arriving.
    #[test]
    fn stop_thread_returns() {
        let (tx, _rx) = mpsc::channel();
        let deamon = Deamon::new("127.0.0.1:0".parse().unwrap(), vec![tx]).unwrap();

        deamon.stop_thread().unwrap();
    }
}
