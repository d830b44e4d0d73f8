// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::{self, Entry};
use std::{
    io,
    net::UdpSocket,
    sync::mpsc::{self, Receiver, SendError, Sender},
    thread,
    time::Duration,
};

/// Responsible for sending out command entries to the hardware bridge.
pub struct Client {
    tx: Sender<Entry>,
}

impl Client {
    /// Creates a new `Client` over an already connected `UdpSocket`. Entries
    /// queued between cycles are batched into one sequenced datagram, so the
    /// bridge sees at most one command packet per cycle.
    pub fn new(socket: UdpSocket, cycle: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<Entry>();

        thread::spawn(move || -> io::Result<()> {
            let mut seq = 0u16;

            loop {
                let first = match rx.recv() {
                    Ok(e) => e,

                    // Returning here makes it so that when the transmitter,
                    // and therefore its containing struct is dropped, so too
                    // does this thread return, which in this case is not
                    // actually an error.
                    Err(_) => return Ok(()),
                };

                let mut entries = vec![first];

                while let Ok(e) = rx.try_recv() {
                    entries.push(e);
                }

                seq = seq.wrapping_add(1);
                socket.send(&wire::encode_packet(seq, &entries))?;
                thread::sleep(cycle);
            }
        });

        Self { tx }
    }

    /// Queues an entry for sending on the client thread. An `Err` value from
    /// this function means that the `Client` instance's thread has returned
    /// with an error, which would suggest that an `io::Error` has occured
    /// internally. An `Ok` variant does not necessarily mean the entry
    /// reached the bridge, only that it was handed to the thread for that
    /// purpose.
    ///
    /// Entries queued within one cycle are applied by the bridge in queue
    /// order, so a later command to the same channel wins.
    #[inline]
    pub fn send(&mut self, entry: Entry) -> Result<(), SendError<Entry>> {
        self.tx.send(entry)
    }
}

/// Responsible for receiving sensor reports from the hardware bridge.
pub struct Server {
    rx: Receiver<Entry>,
}

impl Server {
    /// Creates a new `Server` over an already connected `UdpSocket`. The
    /// receive thread parses each datagram, drops any whose sequence number
    /// is not newer than the last accepted one, and queues the rest's entries
    /// for `drain()`.
    pub fn new(socket: UdpSocket) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || -> io::Result<()> {
            let mut last_seq: Option<u16> = None;
            let mut buf = [0u8; 1500];

            loop {
                let n = socket.recv(&mut buf)?;

                let (seq, entries) = match wire::decode_packet(&buf[..n]) {
                    Ok(v) => v,
                    Err(_) => continue,
                };

                if let Some(last) = last_seq {
                    if !wire::seq_newer(seq, last) {
                        continue;
                    }
                }

                last_seq = Some(seq);

                for e in entries {
                    if tx.send(e).is_err() {
                        return Ok(());
                    }
                }
            }
        });

        Self { rx }
    }

    /// Takes every entry received since the last drain, oldest first. Never
    /// blocks; an empty `Vec` just means the bridge has not reported since.
    #[must_use]
    pub fn drain(&mut self) -> Vec<Entry> {
        let mut entries = Vec::new();

        while let Ok(e) = self.rx.try_recv() {
            entries.push(e);
        }

        entries
    }
}
