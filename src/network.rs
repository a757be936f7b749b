// Line-delimited JSON over a plain TCP stream: every frame is one serialized object followed by
// '\n'. The relay defines this format, so it cannot be swapped for a binary one.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use log::{debug, info, warn};
use serde::{Serialize, de};

use crate::event::{ClientEvent, ServerEvent};


pub const PORT: u16 = 8765;

const READ_CHUNK_SIZE: usize = 4096;


#[derive(Debug)]
pub enum CommunicationError {
    Socket(io::Error),
    Serde(serde_json::Error),
    Protocol(String),
}

pub fn write_obj(writer: &mut impl Write, obj: &impl Serialize) -> Result<(), CommunicationError> {
    let mut serialized = serde_json::to_vec(obj).map_err(CommunicationError::Serde)?;
    serialized.push(b'\n');
    writer.write_all(&serialized).map_err(CommunicationError::Socket)?;
    writer.flush().map_err(CommunicationError::Socket)
}

pub fn parse_obj<T: de::DeserializeOwned>(frame: &[u8]) -> Result<T, CommunicationError> {
    let text = std::str::from_utf8(frame)
        .map_err(|err| CommunicationError::Protocol(format!("Frame is not UTF-8: {err}")))?;
    serde_json::from_str(text.trim()).map_err(CommunicationError::Serde)
}


// Accumulates raw bytes and hands out complete frames in arrival order. A partial frame stays
// buffered until its terminating newline arrives.
#[derive(Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(data);
        let mut frames = Vec::new();
        while let Some(end) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut frame: Vec<u8> = self.buffer.drain(..=end).collect();
            frame.pop();
            if !frame.iter().all(u8::is_ascii_whitespace) {
                frames.push(frame);
            }
        }
        frames
    }

    pub fn pending_len(&self) -> usize { self.buffer.len() }
}


// A long-lived connection to the relay.
//
// Incoming events are parsed on a background thread and delivered through an inbox that the
// foreground drains without blocking. Outgoing events are written under a lock, so concurrent
// senders never interleave frames. The channel is `Sync` and can be shared between threads.
//
// Once the channel is dead (any I/O failure, the relay closing the stream, or `close`) it stays
// dead. Sends on a dead channel are silently dropped; callers are expected to check `is_alive`.
pub struct NetworkChannel {
    writer: Mutex<Box<dyn Write + Send>>,
    inbox: Mutex<mpsc::Receiver<ServerEvent>>,
    alive: Arc<AtomicBool>,
    tcp_stream: Option<TcpStream>,
}

impl NetworkChannel {
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        info!("Connected to relay at {}", stream.peer_addr()?);
        let reader = stream.try_clone()?;
        let writer = stream.try_clone()?;
        let mut channel = Self::from_streams(reader, writer);
        channel.tcp_stream = Some(stream);
        Ok(channel)
    }

    pub fn from_streams(
        reader: impl Read + Send + 'static, writer: impl Write + Send + 'static,
    ) -> Self {
        let alive = Arc::new(AtomicBool::new(true));
        let (inbox_tx, inbox) = mpsc::channel();
        let receiver_alive = Arc::clone(&alive);
        thread::spawn(move || receive_loop(reader, inbox_tx, receiver_alive));
        NetworkChannel {
            writer: Mutex::new(Box::new(writer)),
            inbox: Mutex::new(inbox),
            alive,
            tcp_stream: None,
        }
    }

    pub fn is_alive(&self) -> bool { self.alive.load(Ordering::Acquire) }

    pub fn send(&self, event: &ClientEvent) {
        if !self.is_alive() {
            debug!("Dropping {event:?}: channel is closed");
            return;
        }
        let Ok(mut writer) = self.writer.lock() else {
            self.mark_dead("writer lock poisoned");
            return;
        };
        debug!("Sending {event:?}");
        if let Err(err) = write_obj(&mut *writer, event) {
            self.mark_dead(&format!("{err:?}"));
        }
    }

    // Returns the next received event, if any. Never blocks.
    pub fn try_recv(&self) -> Option<ServerEvent> { self.inbox.lock().ok()?.try_recv().ok() }

    // All events received so far, in relay order. Never blocks.
    pub fn drain(&self) -> Vec<ServerEvent> {
        match self.inbox.lock() {
            Ok(inbox) => inbox.try_iter().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn close(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            info!("Closing relay connection");
        }
        if let Some(stream) = &self.tcp_stream {
            // Unblocks the receiver thread. Failure means the socket is already gone.
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn mark_dead(&self, reason: &str) {
        if self.alive.swap(false, Ordering::AcqRel) {
            warn!("Relay connection lost: {reason}");
        }
    }
}

impl Drop for NetworkChannel {
    fn drop(&mut self) { self.close(); }
}

fn receive_loop(
    mut reader: impl Read, inbox_tx: mpsc::Sender<ServerEvent>, alive: Arc<AtomicBool>,
) {
    let mut framer = LineFramer::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    'outer: while alive.load(Ordering::Acquire) {
        let n = match reader.read(&mut chunk) {
            Ok(0) => {
                info!("Relay closed the connection");
                break;
            }
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!("Cannot read from relay: {err}");
                break;
            }
        };
        for frame in framer.push(&chunk[..n]) {
            match parse_obj::<ServerEvent>(&frame) {
                Ok(event) => {
                    debug!("Received {event:?}");
                    if inbox_tx.send(event).is_err() {
                        // The channel has been dropped.
                        break 'outer;
                    }
                }
                Err(err) => {
                    warn!("Dropping malformed frame {:?}: {err:?}", String::from_utf8_lossy(&frame));
                }
            }
        }
    }
    alive.store(false, Ordering::Release);
}
