//! Frame encoding and decoding for the monome serial protocol.
//!
//! Frame format:
//! - COMMAND (1 byte): section in the high nibble, command in the low nibble
//! - PAYLOAD (0-34 bytes): fixed size, implied by COMMAND and the sender
//!
//! There is no start byte and no checksum. The parser recovers from line
//! noise by skipping unrecognized command bytes one at a time, so every byte
//! after a bad one is a candidate frame start.
//!
//! A known command byte claims at most its declared payload length. If the
//! resulting frame turns out to be garbage (the consumer calls
//! [`FrameParser::reject`]) or the line goes quiet before it completes
//! ([`FrameParser::expire`]), only the command byte is dropped and the held
//! payload bytes are scanned again as candidate frame starts.

use heapless::{Deque, Vec};

use crate::command::Origin;

/// Largest payload of any command (level map: x, y, 32 packed bytes)
pub const MAX_PAYLOAD_SIZE: usize = 34;

/// Maximum complete frame size (COMMAND + MAX_PAYLOAD)
pub const MAX_FRAME_SIZE: usize = 1 + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Command byte not recognized for this origin
    UnknownCommand(u8),
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Payload length or contents do not match the command
    InvalidFrame,
    /// Command is framed correctly but carries nothing we act on
    Unsupported(u8),
    /// Partial frame abandoned after the line went quiet
    Stale,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command byte
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            command,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(command: u8) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        1 + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = self.command;
        buffer[1..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    origin: Origin,
    state: ParseState,
    command: u8,
    expected_length: usize,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    idle_polls: u8,
    /// Bytes given back for rescanning, oldest first
    replay: Deque<u8, MAX_PAYLOAD_SIZE>,
    /// Replaying after the line went quiet
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for a command byte
    WaitingForCommand,
    /// Reading payload bytes
    ReadingPayload,
}

impl FrameParser {
    /// Create a parser for bytes sent by `origin`
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            state: ParseState::WaitingForCommand,
            command: 0,
            expected_length: 0,
            buffer: Vec::new(),
            idle_polls: 0,
            replay: Deque::new(),
            quiet: false,
        }
    }

    /// Origin whose length table this parser uses
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Reset the parser state, dropping any bytes held for rescanning
    pub fn reset(&mut self) {
        self.finish_frame();
        self.replay.clear();
        self.quiet = false;
    }

    fn finish_frame(&mut self) {
        self.state = ParseState::WaitingForCommand;
        self.buffer.clear();
        self.command = 0;
        self.expected_length = 0;
        self.idle_polls = 0;
    }

    /// True while part of a frame has been received
    pub fn in_frame(&self) -> bool {
        self.state == ParseState::ReadingPayload
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when the byte could
    /// not start a frame. The parser is ready for the next byte either way.
    ///
    /// After [`Self::reject`] or a stale [`Self::expire`], drain
    /// [`Self::replay`] before feeding further bytes.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.idle_polls = 0;
        self.quiet = false;
        self.advance(byte)
    }

    fn advance(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForCommand => match self.origin.payload_len(byte) {
                None => Err(FrameError::UnknownCommand(byte)),
                Some(0) => Ok(Some(Frame::empty(byte))),
                Some(len) if len > MAX_PAYLOAD_SIZE => Err(FrameError::PayloadTooLarge),
                Some(len) => {
                    self.command = byte;
                    self.expected_length = len;
                    self.buffer.clear();
                    self.state = ParseState::ReadingPayload;
                    Ok(None)
                }
            },
            ParseState::ReadingPayload => {
                // Cannot overflow: expected_length <= MAX_PAYLOAD_SIZE
                let _ = self.buffer.push(byte);
                if self.buffer.len() < self.expected_length {
                    return Ok(None);
                }

                let frame = Frame {
                    command: self.command,
                    payload: self.buffer.clone(),
                };

                self.finish_frame();
                Ok(Some(frame))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any, together with the
    /// number of bytes consumed. Unknown command bytes are skipped.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Option<Frame>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Ok(Some(frame)) = self.feed(byte) {
                return (Some(frame), i + 1);
            }
        }
        (None, bytes.len())
    }

    /// Record a poll in which no bytes arrived
    ///
    /// A partial frame that sees `limit` consecutive quiet polls is dropped
    /// and `Err(FrameError::Stale)` is returned, so a truncated frame cannot
    /// swallow the start of the next one. Its payload bytes are then
    /// available through [`Self::replay`]; a frame they leave incomplete is
    /// dropped the same way, since nothing more is arriving to finish it.
    pub fn expire(&mut self, limit: u8) -> Result<(), FrameError> {
        if !self.in_frame() {
            return Ok(());
        }

        self.idle_polls = self.idle_polls.saturating_add(1);
        if self.idle_polls >= limit {
            self.quiet = true;
            self.drop_partial();
            return Err(FrameError::Stale);
        }
        Ok(())
    }

    /// Drop a frame the consumer found invalid and rescan its payload
    ///
    /// The command byte is discarded; every payload byte becomes a
    /// candidate frame start again. Call [`Self::replay`] until it returns
    /// `None` before feeding new bytes.
    pub fn reject(&mut self, frame: &Frame) {
        self.give_back(&frame.payload);
    }

    /// Next frame recovered from rescanned bytes
    pub fn replay(&mut self) -> Option<Frame> {
        loop {
            while let Some(byte) = self.replay.pop_front() {
                if let Ok(Some(frame)) = self.advance(byte) {
                    return Some(frame);
                }
            }
            if !(self.quiet && self.in_frame()) {
                self.quiet = false;
                return None;
            }
            self.drop_partial();
        }
    }

    /// Abandon the partial frame, keeping its payload for rescanning
    fn drop_partial(&mut self) {
        let held = self.buffer.clone();
        self.finish_frame();
        self.give_back(&held);
    }

    /// True while rescanned bytes are waiting for [`Self::replay`]
    pub fn has_replay(&self) -> bool {
        !self.replay.is_empty()
    }

    fn give_back(&mut self, bytes: &[u8]) {
        // Cannot overflow: a frame claims only bytes that directly precede
        // what is still queued, so the total stays within one payload
        for &byte in bytes.iter().rev() {
            let _ = self.replay.push_front(byte);
        }
    }
}
