//! Frame decoding for the touch display protocol.
//!
//! Frame format:
//! - HEADER (2 bytes): 0x5A 0xA5
//! - LENGTH (1 byte): number of bytes that follow, command included (3-9)
//! - COMMAND (1 byte): 0x82 write, 0x83 read / read response
//! - BODY: big-endian VP address followed by command-specific data
//!
//! Read responses carry `[addr][word count][data...]`, writes carry
//! `[addr][data...]`. A write acknowledgement from the display is a write
//! whose "address" is the ASCII pair `OK`.

use heapless::Vec;

use crate::messages::VpUpdate;

/// First header byte
pub const HEADER_HIGH: u8 = 0x5A;

/// Second header byte
pub const HEADER_LOW: u8 = 0xA5;

/// Write variable command
pub const CMD_WRITE: u8 = 0x82;

/// Read variable command (and the display's response to it)
pub const CMD_READ: u8 = 0x83;

/// Smallest accepted LENGTH (command + address)
pub const MIN_LENGTH: u8 = 3;

/// Largest accepted LENGTH
pub const MAX_LENGTH: u8 = 9;

/// Maximum captured frame size (HEADER + LENGTH + MAX_LENGTH)
pub const MAX_FRAME_SIZE: usize = 12;

// A frame whose LENGTH passed validation always fits the buffer
const _: () = assert!(3 + MAX_LENGTH as usize == MAX_FRAME_SIZE);

/// Empty polls tolerated mid-frame before the parser gives up on it
pub const DEFAULT_STALL_LIMIT: u16 = 5000;

/// Body of a write acknowledgement
const ACK_BODY: [u8; 2] = [0x4F, 0x4B];

/// Offset of the first data byte in a read response
///
/// `5A A5 LEN 83 AH AL NN VH VL`: the word count sits between address
/// and value.
const READ_DATA_OFFSET: usize = 7;

/// Offset of the first data byte in a write
///
/// `5A A5 LEN 82 AH AL VH VL`: the value follows the address directly,
/// one byte earlier than in a read response. Reading both opcodes at the
/// read-response offset would take the low value byte and the next one.
const WRITE_DATA_OFFSET: usize = 6;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Declared length outside `MIN_LENGTH..=MAX_LENGTH`
    InvalidLength(u8),
    /// A partial frame saw no new bytes for too many polls
    Stalled,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseState {
    /// Waiting for 0x5A
    Idle,
    /// Got 0x5A, waiting for 0xA5
    GotHeaderHigh,
    /// Got the header, waiting for LENGTH
    GotHeaderLow,
    /// Collecting LENGTH bytes
    Receiving,
}

/// Parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParserStats {
    /// Frames that produced a VP update
    pub frames: u16,
    /// Write acknowledgements seen
    pub acks: u16,
    /// Framing errors (saturates at 255)
    pub errors: u8,
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_FRAME_SIZE>,
    length: u8,
    idle_polls: u16,
    stall_limit: u16,
    stats: ParserStats,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser with the default stall limit
    pub const fn new() -> Self {
        Self::with_stall_limit(DEFAULT_STALL_LIMIT)
    }

    /// Create a parser that abandons a partial frame after `stall_limit`
    /// consecutive polls without new bytes
    pub const fn with_stall_limit(stall_limit: u16) -> Self {
        Self {
            state: ParseState::Idle,
            buffer: Vec::new(),
            length: 0,
            idle_polls: 0,
            stall_limit,
            stats: ParserStats {
                frames: 0,
                acks: 0,
                errors: 0,
            },
        }
    }

    /// Current parser state
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Diagnostics collected since creation
    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Reset the parser state
    ///
    /// Statistics are kept.
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.buffer.clear();
        self.length = 0;
        self.idle_polls = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(update))` when a complete frame carrying a value was
    /// parsed, `Ok(None)` when more bytes are needed or the frame carried no
    /// value, or `Err` when the frame was abandoned. The parser is back in
    /// [`ParseState::Idle`] after every `Err`.
    pub fn feed(&mut self, byte: u8) -> Result<Option<VpUpdate>, FrameError> {
        self.idle_polls = 0;

        match self.state {
            ParseState::Idle => {
                if byte == HEADER_HIGH {
                    self.begin(byte);
                }
                // Silently ignore anything else while waiting
                Ok(None)
            }
            ParseState::GotHeaderHigh => {
                if byte == HEADER_LOW {
                    self.store(byte);
                    self.state = ParseState::GotHeaderLow;
                } else if byte == HEADER_HIGH {
                    // Repeated 0x5A: treat it as the start of a new frame
                    self.begin(byte);
                } else {
                    self.reset();
                }
                Ok(None)
            }
            ParseState::GotHeaderLow => {
                self.store(byte);
                if (MIN_LENGTH..=MAX_LENGTH).contains(&byte) {
                    self.length = byte;
                    self.state = ParseState::Receiving;
                    Ok(None)
                } else {
                    Err(self.fail(FrameError::InvalidLength(byte)))
                }
            }
            ParseState::Receiving => {
                self.store(byte);
                if self.buffer.len() >= 3 + self.length as usize {
                    let update = self.complete();
                    self.reset();
                    Ok(update)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Count one poll that delivered no bytes
    ///
    /// Returns `Err(FrameError::Stalled)` once a partial frame has waited
    /// longer than the stall limit; the parser is reset at that point.
    pub fn idle_poll(&mut self) -> Result<(), FrameError> {
        if self.state == ParseState::Idle {
            return Ok(());
        }

        self.idle_polls = self.idle_polls.saturating_add(1);
        if self.idle_polls > self.stall_limit {
            return Err(self.fail(FrameError::Stalled));
        }
        Ok(())
    }

    /// Drain every byte the source currently has
    ///
    /// Each completed update and each framing error is passed to `handle`
    /// in arrival order. A poll that finds no bytes counts towards the stall
    /// timeout. Returns the number of bytes consumed.
    pub fn poll<I, F>(&mut self, bytes: I, mut handle: F) -> usize
    where
        I: IntoIterator<Item = u8>,
        F: FnMut(Result<VpUpdate, FrameError>),
    {
        let mut consumed = 0;

        for byte in bytes {
            consumed += 1;
            match self.feed(byte) {
                Ok(Some(update)) => handle(Ok(update)),
                Ok(None) => {}
                Err(e) => handle(Err(e)),
            }
        }

        if consumed == 0 {
            if let Err(e) = self.idle_poll() {
                handle(Err(e));
            }
        }

        consumed
    }

    /// Start buffering a new frame with its first header byte
    fn begin(&mut self, byte: u8) {
        self.buffer.clear();
        self.store(byte);
        self.state = ParseState::GotHeaderHigh;
    }

    /// Buffer one byte
    ///
    /// The state machine completes a frame at `3 + LENGTH` bytes and
    /// LENGTH is at most [`MAX_LENGTH`], so the buffer never fills up.
    fn store(&mut self, byte: u8) {
        let stored = self.buffer.push(byte);
        debug_assert!(stored.is_ok(), "frame longer than MAX_FRAME_SIZE");
    }

    fn fail(&mut self, error: FrameError) -> FrameError {
        self.reset();
        self.stats.errors = self.stats.errors.saturating_add(1);
        error
    }

    /// Interpret a complete frame
    fn complete(&mut self) -> Option<VpUpdate> {
        let frame = &self.buffer;
        let command = frame[3];

        let data_offset = match command {
            CMD_READ => READ_DATA_OFFSET,
            CMD_WRITE => WRITE_DATA_OFFSET,
            _ => return None,
        };

        if frame.len() < data_offset + 2 {
            if command == CMD_WRITE && frame[4..6] == ACK_BODY {
                self.stats.acks = self.stats.acks.wrapping_add(1);
            }
            return None;
        }

        let update = VpUpdate {
            address: u16::from_be_bytes([frame[4], frame[5]]),
            value: u16::from_be_bytes([frame[data_offset], frame[data_offset + 1]]),
        };
        self.stats.frames = self.stats.frames.wrapping_add(1);
        Some(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDER_FRAME: [u8; 9] = [0x5A, 0xA5, 0x06, 0x83, 0x11, 0x00, 0x01, 0x00, 0x05];

    fn feed_all(parser: &mut FrameParser, bytes: &[u8]) -> Option<VpUpdate> {
        let mut last = None;
        for &byte in bytes {
            if let Ok(Some(update)) = parser.feed(byte) {
                last = Some(update);
            }
        }
        last
    }

    #[test]
    fn test_read_response() {
        let mut parser = FrameParser::new();
        let update = feed_all(&mut parser, &SLIDER_FRAME).unwrap();

        assert_eq!(update.address, 0x1100);
        assert_eq!(update.value, 0x0005);
        assert_eq!(parser.state(), ParseState::Idle);
        assert_eq!(parser.stats().frames, 1);
    }

    #[test]
    fn test_duplicate_header_restarts() {
        let mut parser = FrameParser::new();
        let mut data = Vec::<u8, 16>::new();
        data.push(0x5A).unwrap();
        data.extend_from_slice(&SLIDER_FRAME).unwrap();

        let update = feed_all(&mut parser, &data).unwrap();
        assert_eq!(update, VpUpdate { address: 0x1100, value: 5 });
    }

    #[test]
    fn test_write_frame_value() {
        let mut parser = FrameParser::new();
        let update = feed_all(&mut parser, &[0x5A, 0xA5, 0x05, 0x82, 0x10, 0x00, 0x00, 0x01]);
        assert_eq!(update, Some(VpUpdate { address: 0x1000, value: 1 }));
    }

    #[test]
    fn test_write_value_follows_address() {
        // No word count in a write: the value is the first word after the address
        let mut parser = FrameParser::new();
        let update = feed_all(&mut parser, &[0x5A, 0xA5, 0x06, 0x82, 0x11, 0x00, 0x01, 0x00, 0x05]);
        assert_eq!(update, Some(VpUpdate { address: 0x1100, value: 0x0100 }));

        let update = feed_all(&mut parser, &[0x5A, 0xA5, 0x06, 0x83, 0x11, 0x00, 0x01, 0x00, 0x05]);
        assert_eq!(update, Some(VpUpdate { address: 0x1100, value: 0x0005 }));
    }

    #[test]
    fn test_write_ack_counted() {
        let mut parser = FrameParser::new();
        let update = feed_all(&mut parser, &[0x5A, 0xA5, 0x03, 0x82, 0x4F, 0x4B]);

        assert_eq!(update, None);
        assert_eq!(parser.stats().acks, 1);
        assert_eq!(parser.stats().errors, 0);
        assert_eq!(parser.state(), ParseState::Idle);
    }

    #[test]
    fn test_short_read_response_has_no_value() {
        let mut parser = FrameParser::new();
        let update = feed_all(&mut parser, &[0x5A, 0xA5, 0x05, 0x83, 0x11, 0x00, 0x01, 0x00]);

        assert_eq!(update, None);
        assert_eq!(parser.stats().frames, 0);
        assert_eq!(parser.state(), ParseState::Idle);
    }

    #[test]
    fn test_unknown_command_ignored() {
        let mut parser = FrameParser::new();
        let update = feed_all(&mut parser, &[0x5A, 0xA5, 0x04, 0x80, 0x03, 0x00, 0x10]);

        assert_eq!(update, None);
        assert_eq!(parser.state(), ParseState::Idle);
        assert_eq!(parser.stats().errors, 0);
    }

    #[test]
    fn test_invalid_length_rejected() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(0x5A), Ok(None));
        assert_eq!(parser.feed(0xA5), Ok(None));
        assert_eq!(parser.feed(0x02), Err(FrameError::InvalidLength(2)));
        assert_eq!(parser.state(), ParseState::Idle);
        assert_eq!(parser.stats().errors, 1);

        // Leftovers of the rejected frame must not be taken as a frame
        assert_eq!(feed_all(&mut parser, &[0x83, 0x11, 0x00, 0x01, 0x00, 0x05]), None);
        assert_eq!(parser.state(), ParseState::Idle);

        // The next well-formed frame still parses
        assert!(feed_all(&mut parser, &SLIDER_FRAME).is_some());
    }

    #[test]
    fn test_length_upper_bound() {
        let mut parser = FrameParser::new();
        feed_all(&mut parser, &[0x5A, 0xA5]);
        assert_eq!(parser.feed(10), Err(FrameError::InvalidLength(10)));

        feed_all(&mut parser, &[0x5A, 0xA5]);
        assert_eq!(parser.feed(9), Ok(None));
        assert_eq!(parser.state(), ParseState::Receiving);
    }

    #[test]
    fn test_longest_frame_fits() {
        let mut parser = FrameParser::new();
        let mut frame = [0u8; MAX_FRAME_SIZE];
        frame[..9].copy_from_slice(&[0x5A, 0xA5, MAX_LENGTH, 0x83, 0x12, 0x00, 0x02, 0x00, 0x04]);
        frame[9..].copy_from_slice(&[0x00, 0x09, 0x00]);

        // the last byte completes the frame instead of overrunning it
        for &byte in &frame[..MAX_FRAME_SIZE - 1] {
            assert_eq!(parser.feed(byte), Ok(None));
        }
        assert_eq!(
            parser.feed(frame[MAX_FRAME_SIZE - 1]),
            Ok(Some(VpUpdate { address: 0x1200, value: 4 }))
        );
        assert_eq!(parser.state(), ParseState::Idle);
        assert_eq!(parser.stats().errors, 0);

        assert_eq!(feed_all(&mut parser, &SLIDER_FRAME), Some(VpUpdate { address: 0x1100, value: 5 }));
    }

    #[test]
    fn test_bad_second_header_byte() {
        let mut parser = FrameParser::new();
        feed_all(&mut parser, &[0x5A, 0x00]);
        assert_eq!(parser.state(), ParseState::Idle);
        assert_eq!(parser.stats().errors, 0);
    }

    #[test]
    fn test_stall_resets_once() {
        let mut parser = FrameParser::with_stall_limit(10);
        let mut errors = 0;

        parser.poll([0x5A, 0xA5, 0x06, 0x83], |r| assert!(r.is_ok()));
        assert_eq!(parser.state(), ParseState::Receiving);

        for _ in 0..10 {
            parser.poll(core::iter::empty(), |_| errors += 1);
        }
        assert_eq!(errors, 0);
        assert_eq!(parser.state(), ParseState::Receiving);

        parser.poll(core::iter::empty(), |r| {
            assert_eq!(r, Err(FrameError::Stalled));
            errors += 1;
        });
        assert_eq!(errors, 1);
        assert_eq!(parser.state(), ParseState::Idle);

        for _ in 0..50 {
            parser.poll(core::iter::empty(), |_| errors += 1);
        }
        assert_eq!(errors, 1);
        assert_eq!(parser.stats().errors, 1);
    }

    #[test]
    fn test_bytes_reset_stall_counter() {
        let mut parser = FrameParser::with_stall_limit(3);
        parser.poll([0x5A, 0xA5], |_| {});

        for _ in 0..3 {
            parser.poll(core::iter::empty(), |_| panic!("stalled too early"));
        }
        parser.poll([0x06], |_| {});
        for _ in 0..3 {
            parser.poll(core::iter::empty(), |_| panic!("counter was not reset"));
        }
        assert_eq!(parser.state(), ParseState::Receiving);
    }

    #[test]
    fn test_poll_reports_every_frame() {
        let mut parser = FrameParser::new();
        let mut data = Vec::<u8, 32>::new();
        data.extend_from_slice(&SLIDER_FRAME).unwrap();
        data.extend_from_slice(&[0x5A, 0xA5, 0x06, 0x83, 0x12, 0x00, 0x01, 0x00, 0x08])
            .unwrap();

        let mut seen = Vec::<VpUpdate, 4>::new();
        let consumed = parser.poll(data.iter().copied(), |r| {
            seen.push(r.unwrap()).unwrap();
        });

        assert_eq!(consumed, 18);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], VpUpdate { address: 0x1200, value: 8 });
    }

    #[test]
    fn test_error_counter_saturates() {
        let mut parser = FrameParser::new();
        for _ in 0..300 {
            feed_all(&mut parser, &[0x5A, 0xA5, 0x00]);
        }
        assert_eq!(parser.stats().errors, u8::MAX);
    }
}
