//! Message types for the touch display protocol
//!
//! - Display → controller: VP values uploaded on touch, read responses
//! - Controller → display: VP writes, page switches, backlight, read requests

use crate::frame::{FrameError, CMD_READ, CMD_WRITE, HEADER_HIGH, HEADER_LOW};

/// System VP that switches the displayed page
pub const VP_PAGE_SWITCH: u16 = 0x0084;

/// System VP holding the display backlight level (0-100)
pub const VP_BACKLIGHT: u16 = 0x0082;

/// Marker the page switch register expects before the page number
const PAGE_SWITCH_MAGIC: [u8; 2] = [0x5A, 0x01];

/// Largest body any outbound message produces
const MAX_BODY: usize = 7;

/// A variable value reported by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VpUpdate {
    /// Variable pointer address
    pub address: u16,
    /// First data word
    pub value: u16,
}

/// Messages from the controller to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// Write one word to a VP
    WriteVp { address: u16, value: u16 },
    /// Switch to a page
    SetPage(u8),
    /// Set the backlight level (0-100)
    SetBacklight(u8),
    /// Ask the display to report `words` words starting at `address`
    ReadVp { address: u16, words: u8 },
}

impl HostMessage {
    /// Command byte and body of this message
    fn body(&self, body: &mut [u8; MAX_BODY]) -> usize {
        match *self {
            HostMessage::WriteVp { address, value } => {
                let [ah, al] = address.to_be_bytes();
                let [vh, vl] = value.to_be_bytes();
                body[..5].copy_from_slice(&[CMD_WRITE, ah, al, vh, vl]);
                5
            }
            HostMessage::SetPage(page) => {
                let [ah, al] = VP_PAGE_SWITCH.to_be_bytes();
                body[..7].copy_from_slice(&[
                    CMD_WRITE,
                    ah,
                    al,
                    PAGE_SWITCH_MAGIC[0],
                    PAGE_SWITCH_MAGIC[1],
                    0x00,
                    page,
                ]);
                7
            }
            HostMessage::SetBacklight(level) => {
                // Single-byte write into the low half of the backlight register
                let [ah, al] = VP_BACKLIGHT.to_be_bytes();
                body[..4].copy_from_slice(&[CMD_WRITE, ah, al, level]);
                4
            }
            HostMessage::ReadVp { address, words } => {
                let [ah, al] = address.to_be_bytes();
                body[..4].copy_from_slice(&[CMD_READ, ah, al, words]);
                4
            }
        }
    }

    /// Encode this message into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let mut body = [0u8; MAX_BODY];
        let body_len = self.body(&mut body);
        let frame_len = 3 + body_len;

        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = HEADER_HIGH;
        buffer[1] = HEADER_LOW;
        buffer[2] = body_len as u8;
        buffer[3..frame_len].copy_from_slice(&body[..body_len]);

        Ok(frame_len)
    }
}
