//! Decoded NEC frame

/// Bytes carried by one NEC frame
pub const NEC_BYTES: usize = 4;

/// Address, inverted address, command, inverted command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NecFrame {
    pub address: u8,
    pub address_inv: u8,
    pub command: u8,
    pub command_inv: u8,
}

impl NecFrame {
    pub const fn from_bytes(bytes: [u8; NEC_BYTES]) -> Self {
        Self {
            address: bytes[0],
            address_inv: bytes[1],
            command: bytes[2],
            command_inv: bytes[3],
        }
    }

    pub const fn to_bytes(self) -> [u8; NEC_BYTES] {
        [self.address, self.address_inv, self.command, self.command_inv]
    }

    /// The command passes its inverted-copy check
    ///
    /// The address pair is not checked; extended-address remotes send
    /// two independent address bytes.
    pub fn is_valid(&self) -> bool {
        self.command ^ self.command_inv == 0xFF
    }

    /// The command byte, if the frame is valid
    pub fn command(&self) -> Option<u8> {
        self.is_valid().then_some(self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        assert_eq!(NecFrame::from_bytes([0x00, 0xFF, 0x81, 0x7E]).command(), Some(0x81));
        assert_eq!(NecFrame::from_bytes([0x00, 0xFF, 0x81, 0x7F]).command(), None);
    }

    #[test]
    fn test_address_not_checked() {
        let frame = NecFrame::from_bytes([0x12, 0x34, 0xD9, 0x26]);
        assert!(frame.is_valid());
    }
}
