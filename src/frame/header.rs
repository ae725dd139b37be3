//! Stream header: magic, version, flags.
//!
//! Written once at the start of a stream and required to decode it. Layout
//! is fixed-size and position-independent, so it can be read in one
//! unconditional slice before any variable-length record parsing begins.

use crate::error::{MalformedReason, ZxcError, ZxcResult};

/// 3-byte magic identifying a ZXC stream, immediately followed on the wire
/// by the version field.
pub const MAGIC: [u8; 3] = *b"ZXC";

/// Current wire-format version. Future revisions bump this; a decoder
/// rejects any version it does not recognize.
pub const VERSION: u8 = 1;

/// `StreamHeader` on-wire size: magic(3) + version(1) + flags(1) + reserved(2).
pub const HEADER_SIZE: usize = 7;

/// Stream-level flag bits: bit 0 marks whether every record carries a
/// trailing per-block checksum. Only bit 0 is defined; all others must be
/// zero and are rejected if set, so a future revision can claim them
/// without ambiguity against streams written by this version.
pub mod stream_flags {
    pub const CHECKSUM: u8 = 0b0000_0001;
}

/// `{ magic, version, flags }` — written exactly once at the start of a
/// stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub version: u8,
    pub checksum_enabled: bool,
}

impl StreamHeader {
    pub fn new(checksum_enabled: bool) -> Self {
        StreamHeader {
            version: VERSION,
            checksum_enabled,
        }
    }

    fn flags_byte(self) -> u8 {
        if self.checksum_enabled {
            stream_flags::CHECKSUM
        } else {
            0
        }
    }

    /// Serializes to the fixed `HEADER_SIZE`-byte wire form.
    pub fn encode(self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..3].copy_from_slice(&MAGIC);
        buf[3] = self.version;
        buf[4] = self.flags_byte();
        // buf[5..7] reserved, left zero.
        buf
    }

    /// Parses a `StreamHeader` from the front of `buf`, rejecting a bad
    /// magic, an unsupported version, or any set reserved-flag/reserved-word
    /// bit — reserved bits stay zero until a future version claims them.
    pub fn decode(buf: &[u8]) -> ZxcResult<StreamHeader> {
        if buf.len() < HEADER_SIZE {
            return Err(ZxcError::MalformedFrame(MalformedReason::TruncatedStream));
        }
        if buf[0..3] != MAGIC {
            return Err(ZxcError::MalformedFrame(MalformedReason::BadMagic));
        }
        let version = buf[3];
        if version != VERSION {
            return Err(ZxcError::MalformedFrame(MalformedReason::UnsupportedVersion(
                version,
            )));
        }
        let flags = buf[4];
        if flags & !stream_flags::CHECKSUM != 0 {
            return Err(ZxcError::MalformedFrame(MalformedReason::UnknownFlagBits));
        }
        let reserved = u16::from_le_bytes([buf[5], buf[6]]);
        if reserved != 0 {
            return Err(ZxcError::MalformedFrame(MalformedReason::UnknownFlagBits));
        }
        Ok(StreamHeader {
            version,
            checksum_enabled: flags & stream_flags::CHECKSUM != 0,
        })
    }
}
