//! Error taxonomy for the codec core.
//!
//! Every fallible operation below the thin buffer/pipeline boundary returns
//! [`ZxcResult`]. The language-neutral sentinel surface (`-1` / `0`) described
//! by the wire-level API is applied only at `src/buffer.rs` and
//! `src/pipeline/mod.rs`'s public entry points — nothing internal matches on
//! an integer error code.

use std::fmt;

/// The codec's error taxonomy, one variant per failure class.
#[derive(Debug, thiserror::Error)]
pub enum ZxcError {
    /// Bad argument at an API boundary: null source, unsupported level,
    /// destination buffer too small.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying byte source/sink failed or returned fewer bytes than
    /// requested mid-block.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The frame or block header is structurally invalid: bad magic, unknown
    /// version, unknown encoder tag, inconsistent length fields, a block
    /// exceeding `BLOCK_MAX`, an LZ offset out of range, an out-of-domain
    /// NUM residual width, or an invalid GHI/GLO code-book.
    #[error("malformed frame: {0}")]
    MalformedFrame(MalformedReason),

    /// A per-block checksum did not match the recomputed hash of the
    /// decoded bytes.
    #[error("checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { expected: u32, computed: u32 },

    /// Size arithmetic overflowed (`compress_bound` or an internal bound
    /// computation).
    #[error("size computation overflowed")]
    Overflow,
}

/// Specific reason a frame was rejected as malformed, kept distinct from the
/// top-level [`ZxcError::MalformedFrame`] message so callers and tests can
/// match on cause without parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    BadMagic,
    UnsupportedVersion(u8),
    UnknownEncoderTag(u8),
    UnknownFlagBits,
    LengthMismatch,
    BlockTooLarge,
    LzOffsetOutOfRange,
    NumResidualWidthOutOfRange,
    CodeBookInvalid,
    TruncatedStream,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::BadMagic => write!(f, "bad magic"),
            MalformedReason::UnsupportedVersion(v) => write!(f, "unsupported version {v}"),
            MalformedReason::UnknownEncoderTag(t) => write!(f, "unknown encoder tag {t}"),
            MalformedReason::UnknownFlagBits => write!(f, "unknown flag bits set"),
            MalformedReason::LengthMismatch => write!(f, "length fields inconsistent"),
            MalformedReason::BlockTooLarge => write!(f, "block exceeds BLOCK_MAX"),
            MalformedReason::LzOffsetOutOfRange => write!(f, "LZ match offset out of range"),
            MalformedReason::NumResidualWidthOutOfRange => {
                write!(f, "NUM residual width out of range")
            }
            MalformedReason::CodeBookInvalid => write!(f, "GHI/GLO code-book invalid"),
            MalformedReason::TruncatedStream => write!(f, "stream truncated"),
        }
    }
}

pub type ZxcResult<T> = Result<T, ZxcError>;
