//! Block-level compression: the encoder/decoder family and the selector that
//! picks among them.

pub mod entropy;
pub mod lz;
pub mod num;
pub mod raw;
pub mod selector;
pub mod types;

use crate::config::Level;
use crate::error::{MalformedReason, ZxcError, ZxcResult};
use types::{flags, EncodedBlock, EncoderTag};

/// Runs the block selector over `block` and returns the winning encoder's
/// output. Thin wrapper kept at the module root so callers don't need to
/// reach into `selector` directly.
pub fn encode_block(block: &[u8], level: Level) -> EncodedBlock {
    selector::select(block, level)
}

/// Dispatches to the decoder matching `tag`, validating that it produces
/// exactly `uncompressed_len` bytes and rejecting any domain violation
/// (out-of-range LZ offset, invalid code-book, out-of-range NUM residual
/// width) as `MalformedFrame`.
pub fn decode_block(
    tag: EncoderTag,
    tag_flags: u8,
    payload: &[u8],
    uncompressed_len: u32,
) -> ZxcResult<Vec<u8>> {
    let out = match tag {
        EncoderTag::Raw => {
            reject_unknown_flags(tag_flags, 0)?;
            raw::decode(payload, uncompressed_len)?
        }
        EncoderTag::Lz => {
            reject_unknown_flags(tag_flags, flags::LZ_ENC_OFF)?;
            let enc_off = tag_flags & flags::LZ_ENC_OFF != 0;
            lz::decode(payload, uncompressed_len, enc_off)?
        }
        EncoderTag::Ghi | EncoderTag::Glo => {
            reject_unknown_flags(tag_flags, 0)?;
            entropy::decode(payload, uncompressed_len)?
        }
        EncoderTag::Num => {
            reject_unknown_flags(tag_flags, 0)?;
            num::decode(payload, uncompressed_len)?
        }
        EncoderTag::Terminator => {
            return Err(ZxcError::MalformedFrame(MalformedReason::UnknownEncoderTag(
                0xFF,
            )))
        }
    };

    if out.len() != uncompressed_len as usize {
        return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
    }
    Ok(out)
}

/// Rejects any high-nibble bit not in `allowed` — an unknown flag bit on a
/// known encoder is treated as `MalformedFrame` rather than silently
/// ignored, since accepting unknown flags would make frames written by a
/// future revision silently misdecode instead of failing loudly.
fn reject_unknown_flags(tag_flags: u8, allowed: u8) -> ZxcResult<()> {
    if tag_flags & !allowed != 0 {
        return Err(ZxcError::MalformedFrame(MalformedReason::UnknownFlagBits));
    }
    Ok(())
}
