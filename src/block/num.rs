//! NUM encoder/decoder: delta-coded `u32` sequences.
//!
//! Applies only when the block length is a multiple of 4. Stores the first
//! value verbatim, a 5-bit residual width, then `(n-1)` signed residuals
//! packed at that width via `crate::bitio`'s fixed-width accumulator.

use super::types::{EncodedBlock, EncoderTag};
use crate::error::{MalformedReason, ZxcError, ZxcResult};

const FIRST_VALUE_BITS: u8 = 32;
const RESIDUAL_WIDTH_BITS: u8 = 5;
const MAX_RESIDUAL_BITS: u8 = 32;

/// Smallest bit width (1..=32) that can hold `v` as a signed two's-complement
/// value, or 0 if `v == 0`.
fn signed_width(v: i64) -> u8 {
    if v == 0 {
        return 0;
    }
    // Number of bits needed for a signed value: one sign bit plus enough
    // magnitude bits that both v and its sign-extension round-trip.
    for bits in 1..=MAX_RESIDUAL_BITS {
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << (bits - 1)) - 1;
        if v >= min && v <= max {
            return bits;
        }
    }
    MAX_RESIDUAL_BITS
}

fn sign_extend(raw: u32, bits: u8) -> i64 {
    if bits == 0 {
        return 0;
    }
    if bits >= 32 {
        return raw as i32 as i64;
    }
    let shift = 32 - bits as u32;
    (((raw << shift) as i32) >> shift) as i64
}

/// Returns `Some(EncodedBlock)` when `block` qualifies (length is a multiple
/// of 4 and the residuals fit a width narrower than plain 32-bit storage
/// would need); `None` tells the selector to try another encoder.
pub fn try_encode(block: &[u8]) -> Option<EncodedBlock> {
    if block.is_empty() || block.len() % 4 != 0 {
        return None;
    }
    let values: Vec<u32> = block
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let first = values[0];
    let mut residual_bits = 0u8;
    for w in values.windows(2) {
        let delta = w[1].wrapping_sub(w[0]) as i32 as i64;
        residual_bits = residual_bits.max(signed_width(delta));
    }

    // Not worth it unless the residual width is narrower than full 32-bit
    // storage of every subsequent value.
    if values.len() > 1 && residual_bits >= 32 {
        return None;
    }

    let mut writer = crate::bitio::BitWriter::new();
    writer.write(first, FIRST_VALUE_BITS);
    writer.write(residual_bits as u32, RESIDUAL_WIDTH_BITS);
    for w in values.windows(2) {
        let delta = w[1].wrapping_sub(w[0]);
        // Residual stored as its low `residual_bits` bits; BitWriter masks.
        writer.write(delta, residual_bits.max(1).min(32));
    }
    let payload = writer.finish();

    Some(EncodedBlock {
        tag: EncoderTag::Num,
        tag_flags: 0,
        uncompressed_len: block.len() as u32,
        payload,
    })
}

pub fn decode(payload: &[u8], uncompressed_len: u32) -> ZxcResult<Vec<u8>> {
    let target = uncompressed_len as usize;
    if target == 0 || target % 4 != 0 {
        return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
    }
    let count = target / 4;

    let mut reader = crate::bitio::BitReader::new(payload);
    reader.ensure(FIRST_VALUE_BITS);
    let first = reader.read(FIRST_VALUE_BITS) as u32;

    reader.ensure(RESIDUAL_WIDTH_BITS);
    let residual_bits = reader.read(RESIDUAL_WIDTH_BITS) as u8;
    if residual_bits > MAX_RESIDUAL_BITS {
        return Err(ZxcError::MalformedFrame(
            MalformedReason::NumResidualWidthOutOfRange,
        ));
    }

    let mut out = Vec::with_capacity(target);
    out.extend_from_slice(&first.to_le_bytes());

    let mut current = first;
    let read_width = residual_bits.max(1).min(32);
    for _ in 1..count {
        reader.ensure(read_width.min(57));
        let raw = reader.read(read_width) as u32;
        let delta = if residual_bits == 0 {
            0
        } else {
            sign_extend(raw, residual_bits)
        };
        current = (current as i64).wrapping_add(delta) as u32;
        out.extend_from_slice(&current.to_le_bytes());
    }

    Ok(out)
}
