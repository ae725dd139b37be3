//! RAW encoder: the block verbatim. Always available as the fallback when
//! no other encoder beats it.

use super::types::EncodedBlock;
use crate::error::{MalformedReason, ZxcError, ZxcResult};

pub fn encode(block: &[u8]) -> EncodedBlock {
    EncodedBlock {
        tag: super::types::EncoderTag::Raw,
        tag_flags: 0,
        uncompressed_len: block.len() as u32,
        payload: block.to_vec(),
    }
}

pub fn decode(payload: &[u8], uncompressed_len: u32) -> ZxcResult<Vec<u8>> {
    if payload.len() != uncompressed_len as usize {
        return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
    }
    Ok(payload.to_vec())
}
