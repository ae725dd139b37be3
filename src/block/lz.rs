//! LZ encoder/decoder: a sliding-window match finder over a single block.
//!
//! A hash-then-probe match finder: one hash table indexed by a 4-byte
//! rolling hash, no cross-block window, no external dictionary. The match
//! window is capped at 65535 bytes back, which is also what lets `enc_off`
//! offsets fit in one or two bytes regardless of `BLOCK_MAX`.

use super::types::{flags, EncodedBlock, EncoderTag, MIN_MATCH};
use crate::config::Level;
use crate::error::{MalformedReason, ZxcError, ZxcResult};

/// Maximum backward distance an LZ match may reference.
const WINDOW: usize = 65_535;
const HASH_LOG: u32 = 14;
const HASH_SIZE: usize = 1 << HASH_LOG;

#[inline]
fn hash4(seq: u32) -> usize {
    ((seq.wrapping_mul(2_654_435_761)) >> (32 - HASH_LOG)) as usize
}

#[inline]
fn read_u32(block: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([block[pos], block[pos + 1], block[pos + 2], block[pos + 3]])
}

fn match_length(block: &[u8], a: usize, b: usize) -> usize {
    let max = block.len() - b;
    let mut n = 0;
    while n < max && block[a + n] == block[b + n] {
        n += 1;
    }
    n
}

fn write_varint(out: &mut Vec<u8>, mut v: u64) {
    loop {
        let byte = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

fn read_varint(buf: &[u8], pos: &mut usize) -> ZxcResult<u64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *buf
            .get(*pos)
            .ok_or(ZxcError::MalformedFrame(MalformedReason::TruncatedStream))?;
        *pos += 1;
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 64 {
            return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
        }
    }
}

/// Runs the match finder and returns the encoded payload plus the maximum
/// offset it emitted, so the caller (the selector) can decide whether this
/// beats RAW before committing to it.
pub fn encode(block: &[u8], level: Level) -> EncodedBlock {
    let mut table = vec![u32::MAX; HASH_SIZE];
    let chain_depth = level.search_effort();
    let lazy = level.lazy_matching();

    let mut payload = Vec::with_capacity(block.len() / 2 + 16);
    let mut literal_start = 0usize;
    let mut pos = 0usize;
    let mut max_offset = 0u32;
    let limit = block.len().saturating_sub(MIN_MATCH);

    while pos < limit {
        let seq = read_u32(block, pos);
        let h = hash4(seq);
        let candidate = table[h];
        table[h] = pos as u32;

        let found = candidate != u32::MAX && {
            let cand = candidate as usize;
            pos > cand && pos - cand <= WINDOW && read_u32(block, cand) == seq
        };

        if !found {
            pos += 1;
            continue;
        }

        let cand = candidate as usize;
        let mut best_len = match_length(block, cand, pos);
        let mut best_pos = pos;
        let mut best_offset = pos - cand;

        if best_len >= MIN_MATCH && lazy && pos + 1 < limit {
            let seq2 = read_u32(block, pos + 1);
            let h2 = hash4(seq2);
            let cand2 = table[h2];
            if cand2 != u32::MAX {
                let cand2 = cand2 as usize;
                if pos + 1 > cand2 && pos + 1 - cand2 <= WINDOW && read_u32(block, cand2) == seq2 {
                    let len2 = match_length(block, cand2, pos + 1);
                    if len2 > best_len {
                        best_len = len2;
                        best_pos = pos + 1;
                        best_offset = pos + 1 - cand2;
                    }
                }
            }
        }
        let _ = chain_depth; // single-candidate probe; effort only gates lazy matching above

        if best_len < MIN_MATCH {
            pos += 1;
            continue;
        }

        write_varint(&mut payload, (best_pos - literal_start) as u64);
        payload.extend_from_slice(&block[literal_start..best_pos]);
        let offset = best_offset as u32;
        if offset > max_offset {
            max_offset = offset;
        }
        // Always emit the offset at 2-byte width on this pass; the width is
        // a stream-global-per-block property decided only once every match
        // has been found, so a uniform temporary width avoids having to
        // special-case a token written before the eventual maximum was known.
        payload.extend_from_slice(&(offset as u16).to_le_bytes());
        write_varint(&mut payload, (best_len - MIN_MATCH) as u64);

        pos = best_pos + best_len;
        literal_start = pos;
    }

    write_varint(&mut payload, (block.len() - literal_start) as u64);
    payload.extend_from_slice(&block[literal_start..]);

    let enc_off = max_offset <= 0xFF && max_offset > 0;
    let payload = if enc_off {
        narrow_offsets(block, &payload)
    } else {
        payload
    };

    EncodedBlock {
        tag: EncoderTag::Lz,
        tag_flags: if enc_off { flags::LZ_ENC_OFF } else { 0 },
        uncompressed_len: block.len() as u32,
        payload,
    }
}

/// Rewrites a payload produced with uniform 2-byte offsets into one using
/// 1-byte offsets throughout, once the match finder has confirmed every
/// offset in the block fits in 8 bits.
fn narrow_offsets(block: &[u8], wide_payload: &[u8]) -> Vec<u8> {
    let mut narrow = Vec::with_capacity(wide_payload.len());
    let mut pos = 0usize;
    let mut decoded = 0usize;
    while pos < wide_payload.len() {
        let mut cursor = pos;
        let lit_len = read_varint(wide_payload, &mut cursor).unwrap() as usize;
        write_varint(&mut narrow, lit_len as u64);
        narrow.extend_from_slice(&wide_payload[cursor..cursor + lit_len]);
        cursor += lit_len;
        decoded += lit_len;
        pos = cursor;
        if decoded >= block.len() {
            break;
        }
        let offset = u16::from_le_bytes([wide_payload[pos], wide_payload[pos + 1]]) as u32;
        pos += 2;
        debug_assert!(offset <= 0xFF);
        narrow.push(offset as u8);
        let mut cursor2 = pos;
        let len_minus_min = read_varint(wide_payload, &mut cursor2).unwrap();
        write_varint(&mut narrow, len_minus_min);
        pos = cursor2;
        decoded += len_minus_min as usize + MIN_MATCH;
    }
    narrow
}

pub fn decode(payload: &[u8], uncompressed_len: u32, enc_off: bool) -> ZxcResult<Vec<u8>> {
    let target = uncompressed_len as usize;
    let mut out = Vec::with_capacity(target);
    let mut cursor = 0usize;

    while out.len() < target {
        let lit_len = read_varint(payload, &mut cursor)? as usize;
        let end = cursor
            .checked_add(lit_len)
            .filter(|&e| e <= payload.len())
            .ok_or(ZxcError::MalformedFrame(MalformedReason::LengthMismatch))?;
        if out.len() + lit_len > target {
            return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
        }
        out.extend_from_slice(&payload[cursor..end]);
        cursor = end;

        if out.len() == target {
            break;
        }

        let offset = if enc_off {
            let b = *payload
                .get(cursor)
                .ok_or(ZxcError::MalformedFrame(MalformedReason::TruncatedStream))?;
            cursor += 1;
            b as usize
        } else {
            let bytes = payload
                .get(cursor..cursor + 2)
                .ok_or(ZxcError::MalformedFrame(MalformedReason::TruncatedStream))?;
            let v = u16::from_le_bytes([bytes[0], bytes[1]]);
            cursor += 2;
            v as usize
        };
        let len_minus_min = read_varint(payload, &mut cursor)? as usize;
        let length = len_minus_min + MIN_MATCH;

        if offset == 0 || offset > out.len() {
            return Err(ZxcError::MalformedFrame(MalformedReason::LzOffsetOutOfRange));
        }
        if out.len() + length > target {
            return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
        }

        let start = out.len() - offset;
        for i in 0..length {
            let byte = out[start + i];
            out.push(byte);
        }
    }

    if out.len() != target {
        return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::types::flags;

    fn roundtrip(data: &[u8], level: Level) {
        let enc = encode(data, level);
        let enc_off = enc.tag_flags & flags::LZ_ENC_OFF != 0;
        let dec = decode(&enc.payload, enc.uncompressed_len, enc_off).unwrap();
        assert_eq!(dec, data, "level {:?}", level.get());
    }

    #[test]
    fn lz_roundtrip_repetitive() {
        let data = b"ABCDABCDABCDABCDABCDABCDABCDABCD".repeat(200);
        roundtrip(&data, Level::new(3));
    }

    #[test]
    fn lz_roundtrip_empty_and_short() {
        roundtrip(&[], Level::new(3));
        roundtrip(b"ab", Level::new(3));
        roundtrip(b"abcd", Level::new(1));
    }

    #[test]
    fn lz_roundtrip_with_lazy_matching_level5() {
        let mut data = Vec::new();
        for i in 0..5000u32 {
            data.extend_from_slice(&(i % 37).to_le_bytes());
        }
        roundtrip(&data, Level::new(5));
    }

    #[test]
    fn lz_large_offset_forces_two_byte_width() {
        // S6: a 300-byte unique prefix, then content that repeats with a
        // period of 300 bytes — every match offset is exactly 300, which
        // does not fit 8 bits but is well inside the match window.
        let mut prefix = vec![0u8; 300];
        for (i, b) in prefix.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        let mut data = prefix.clone();
        while data.len() < 8192 {
            let chunk = data[data.len() - 300..].to_vec();
            data.extend(chunk);
        }
        let enc = encode(&data, Level::new(3));
        assert_eq!(enc.tag_flags & flags::LZ_ENC_OFF, 0);
        let dec = decode(&enc.payload, enc.uncompressed_len, false).unwrap();
        assert_eq!(dec, data);
    }

    #[test]
    fn lz_decode_rejects_offset_before_block_start() {
        // literal run of 0, then offset=1 with nothing decoded yet.
        let mut payload = Vec::new();
        write_varint(&mut payload, 0);
        payload.push(1);
        write_varint(&mut payload, 0);
        let err = decode(&payload, 4, true).unwrap_err();
        assert!(matches!(
            err,
            ZxcError::MalformedFrame(MalformedReason::LzOffsetOutOfRange)
        ));
    }
}
