//! `BlockRecord` wire framing and the `Terminator` sentinel.
//!
//! ```text
//! Record := <tag:u8><ulen:u32><clen:u32><payload:clen bytes>[<crc:u32>]
//! Term    := <tag=0xFF><ulen=0><clen=0>
//! ```

use crate::bitio::{le32, put_le32};
use crate::block::types::{BlockRecord, EncoderTag, BLOCK_MAX};
use crate::error::{MalformedReason, ZxcError, ZxcResult};

/// Fixed portion of a record: tag(1) + ulen(4) + clen(4).
pub(crate) const RECORD_HEADER_SIZE: usize = 9;
pub(crate) const CRC_SIZE: usize = 4;

/// Appends `record`'s wire encoding to `out`. `checksum_enabled` controls
/// whether the trailing `crc32` field is written — it must match the
/// stream header's flag for every record in the stream.
pub fn write_record(out: &mut Vec<u8>, record: &BlockRecord, checksum_enabled: bool) {
    out.push(record.tag.low_nibble() | (record.tag_flags << 4));
    let mut len_buf = [0u8; 4];
    put_le32(&mut len_buf, record.uncompressed_len);
    out.extend_from_slice(&len_buf);
    put_le32(&mut len_buf, record.compressed_len());
    out.extend_from_slice(&len_buf);
    out.extend_from_slice(&record.payload);
    if checksum_enabled {
        let crc = record
            .checksum
            .expect("checksum_enabled record must carry a checksum");
        put_le32(&mut len_buf, crc);
        out.extend_from_slice(&len_buf);
    }
}

/// Appends the end-of-stream terminator record: `tag=0xFF, ulen=0, clen=0`,
/// no payload, no checksum regardless of the stream's checksum flag.
pub fn write_terminator(out: &mut Vec<u8>) {
    out.push(EncoderTag::Terminator.low_nibble());
    out.extend_from_slice(&[0u8; 8]);
}

/// Reads one record (or the terminator) from the front of `buf`. Returns
/// `(record, bytes_consumed)`. A terminator decodes to `BlockRecord::terminator()`.
pub fn read_record(buf: &[u8], checksum_enabled: bool) -> ZxcResult<(BlockRecord, usize)> {
    if buf.len() < RECORD_HEADER_SIZE {
        return Err(ZxcError::MalformedFrame(MalformedReason::TruncatedStream));
    }
    let tag_byte = buf[0];
    let low_nibble = tag_byte & 0x0F;
    let tag_flags = tag_byte >> 4;
    let tag = EncoderTag::from_low_nibble(low_nibble)
        .ok_or(ZxcError::MalformedFrame(MalformedReason::UnknownEncoderTag(
            low_nibble,
        )))?;

    let uncompressed_len = le32(&buf[1..5]);
    let compressed_len = le32(&buf[5..9]);

    if tag == EncoderTag::Terminator {
        if uncompressed_len != 0 || compressed_len != 0 {
            return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
        }
        return Ok((BlockRecord::terminator(), RECORD_HEADER_SIZE));
    }

    if uncompressed_len as usize > BLOCK_MAX {
        return Err(ZxcError::MalformedFrame(MalformedReason::BlockTooLarge));
    }

    let payload_start = RECORD_HEADER_SIZE;
    let payload_end = payload_start
        .checked_add(compressed_len as usize)
        .ok_or(ZxcError::MalformedFrame(MalformedReason::LengthMismatch))?;

    let crc_end = if checksum_enabled {
        payload_end
            .checked_add(CRC_SIZE)
            .ok_or(ZxcError::MalformedFrame(MalformedReason::LengthMismatch))?
    } else {
        payload_end
    };

    if buf.len() < crc_end {
        return Err(ZxcError::MalformedFrame(MalformedReason::TruncatedStream));
    }

    let payload = buf[payload_start..payload_end].to_vec();
    let checksum = if checksum_enabled {
        Some(le32(&buf[payload_end..crc_end]))
    } else {
        None
    };

    Ok((
        BlockRecord {
            tag,
            tag_flags,
            uncompressed_len,
            payload,
            checksum,
        },
        crc_end,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::hash32;

    fn sample_record(checksummed: bool) -> BlockRecord {
        let payload = b"hello record".to_vec();
        BlockRecord {
            tag: EncoderTag::Raw,
            tag_flags: 0,
            uncompressed_len: payload.len() as u32,
            checksum: checksummed.then(|| hash32(&payload)),
            payload,
        }
    }

    #[test]
    fn record_roundtrip_with_checksum() {
        let record = sample_record(true);
        let mut buf = Vec::new();
        write_record(&mut buf, &record, true);
        let (decoded, consumed) = read_record(&buf, true).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded.tag, record.tag);
        assert_eq!(decoded.payload, record.payload);
        assert_eq!(decoded.checksum, record.checksum);
    }

    #[test]
    fn record_roundtrip_without_checksum() {
        let record = sample_record(false);
        let mut buf = Vec::new();
        write_record(&mut buf, &record, false);
        let (decoded, consumed) = read_record(&buf, false).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded.checksum, None);
    }

    #[test]
    fn terminator_roundtrip() {
        let mut buf = Vec::new();
        write_terminator(&mut buf);
        let (decoded, consumed) = read_record(&buf, true).unwrap();
        assert!(decoded.is_terminator());
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn rejects_unknown_encoder_tag() {
        let mut buf = Vec::new();
        buf.push(0x07); // low nibble 7 is not assigned
        buf.extend_from_slice(&[0u8; 8]);
        let err = read_record(&buf, false).unwrap_err();
        assert!(matches!(
            err,
            ZxcError::MalformedFrame(MalformedReason::UnknownEncoderTag(7))
        ));
    }

    #[test]
    fn rejects_block_exceeding_block_max() {
        let mut buf = Vec::new();
        buf.push(EncoderTag::Raw.low_nibble());
        buf.extend_from_slice(&((BLOCK_MAX as u32) + 1).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        let err = read_record(&buf, false).unwrap_err();
        assert!(matches!(
            err,
            ZxcError::MalformedFrame(MalformedReason::BlockTooLarge)
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        let record = sample_record(false);
        let mut buf = Vec::new();
        write_record(&mut buf, &record, false);
        buf.truncate(buf.len() - 1);
        let err = read_record(&buf, false).unwrap_err();
        assert!(matches!(
            err,
            ZxcError::MalformedFrame(MalformedReason::TruncatedStream)
        ));
    }
}
