//! Worker pool: pops work units and performs the block-level transform,
//! entirely within its own stack/heap — no shared mutable state between
//! workers.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};

use crate::block::types::{BlockRecord, EncoderTag};
use crate::block::{decode_block, encode_block};
use crate::checksum::hash32;
use crate::config::Level;
use crate::error::ZxcResult;

use super::Sequenced;

/// Encodes each incoming raw block into a `BlockRecord`. Block encoding
/// never fails (the selector always has RAW as a fallback), so this stage
/// has no error channel of its own; it only watches `error_flag` to stop
/// promptly once another stage has failed.
pub fn compress_worker(
    level: Level,
    checksum: bool,
    rx: Receiver<Sequenced<Vec<u8>>>,
    tx: Sender<Sequenced<BlockRecord>>,
    error_flag: &AtomicBool,
) {
    while let Ok(unit) = rx.recv() {
        if error_flag.load(Ordering::SeqCst) {
            return;
        }
        let encoded = encode_block(&unit.value, level);
        let record_checksum = checksum.then(|| hash32(&unit.value));
        let record = BlockRecord {
            tag: encoded.tag,
            tag_flags: encoded.tag_flags,
            uncompressed_len: encoded.uncompressed_len,
            payload: encoded.payload,
            checksum: record_checksum,
        };
        if tx
            .send(Sequenced {
                seq: unit.seq,
                value: record,
            })
            .is_err()
        {
            return;
        }
    }
}

/// Decodes each incoming `BlockRecord`, verifying its checksum if present.
/// A decode failure (malformed payload, checksum mismatch) is reported
/// through the result channel rather than panicking, so the writer can
/// surface it as the stream's terminal error.
pub fn decompress_worker(
    checksum_enabled: bool,
    rx: Receiver<Sequenced<BlockRecord>>,
    tx: Sender<Sequenced<ZxcResult<Vec<u8>>>>,
    error_flag: &AtomicBool,
) {
    while let Ok(unit) = rx.recv() {
        if error_flag.load(Ordering::SeqCst) {
            return;
        }
        let result = decode_one(&unit.value, checksum_enabled);
        if result.is_err() {
            error_flag.store(true, Ordering::SeqCst);
        }
        if tx
            .send(Sequenced {
                seq: unit.seq,
                value: result,
            })
            .is_err()
        {
            return;
        }
    }
}

fn decode_one(record: &BlockRecord, checksum_enabled: bool) -> ZxcResult<Vec<u8>> {
    debug_assert_ne!(record.tag, EncoderTag::Terminator);
    let decoded = decode_block(
        record.tag,
        record.tag_flags,
        &record.payload,
        record.uncompressed_len,
    )?;

    if checksum_enabled {
        let expected = record.checksum.ok_or(crate::error::ZxcError::MalformedFrame(
            crate::error::MalformedReason::LengthMismatch,
        ))?;
        let computed = hash32(&decoded);
        if computed != expected {
            return Err(crate::error::ZxcError::ChecksumMismatch { expected, computed });
        }
    }

    Ok(decoded)
}
