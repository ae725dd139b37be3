//! Dispatcher thread: owns the input source and partitions it into numbered
//! work units.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::Sender;

use crate::block::types::BLOCK_MAX;
use crate::error::ZxcResult;
use crate::frame::header::{HEADER_SIZE, stream_flags};
use crate::frame::record;
use crate::frame::StreamHeader;
use crate::io::ByteSource;

use super::Sequenced;

/// Reads `source` in `BLOCK_MAX`-sized chunks, assigning each an ascending
/// `seq`, and pushes them onto `tx`. Closes `tx` (by dropping it at
/// function return) once `source` is exhausted, which is how workers learn
/// there is no more work. Bails out early if `error_flag` is already set by
/// another stage.
pub fn compress_dispatcher(
    source: &mut dyn ByteSource,
    tx: Sender<Sequenced<Vec<u8>>>,
    error_flag: &AtomicBool,
    total_input: &AtomicU64,
) -> ZxcResult<()> {
    let mut seq = 0u64;
    loop {
        if error_flag.load(Ordering::SeqCst) {
            return Ok(());
        }

        let mut block = vec![0u8; BLOCK_MAX];
        let filled = read_up_to(source, &mut block)?;
        if filled == 0 {
            return Ok(());
        }
        block.truncate(filled);
        total_input.fetch_add(filled as u64, Ordering::SeqCst);

        if tx.send(Sequenced { seq, value: block }).is_err() {
            // All workers have gone away (a fatal error elsewhere closed
            // their receivers); nothing left for this stage to do.
            return Ok(());
        }
        seq += 1;
    }
}

/// Reads the stream header, then parses and dispatches one `BlockRecord` at
/// a time until the terminator record is reached. Frame parsing is
/// inherently sequential (a record's length is only known after reading its
/// fixed header), so this stage stays single-threaded by design; only the
/// per-record *decode* work is handed to the worker pool.
pub fn decompress_dispatcher(
    source: &mut dyn ByteSource,
    tx: Sender<Sequenced<crate::block::types::BlockRecord>>,
    checksum: bool,
    error_flag: &AtomicBool,
) -> ZxcResult<()> {
    let mut buf: Vec<u8> = Vec::new();

    fill_at_least(source, &mut buf, HEADER_SIZE)?;
    let header = StreamHeader::decode(&buf)?;
    if header.checksum_enabled != checksum {
        return Err(crate::error::ZxcError::InvalidArgument(
            "decompress checksum flag does not match the stream".to_owned(),
        ));
    }
    buf.drain(..HEADER_SIZE);

    let checksum_enabled = header.checksum_enabled;
    let _ = stream_flags::CHECKSUM; // documents where the flag bit came from

    let mut seq = 0u64;
    loop {
        if error_flag.load(Ordering::SeqCst) {
            return Ok(());
        }

        // Record header is fixed-size (9 bytes); read at least that much to
        // learn the payload length before deciding how much more to pull.
        fill_at_least(source, &mut buf, 9)?;
        let uncompressed_len = crate::bitio::le32(&buf[1..5]);
        let compressed_len = crate::bitio::le32(&buf[5..9]) as usize;
        let crc_len = if checksum_enabled { 4 } else { 0 };
        let record_len = 9 + compressed_len + crc_len;
        let _ = uncompressed_len;

        fill_at_least(source, &mut buf, record_len)?;
        let (record, consumed) = record::read_record(&buf, checksum_enabled)?;
        buf.drain(..consumed);

        if record.is_terminator() {
            return Ok(());
        }

        if tx
            .send(Sequenced {
                seq,
                value: record,
            })
            .is_err()
        {
            return Ok(());
        }
        seq += 1;
    }
}

/// Reads into `buf` until it is full or the source is exhausted. A short
/// read partway through is not itself an error; only the caller knows
/// whether fewer bytes than requested is legitimate end-of-stream.
fn read_up_to(source: &mut dyn ByteSource, buf: &mut [u8]) -> ZxcResult<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = source.read_some(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

/// Appends to `acc` from `source` until it holds at least `need` bytes.
/// Returns `MalformedFrame(TruncatedStream)` if the source is exhausted
/// first.
fn fill_at_least(source: &mut dyn ByteSource, acc: &mut Vec<u8>, need: usize) -> ZxcResult<()> {
    let mut chunk = [0u8; 8192];
    while acc.len() < need {
        let n = source.read_some(&mut chunk)?;
        if n == 0 {
            return Err(crate::error::ZxcError::MalformedFrame(
                crate::error::MalformedReason::TruncatedStream,
            ));
        }
        acc.extend_from_slice(&chunk[..n]);
    }
    Ok(())
}
