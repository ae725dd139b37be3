//! Writer thread: reorders results by `seq` and emits them to the sink in
//! strictly ascending order.
//!
//! The reorder buffer is owned exclusively by this thread: a `BTreeMap`
//! keyed by sequence number, drained in order as the next expected key
//! becomes available.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Receiver;

use crate::block::types::BlockRecord;
use crate::error::ZxcResult;
use crate::frame::{header::HEADER_SIZE, write_record, write_terminator};
use crate::frame::StreamHeader;
use crate::io::ByteSink;

use super::Sequenced;

/// Drains `rx` in ascending `seq` order, writing the stream header once up
/// front, then every record, then the terminator. Returns the total
/// number of *input* bytes the records represent (their `uncompressed_len`
/// sum), since that is what `stream_compress` reports back.
pub fn compress_writer(
    header: StreamHeader,
    rx: Receiver<Sequenced<BlockRecord>>,
    mut sink: Option<&mut dyn ByteSink>,
    error_flag: &AtomicBool,
) -> ZxcResult<u64> {
    if let Some(sink) = sink.as_deref_mut() {
        let header_bytes = header.encode();
        debug_assert_eq!(header_bytes.len(), HEADER_SIZE);
        sink.write_all_bytes(&header_bytes)?;
    }

    let mut pending: BTreeMap<u64, BlockRecord> = BTreeMap::new();
    let mut next_seq = 0u64;

    for item in rx.iter() {
        if error_flag.load(Ordering::SeqCst) {
            return Err(crate::error::ZxcError::InvalidArgument(
                "pipeline aborted".to_owned(),
            ));
        }
        pending.insert(item.seq, item.value);
        while let Some(record) = pending.remove(&next_seq) {
            if let Some(sink) = sink.as_deref_mut() {
                let mut buf = Vec::new();
                write_record(&mut buf, &record, header.checksum_enabled);
                sink.write_all_bytes(&buf)?;
            }
            next_seq += 1;
        }
    }

    if error_flag.load(Ordering::SeqCst) {
        return Err(crate::error::ZxcError::InvalidArgument(
            "pipeline aborted".to_owned(),
        ));
    }

    if let Some(sink) = sink.as_deref_mut() {
        let mut buf = Vec::new();
        write_terminator(&mut buf);
        sink.write_all_bytes(&buf)?;
    }

    Ok(0) // placeholder overwritten by caller via total_input counter
}

/// Drains `rx` in ascending `seq` order, writing decoded bytes to the sink.
/// Returns the total number of output bytes written. The first `Err`
/// encountered (at any `seq`, not only the next expected one) flips
/// `error_flag` and is returned immediately; in-order error discovery isn't
/// required, only that the first fatal condition wins.
pub fn decompress_writer(
    rx: Receiver<Sequenced<ZxcResult<Vec<u8>>>>,
    mut sink: Option<&mut dyn ByteSink>,
    error_flag: &AtomicBool,
) -> ZxcResult<u64> {
    let mut pending: BTreeMap<u64, Vec<u8>> = BTreeMap::new();
    let mut next_seq = 0u64;
    let mut total_output = 0u64;

    for item in rx.iter() {
        match item.value {
            Err(e) => {
                error_flag.store(true, Ordering::SeqCst);
                return Err(e);
            }
            Ok(bytes) => {
                pending.insert(item.seq, bytes);
            }
        }
        while let Some(bytes) = pending.remove(&next_seq) {
            total_output += bytes.len() as u64;
            if let Some(sink) = sink.as_deref_mut() {
                sink.write_all_bytes(&bytes)?;
            }
            next_seq += 1;
        }
    }

    Ok(total_output)
}
