//! Parallel pipeline: dispatcher thread, worker pool, writer thread.
//!
//! Two symmetric pipelines share this module's plumbing. The dispatcher
//! reads the input sequentially and partitions it into numbered work units;
//! a pool of worker threads performs the block-level transform out of
//! order; the writer thread re-sequences results with a small `BTreeMap`
//! reorder buffer keyed by sequence number and emits them to the sink in
//! strictly ascending order. Each stage is an explicit `std::thread::scope`
//! thread talking over bounded `crossbeam-channel` queues, rather than a
//! shared work-stealing pool, so the dispatcher/worker-pool/writer roles
//! stay distinct and independently testable.

mod dispatcher;
mod writer;
mod worker;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::bounded;

use crate::block::types::BlockRecord;
use crate::config::Level;
use crate::error::ZxcResult;
use crate::frame::StreamHeader;
use crate::io::{ByteSink, ByteSource};

/// One value tagged with its position in the original input order. Workers
/// may finish out of order; every downstream consumer re-sorts by `seq`.
struct Sequenced<T> {
    seq: u64,
    value: T,
}

/// Queue depth for both the work and result channels. Bounded so memory use
/// stays `O(threads + capacity)` blocks regardless of input size.
fn queue_capacity(threads: usize) -> usize {
    threads.max(1) + 2
}

/// Runs the compress pipeline end to end: dispatcher reads `source` into
/// `BLOCK_MAX`-sized chunks, `threads` workers select and run a block
/// encoder on each, and the writer emits the stream header, every record in
/// input order, and the terminator to `sink` (or discards them, in dry-run
/// mode, while still computing the byte count).
///
/// Returns the total number of input bytes read.
pub fn stream_compress(
    source: &mut dyn ByteSource,
    mut sink: Option<&mut dyn ByteSink>,
    threads: usize,
    level: Level,
    checksum: bool,
) -> ZxcResult<u64> {
    let threads = threads.max(1);
    let capacity = queue_capacity(threads);
    let error_flag = AtomicBool::new(false);
    let total_input = AtomicU64::new(0);

    let (work_tx, work_rx) = bounded::<Sequenced<Vec<u8>>>(capacity);
    let (result_tx, result_rx) = bounded::<Sequenced<BlockRecord>>(capacity);
    let header = StreamHeader::new(checksum);

    let (dispatch_result, write_result) = std::thread::scope(|scope| {
        for _ in 0..threads {
            let rx = work_rx.clone();
            let tx = result_tx.clone();
            let error_flag = &error_flag;
            scope.spawn(move || worker::compress_worker(level, checksum, rx, tx, error_flag));
        }
        drop(work_rx);
        drop(result_tx);

        let error_flag_ref = &error_flag;
        let writer_handle =
            scope.spawn(move || writer::compress_writer(header, result_rx, sink.take(), error_flag_ref));

        let dispatch_result =
            dispatcher::compress_dispatcher(source, work_tx, &error_flag, &total_input);

        let write_result = writer_handle.join().expect("writer thread panicked");
        (dispatch_result, write_result)
    });

    dispatch_result?;
    write_result?;
    Ok(total_input.load(Ordering::SeqCst))
}

/// Runs the decompress pipeline end to end: the dispatcher parses the stream
/// header then reads and parses one `BlockRecord` at a time from `source`
/// (frame parsing is inherently sequential), `threads` workers decode each
/// record (verifying its checksum, if present), and the writer emits
/// decoded bytes to `sink` in input order.
///
/// Returns the total number of output bytes produced.
pub fn stream_decompress(
    source: &mut dyn ByteSource,
    mut sink: Option<&mut dyn ByteSink>,
    threads: usize,
    checksum: bool,
) -> ZxcResult<u64> {
    let threads = threads.max(1);
    let capacity = queue_capacity(threads);
    let error_flag = AtomicBool::new(false);

    let (work_tx, work_rx) = bounded::<Sequenced<BlockRecord>>(capacity);
    let (result_tx, result_rx) = bounded::<Sequenced<ZxcResult<Vec<u8>>>>(capacity);

    let (dispatch_result, write_result) = std::thread::scope(|scope| {
        for _ in 0..threads {
            let rx = work_rx.clone();
            let tx = result_tx.clone();
            let error_flag = &error_flag;
            scope.spawn(move || worker::decompress_worker(checksum, rx, tx, error_flag));
        }
        drop(work_rx);
        drop(result_tx);

        let error_flag_ref = &error_flag;
        let writer_handle =
            scope.spawn(move || writer::decompress_writer(result_rx, sink.take(), error_flag_ref));

        let dispatch_result =
            dispatcher::decompress_dispatcher(source, work_tx, checksum, &error_flag);

        let write_result = writer_handle.join().expect("writer thread panicked");
        (dispatch_result, write_result)
    });

    dispatch_result?;
    write_result
}
