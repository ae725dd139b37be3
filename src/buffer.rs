//! One-shot, in-memory API: `compress`/`decompress` plus `compress_bound`.
//!
//! Both functions are thin adapters over the streaming pipeline, pinned to
//! a single worker thread: a `Cursor` over `src` stands in for the byte
//! source, and `dst` (or its growth) stands in for the sink.

use std::io::Cursor;

use crate::config::Level;
use crate::error::{ZxcError, ZxcResult};
use crate::frame::header::HEADER_SIZE;
use crate::frame::record::{CRC_SIZE, RECORD_HEADER_SIZE};
use crate::pipeline::{stream_compress, stream_decompress};

/// Per-block wire overhead counted by `compress_bound`: the fixed record
/// header plus the checksum field, whether or not the caller ends up
/// requesting a checksum — the bound must hold regardless.
const PER_BLOCK_OVERHEAD: usize = RECORD_HEADER_SIZE + CRC_SIZE;

const BLOCK_MAX: usize = crate::block::types::BLOCK_MAX;

/// Upper bound on the compressed size of an `n`-byte input: stream header,
/// worst case one wire byte of overhead per input byte (RAW never expands
/// past 1:1 at the block level) plus `PER_BLOCK_OVERHEAD` per block, plus
/// the terminator record. Monotonic non-decreasing, `≥ n` for `n > 0`,
/// non-zero at `n = 0`, and `0` on overflow.
pub fn compress_bound(n: usize) -> usize {
    let blocks = n.div_ceil(BLOCK_MAX).max(1);
    let terms = [
        Some(HEADER_SIZE),
        Some(n),
        blocks.checked_mul(PER_BLOCK_OVERHEAD),
        Some(RECORD_HEADER_SIZE), // terminator record
    ];
    let mut total = 0usize;
    for term in terms {
        match term.and_then(|t| total.checked_add(t)) {
            Some(sum) => total = sum,
            None => return 0,
        }
    }
    total
}

/// Compresses `src` into a freshly allocated buffer using a single worker
/// thread, returning the number of bytes the caller should treat as valid
/// (this is always `dst.len()` after the call; kept as a return value to
/// mirror the streaming API's `written_bytes` convention).
pub fn compress(src: &[u8], level: Level, checksum: bool) -> ZxcResult<Vec<u8>> {
    let mut source = Cursor::new(src);
    let mut dst: Vec<u8> = Vec::with_capacity(compress_bound(src.len()));
    let written = stream_compress(&mut source, Some(&mut dst), 1, level, checksum)?;
    debug_assert_eq!(written, src.len() as u64);
    Ok(dst)
}

/// Compresses `src` into a caller-provided destination slice, mirroring the
/// teacher's `lz4f_compress_frame(dst: &mut [u8], src: &[u8], ...) ->
/// Result<usize, _>` shape rather than `compress`'s owned-`Vec` convenience.
/// Rejects up front (`InvalidArgument`) if `dst` is smaller than
/// `compress_bound(src.len())`, rather than attempting a partial write that
/// would later surface as a confusing I/O error.
pub fn compress_into(src: &[u8], dst: &mut [u8], level: Level, checksum: bool) -> ZxcResult<usize> {
    let bound = compress_bound(src.len());
    if bound == 0 {
        return Err(ZxcError::Overflow);
    }
    if dst.len() < bound {
        return Err(ZxcError::InvalidArgument(format!(
            "destination buffer too small: need at least {bound} bytes, have {}",
            dst.len()
        )));
    }
    let mut source = Cursor::new(src);
    let mut sink = Cursor::new(dst);
    stream_compress(&mut source, Some(&mut sink), 1, level, checksum)?;
    Ok(sink.position() as usize)
}

/// Decompresses a complete `ZXC` stream held in `src`, using a single
/// worker thread. `checksum` must match the flag the stream was encoded
/// with; a mismatch is reported as `InvalidArgument` by the dispatcher.
pub fn decompress(src: &[u8], checksum: bool) -> ZxcResult<Vec<u8>> {
    let mut source = Cursor::new(src);
    let mut dst: Vec<u8> = Vec::new();
    let written = stream_decompress(&mut source, Some(&mut dst), 1, checksum)?;
    if written as usize != dst.len() {
        return Err(ZxcError::InvalidArgument(
            "reported byte count does not match sink contents".to_owned(),
        ));
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_small_buffer() {
        let data = b"the quick brown fox jumps over the lazy dog".to_vec();
        let compressed = compress(&data, Level::new(3), true).unwrap();
        let decompressed = decompress(&compressed, true).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn roundtrip_empty_buffer() {
        let compressed = compress(&[], Level::DEFAULT, false).unwrap();
        let decompressed = decompress(&compressed, false).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn roundtrip_multi_block_buffer() {
        let data = vec![7u8; BLOCK_MAX * 3 + 17];
        let compressed = compress(&data, Level::new(5), true).unwrap();
        let decompressed = decompress(&compressed, true).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn bound_is_never_less_than_input_for_nonzero_n() {
        for n in [1usize, 17, BLOCK_MAX, BLOCK_MAX + 1, BLOCK_MAX * 5] {
            assert!(compress_bound(n) >= n);
        }
    }

    #[test]
    fn bound_is_nonzero_at_zero() {
        assert!(compress_bound(0) > 0);
    }

    #[test]
    fn bound_is_monotonic() {
        let mut prev = compress_bound(0);
        for n in (1..=BLOCK_MAX * 4).step_by(4096) {
            let cur = compress_bound(n);
            assert!(cur >= prev);
            prev = cur;
        }
    }

    #[test]
    fn bound_overflows_to_zero() {
        assert_eq!(compress_bound(usize::MAX), 0);
    }

    #[test]
    fn compress_into_matches_compress() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(50);
        let mut dst = vec![0u8; compress_bound(data.len())];
        let written = compress_into(&data, &mut dst, Level::new(3), true).unwrap();
        dst.truncate(written);
        let via_vec = compress(&data, Level::new(3), true).unwrap();
        assert_eq!(dst, via_vec);
        let decompressed = decompress(&dst, true).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn compress_into_rejects_undersized_destination() {
        let data = vec![42u8; 10_000];
        let mut dst = vec![0u8; 4];
        let err = compress_into(&data, &mut dst, Level::new(3), true).unwrap_err();
        assert!(matches!(err, ZxcError::InvalidArgument(_)));
    }

    #[test]
    fn checksum_mismatch_is_rejected() {
        let data = b"checksum mismatch probe".to_vec();
        let compressed = compress(&data, Level::DEFAULT, true).unwrap();
        let err = decompress(&compressed, false).unwrap_err();
        assert!(matches!(err, ZxcError::InvalidArgument(_)));
    }
}
