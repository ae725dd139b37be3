//! Integration tests for the stream header and block record wire format,
//! exercised through the public pipeline rather than the crate-internal
//! unit tests already covering `frame::header`/`frame::record` directly.

use std::io::Cursor;

use zxc::config::Level;
use zxc::{compress, decompress};

#[test]
fn compressed_output_starts_with_zxc_magic() {
    let data = zxc::lorem::gen_buffer(8192, 1);
    let compressed = compress(&data, Level::DEFAULT, true).unwrap();
    assert_eq!(&compressed[0..3], b"ZXC");
    assert_eq!(compressed[3], zxc::VERSION);
}

#[test]
fn checksum_flag_bit_reflects_request() {
    let data = zxc::lorem::gen_buffer(4096, 2);
    let with_checksum = compress(&data, Level::DEFAULT, true).unwrap();
    let without_checksum = compress(&data, Level::DEFAULT, false).unwrap();
    assert_eq!(with_checksum[4] & 0b0000_0001, 1);
    assert_eq!(without_checksum[4] & 0b0000_0001, 0);
}

#[test]
fn truncated_stream_is_rejected() {
    let data = zxc::lorem::gen_buffer(1 << 20, 3);
    let compressed = compress(&data, Level::new(3), true).unwrap();
    let truncated = &compressed[..compressed.len() - 16];
    let err = decompress(truncated, true).unwrap_err();
    assert!(matches!(
        err,
        zxc::ZxcError::MalformedFrame(zxc::MalformedReason::TruncatedStream)
    ));
}

#[test]
fn corrupted_magic_is_rejected() {
    let data = zxc::lorem::gen_buffer(512, 4);
    let mut compressed = compress(&data, Level::DEFAULT, false).unwrap();
    compressed[0] = b'Q';
    let err = decompress(&compressed, false).unwrap_err();
    assert!(matches!(
        err,
        zxc::ZxcError::MalformedFrame(zxc::MalformedReason::BadMagic)
    ));
}

#[test]
fn stream_api_matches_buffer_api_byte_for_byte() {
    let data = zxc::lorem::gen_buffer(3 * 256 * 1024 + 31, 5);

    let buffer_compressed = compress(&data, Level::new(2), true).unwrap();

    let mut source = Cursor::new(&data);
    let mut sink: Vec<u8> = Vec::new();
    zxc::stream_compress(&mut source, Some(&mut sink), 1, Level::new(2), true).unwrap();

    assert_eq!(buffer_compressed, sink);
}
