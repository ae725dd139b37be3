//! Integration tests for the one-shot buffer API (`compress`/`decompress`/
//! `compress_bound`).

use zxc::config::Level;
use zxc::{compress, compress_bound, decompress};

#[test]
fn roundtrip_across_all_levels() {
    let data = zxc::lorem::gen_buffer(200_000, 100);
    for level in 1..=5 {
        let compressed = compress(&data, Level::new(level), true).unwrap();
        let decompressed = decompress(&compressed, true).unwrap();
        assert_eq!(decompressed, data, "level {level} round-trip mismatch");
    }
}

#[test]
fn compress_bound_bounds_every_level() {
    let data = zxc::lorem::gen_buffer(700_000, 101);
    let bound = compress_bound(data.len());
    for level in 1..=5 {
        let compressed = compress(&data, Level::new(level), true).unwrap();
        assert!(compressed.len() <= bound);
    }
}

#[test]
fn highly_repetitive_input_compresses_smaller_than_bound() {
    let data = vec![b'a'; 1_000_000];
    let compressed = compress(&data, Level::new(5), true).unwrap();
    assert!(compressed.len() < data.len());
}

#[test]
fn incompressible_random_input_still_roundtrips() {
    // A simple xorshift generator stands in for "data the codec cannot
    // shrink" without pulling in a dedicated RNG dependency for one test.
    let mut state = 0x2545F4914F6CDD1Du64;
    let mut data = vec![0u8; 300_000];
    for byte in data.iter_mut() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        *byte = (state & 0xFF) as u8;
    }
    let compressed = compress(&data, Level::new(3), true).unwrap();
    let decompressed = decompress(&compressed, true).unwrap();
    assert_eq!(decompressed, data);
}
