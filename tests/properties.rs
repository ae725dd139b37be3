//! Property-based tests: round-trip fidelity over arbitrary bytes and the
//! size/monotonicity contract of `compress_bound`.

use proptest::prelude::*;

use zxc::config::Level;
use zxc::{compress, compress_bound, decompress};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip_holds_for_arbitrary_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        level in 1u8..=5,
        checksum in any::<bool>(),
    ) {
        let compressed = compress(&data, Level::new(level as i32), checksum).unwrap();
        let decompressed = decompress(&compressed, checksum).unwrap();
        prop_assert_eq!(decompressed, data);
    }

    #[test]
    fn compress_bound_never_undershoots_nonzero_input(n in 1usize..2_000_000) {
        prop_assert!(compress_bound(n) >= n);
    }

    #[test]
    fn compress_bound_is_monotonic_on_random_pairs(a in 0usize..2_000_000, b in 0usize..2_000_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(compress_bound(lo) <= compress_bound(hi));
    }
}
