//! Block selector: chooses an encoder per block by content heuristic.
//!
//! Dispatches among five whole encoders by a short chain of cheap content
//! checks, trying the cheapest heuristics first and falling through to an
//! actual trial encode only when a shape match doesn't immediately decide
//! it.

use super::types::{EncodedBlock, EncoderTag, RAW_THRESHOLD};
use super::{entropy, lz, num, raw};
use crate::config::Level;

/// A rough order-0 entropy estimate in eighths-of-a-bit-per-symbol, used only
/// to break the GHI/GLO tie — not bit-exact Shannon entropy, just enough to
/// tell "near uniform" from "skewed".
fn entropy_estimate_eighths(block: &[u8]) -> u64 {
    if block.is_empty() {
        return 0;
    }
    let mut freq = [0u32; 256];
    for &b in block {
        freq[b as usize] += 1;
    }
    let n = block.len() as f64;
    let mut bits = 0.0f64;
    for &f in &freq {
        if f == 0 {
            continue;
        }
        let p = f as f64 / n;
        bits -= p * p.log2();
    }
    (bits * 8.0) as u64
}

/// High-entropy threshold: above this many eighths-of-a-bit per symbol, a
/// block is "near uniform" (GHI); at or below, it's "skewed" (GLO).
const ENTROPY_HIGH_THRESHOLD_EIGHTHS: u64 = 6 * 8; // 6.0 bits/symbol

/// Runs the selection policy and returns the winning encoder's output.
/// Policy order:
///   1. empty/tiny -> RAW
///   2. arithmetic/near-arithmetic u32 sequence -> NUM
///   3. LZ, if it beats RAW
///   4. GHI/GLO by entropy estimate (ties to GHI)
///   5. RAW fallback
pub fn select(block: &[u8], level: Level) -> EncodedBlock {
    if block.len() < RAW_THRESHOLD {
        return raw::encode(block);
    }

    if let Some(num_enc) = num::try_encode(block) {
        if num_enc.payload.len() < block.len() {
            return num_enc;
        }
    }

    let lz_enc = lz::encode(block, level);
    if lz_enc.payload.len() < block.len() {
        let entropy_tag = if entropy_estimate_eighths(block) >= ENTROPY_HIGH_THRESHOLD_EIGHTHS {
            EncoderTag::Ghi
        } else {
            EncoderTag::Glo
        };
        let entropy_enc = entropy::encode(block, entropy_tag);
        return smallest(vec![lz_enc, entropy_enc], block);
    }

    let entropy_tag = if entropy_estimate_eighths(block) >= ENTROPY_HIGH_THRESHOLD_EIGHTHS {
        EncoderTag::Ghi
    } else {
        EncoderTag::Glo
    };
    let entropy_enc = entropy::encode(block, entropy_tag);
    smallest(vec![entropy_enc], block)
}

fn smallest(mut candidates: Vec<EncodedBlock>, block: &[u8]) -> EncodedBlock {
    candidates.sort_by_key(|c| c.payload.len());
    match candidates.into_iter().next() {
        Some(best) if best.payload.len() < block.len() => best,
        _ => raw::encode(block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_block_is_raw() {
        let data = b"hi";
        let enc = select(data, Level::new(3));
        assert_eq!(enc.tag, EncoderTag::Raw);
    }

    #[test]
    fn empty_block_is_raw() {
        let enc = select(&[], Level::new(3));
        assert_eq!(enc.tag, EncoderTag::Raw);
    }

    #[test]
    fn arithmetic_progression_selects_num() {
        let values: Vec<u32> = (0..5000).map(|i| i * 100).collect();
        let mut block = Vec::new();
        for v in &values {
            block.extend_from_slice(&v.to_le_bytes());
        }
        let enc = select(&block, Level::new(3));
        assert_eq!(enc.tag, EncoderTag::Num);
        assert!(enc.payload.len() <= block.len() / 4);
    }

    #[test]
    fn repetitive_pattern_selects_lz() {
        let data = b"ABCDABCD".repeat(4096);
        let enc = select(&data, Level::new(3));
        assert_eq!(enc.tag, EncoderTag::Lz);
    }

    #[test]
    fn uniform_random_falls_back_to_raw() {
        // A simple xorshift-based PRNG gives a deterministic, near-uniform
        // byte stream with no exploitable structure, so no encoder should
        // beat RAW's size.
        let mut state: u32 = 0xC0FF_EE11;
        let mut data = vec![0u8; 4096];
        for b in data.iter_mut() {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            *b = (state & 0xFF) as u8;
        }
        let enc = select(&data, Level::new(3));
        assert_eq!(enc.tag, EncoderTag::Raw);
        assert_eq!(enc.payload.len(), data.len());
    }
}
