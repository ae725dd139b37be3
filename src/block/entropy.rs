//! GHI / GLO: canonical-Huffman general-purpose coders.
//!
//! Both tags share one wire format — a fixed 256-byte code-length
//! descriptor followed by a bit-packed canonical-Huffman body — because the
//! distinction between them is a *selection* heuristic (near-uniform vs.
//! skewed symbol distribution), not a format difference: the decoder
//! rebuilds the same inverse table either way. `GHI`/`GLO` are therefore two
//! tags pointing at one encode/decode pair, parameterized by which tag to
//! stamp on the output.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::types::{EncodedBlock, EncoderTag};
use crate::bitio::{BitReader, BitWriter};
use crate::error::{MalformedReason, ZxcError, ZxcResult};

// Upper bound on a canonical-Huffman code length. Must stay comfortably
// above the deepest tree BLOCK_MAX bytes of maximally-skewed (Fibonacci-like)
// symbol frequencies can produce (~26 for a 256 KiB block), and within
// BitWriter's 32-bit field width, so assign_lengths's clamp never actually
// fires and every emitted tree stays prefix-free.
const MAX_CODE_LEN: u8 = 32;

struct HeapNode {
    // Leaves carry Some(symbol); internal nodes carry None plus two children.
    symbol: Option<u8>,
    left: Option<Box<HeapNode>>,
    right: Option<Box<HeapNode>>,
}

/// Heap entry ordered by `(freq, tie_breaker)` only — `HeapNode` itself
/// carries no ordering so ties resolve deterministically by insertion order
/// rather than by pointer identity.
struct Entry {
    freq: u64,
    tie: u32,
    node: HeapNode,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.tie == other.tie
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.freq.cmp(&other.freq).then(self.tie.cmp(&other.tie))
    }
}

/// Computes a code length (1..=MAX_CODE_LEN) per symbol actually present in
/// `block`. Absent symbols get length 0. Ties are broken by symbol value so
/// the construction is deterministic across runs — encoding the same bytes
/// twice must produce the same tree regardless of thread scheduling, so
/// nothing here can depend on hashmap iteration order.
fn code_lengths(block: &[u8]) -> [u8; 256] {
    let mut freq = [0u64; 256];
    for &b in block {
        freq[b as usize] += 1;
    }

    let present: Vec<u8> = (0..256u16).filter(|&s| freq[s as usize] > 0).map(|s| s as u8).collect();
    let mut lengths = [0u8; 256];

    if present.is_empty() {
        return lengths;
    }
    if present.len() == 1 {
        lengths[present[0] as usize] = 1;
        return lengths;
    }

    let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();
    for (i, &s) in present.iter().enumerate() {
        heap.push(Reverse(Entry {
            freq: freq[s as usize],
            tie: i as u32,
            node: HeapNode {
                freq: freq[s as usize],
                symbol: Some(s),
                left: None,
                right: None,
            },
        }));
    }

    let mut tie_breaker: u32 = present.len() as u32;
    while heap.len() > 1 {
        let Reverse(a) = heap.pop().unwrap();
        let Reverse(b) = heap.pop().unwrap();
        let combined_freq = a.freq + b.freq;
        tie_breaker += 1;
        heap.push(Reverse(Entry {
            freq: combined_freq,
            tie: tie_breaker,
            node: HeapNode {
                freq: combined_freq,
                symbol: None,
                left: Some(Box::new(a.node)),
                right: Some(Box::new(b.node)),
            },
        }));
    }

    let Reverse(root_entry) = heap.pop().unwrap();
    assign_lengths(&root_entry.node, 0, &mut lengths);
    lengths
}

fn assign_lengths(node: &HeapNode, depth: u8, lengths: &mut [u8; 256]) {
    if let Some(sym) = node.symbol {
        lengths[sym as usize] = depth.max(1).min(MAX_CODE_LEN);
        return;
    }
    if let Some(l) = &node.left {
        assign_lengths(l, depth + 1, lengths);
    }
    if let Some(r) = &node.right {
        assign_lengths(r, depth + 1, lengths);
    }
}

/// Assigns canonical codes given code lengths: symbols ordered by
/// `(length, symbol)`, codes incrementing within a length and left-shifting
/// when the length grows. Returns `(code, length)` per symbol, `(0, 0)` for
/// absent ones.
fn canonical_codes(lengths: &[u8; 256]) -> [(u32, u8); 256] {
    let mut order: Vec<u8> = (0..256u16)
        .filter(|&s| lengths[s as usize] > 0)
        .map(|s| s as u8)
        .collect();
    order.sort_by_key(|&s| (lengths[s as usize], s));

    let mut codes = [(0u32, 0u8); 256];
    let mut code: u32 = 0;
    let mut prev_len = 0u8;
    for sym in order {
        let len = lengths[sym as usize];
        code <<= len - prev_len;
        codes[sym as usize] = (code, len);
        code += 1;
        prev_len = len;
    }
    codes
}

pub fn encode(block: &[u8], tag: EncoderTag) -> EncodedBlock {
    debug_assert!(matches!(tag, EncoderTag::Ghi | EncoderTag::Glo));
    let lengths = code_lengths(block);
    let codes = canonical_codes(&lengths);

    let mut payload = Vec::with_capacity(256 + block.len() / 2 + 8);
    payload.extend_from_slice(&lengths);

    let mut writer = BitWriter::new();
    for &b in block {
        let (code, len) = codes[b as usize];
        // BitWriter::write appends a value's bits LSB-first, but
        // build_decode_tree walks each code MSB-first (root to leaf). Write
        // one bit at a time, most significant first, so the arrival order
        // on the reader side matches the tree traversal order.
        for i in (0..len).rev() {
            writer.write((code >> i) & 1, 1);
        }
    }
    payload.extend_from_slice(&writer.finish());

    EncodedBlock {
        tag,
        tag_flags: 0,
        uncompressed_len: block.len() as u32,
        payload,
    }
}

/// Rebuilds the canonical-Huffman decode table from a code-length
/// descriptor: maps `(code, length) -> symbol`, checked by walking bit by
/// bit (binary-tree style) rather than a flat LUT, since lengths can reach
/// `MAX_CODE_LEN`.
struct DecodeNode {
    symbol: Option<u8>,
    children: [Option<Box<DecodeNode>>; 2],
}

impl DecodeNode {
    fn empty() -> Self {
        DecodeNode {
            symbol: None,
            children: [None, None],
        }
    }
}

fn build_decode_tree(lengths: &[u8; 256]) -> ZxcResult<DecodeNode> {
    let codes = canonical_codes(lengths);
    let mut root = DecodeNode::empty();
    for sym in 0..256usize {
        let (code, len) = codes[sym];
        if len == 0 {
            continue;
        }
        let mut node = &mut root;
        for i in (0..len).rev() {
            let bit = ((code >> i) & 1) as usize;
            node = node.children[bit].get_or_insert_with(|| Box::new(DecodeNode::empty()));
        }
        if node.symbol.is_some() || node.children[0].is_some() || node.children[1].is_some() {
            return Err(ZxcError::MalformedFrame(MalformedReason::CodeBookInvalid));
        }
        node.symbol = Some(sym as u8);
    }
    Ok(root)
}

pub fn decode(payload: &[u8], uncompressed_len: u32) -> ZxcResult<Vec<u8>> {
    if payload.len() < 256 {
        return Err(ZxcError::MalformedFrame(MalformedReason::CodeBookInvalid));
    }
    let mut lengths = [0u8; 256];
    lengths.copy_from_slice(&payload[..256]);
    for &len in &lengths {
        if len > MAX_CODE_LEN {
            return Err(ZxcError::MalformedFrame(MalformedReason::CodeBookInvalid));
        }
    }

    let target = uncompressed_len as usize;
    if target == 0 {
        return Ok(Vec::new());
    }

    let only_symbol = {
        let present: Vec<u8> = (0..256u16).filter(|&s| lengths[s as usize] > 0).map(|s| s as u8).collect();
        if present.is_empty() {
            return Err(ZxcError::MalformedFrame(MalformedReason::CodeBookInvalid));
        }
        (present.len() == 1).then_some(present[0])
    };
    if let Some(sym) = only_symbol {
        return Ok(vec![sym; target]);
    }

    let tree = build_decode_tree(&lengths)?;
    let body = &payload[256..];
    let mut reader = BitReader::new(body);
    let mut out = Vec::with_capacity(target);

    while out.len() < target {
        let mut node = &tree;
        loop {
            reader.ensure(1);
            if reader.is_exhausted() && node.symbol.is_none() {
                return Err(ZxcError::MalformedFrame(MalformedReason::LengthMismatch));
            }
            let bit = reader.read(1) as usize;
            node = node.children[bit]
                .as_deref()
                .ok_or(ZxcError::MalformedFrame(MalformedReason::CodeBookInvalid))?;
            if let Some(sym) = node.symbol {
                out.push(sym);
                break;
            }
        }
    }
    Ok(out)
}
