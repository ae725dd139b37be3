//! ZXC: a block-oriented, multithreaded compression codec.
//!
//! The crate is layered bottom-up: bit-level primitives (`bitio`), a block
//! checksum (`checksum`), block encoders/decoders and the selector that
//! picks among them (`block`), the wire format (`frame`), the parallel
//! pipeline that drives them over a stream (`pipeline`), and a one-shot
//! in-memory convenience API (`buffer`). `io` supplies the abstract
//! source/sink traits everything above `block` is built against.

pub mod bitio;
pub mod block;
pub mod buffer;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod io;
pub mod lorem;
pub mod pipeline;

pub use buffer::{compress, compress_bound, compress_into, decompress};
pub use config::{Config, Level, Threads};
pub use error::{MalformedReason, ZxcError, ZxcResult};
pub use io::{ByteSink, ByteSource, NullSink};
pub use pipeline::{stream_compress, stream_decompress};

/// Wire-format version this build reads and writes (`frame::header::VERSION`).
pub const VERSION: u8 = frame::header::VERSION;
