//! Abstract byte source/sink.
//!
//! The codec core never opens a file or a socket directly; it reads from a
//! `ByteSource` and writes to a `ByteSink`. Blanket impls over `std::io::Read`
//! / `std::io::Write` let any concrete transport (a file, a `Vec<u8>`
//! cursor, a `tempfile` handle in tests) plug in directly.

use std::io::{Read, Write};

use crate::error::ZxcResult;

/// A sequential byte source: "read up to N, return bytes read (0 at EOF)".
/// Any I/O error is fatal to the whole stream.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes, returning the number read. Returns
    /// `Ok(0)` only at end-of-input.
    fn read_some(&mut self, buf: &mut [u8]) -> ZxcResult<usize>;
}

impl<R: Read> ByteSource for R {
    fn read_some(&mut self, buf: &mut [u8]) -> ZxcResult<usize> {
        Ok(self.read(buf)?)
    }
}

/// A sequential byte sink: "write N, return bytes written". A short write is
/// fatal to the whole stream.
pub trait ByteSink {
    fn write_all_bytes(&mut self, buf: &[u8]) -> ZxcResult<()>;
}

impl<W: Write> ByteSink for W {
    fn write_all_bytes(&mut self, buf: &[u8]) -> ZxcResult<()> {
        self.write_all(buf)?;
        Ok(())
    }
}

/// A sink that discards every byte written, for dry-run/benchmark mode:
/// the codec still validates input and computes output size, it just never
/// retains the bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    pub bytes_written: u64,
}

impl ByteSink for NullSink {
    fn write_all_bytes(&mut self, buf: &[u8]) -> ZxcResult<()> {
        self.bytes_written += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cursor_is_a_byte_source_and_sink() {
        let mut src = Cursor::new(b"hello".to_vec());
        let mut buf = [0u8; 3];
        let n = ByteSource::read_some(&mut src, &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf, b"hel");

        let mut dst: Vec<u8> = Vec::new();
        ByteSink::write_all_bytes(&mut dst, b"world").unwrap();
        assert_eq!(dst, b"world");
    }

    #[test]
    fn null_sink_counts_without_retaining() {
        let mut sink = NullSink::default();
        sink.write_all_bytes(b"abcdef").unwrap();
        sink.write_all_bytes(b"gh").unwrap();
        assert_eq!(sink.bytes_written, 8);
    }
}
