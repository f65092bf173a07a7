//! Byte sources the parser can read from.
//!
//! A [`Source`] hands out bytes one at a time, supports bulk reads into a
//! caller buffer, and reports how many bytes have been consumed so far. The
//! library never closes a source; the host retains ownership of the
//! underlying stream.

use std::io::{self, Read};

/// A stream of bytes consumed by the parser.
pub trait Source {
    /// Reads the next byte, or `None` at end of input.
    fn get_byte(&mut self) -> io::Result<Option<u8>>;

    /// Reads up to `buf.len()` bytes into `buf` and returns the count
    /// actually read. A short count signals end of input.
    fn get_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Number of bytes consumed from the stream so far.
    fn offset(&self) -> i64;
}

/// A source over a memory slice.
///
/// ```rust
/// use taxon::{Source, SliceSource};
///
/// let mut source = SliceSource::from("[]");
/// assert_eq!(source.get_byte().unwrap(), Some(b'['));
/// assert_eq!(source.offset(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Wraps a byte slice.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl<'a> From<&'a [u8]> for SliceSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a str> for SliceSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl Source for SliceSource<'_> {
    fn get_byte(&mut self) -> io::Result<Option<u8>> {
        match self.bytes.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    fn get_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len().min(self.bytes.len() - self.pos);
        buf[..count].copy_from_slice(&self.bytes[self.pos..self.pos + count]);
        self.pos += count;
        Ok(count)
    }

    fn offset(&self) -> i64 {
        self.pos as i64
    }
}

/// A source over any [`std::io::Read`] stream, such as a file handle.
///
/// Reads are unbuffered; wrap slow streams in a [`std::io::BufReader`].
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> ReadSource<R> {
    /// Wraps a reader.
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for ReadSource<R> {
    fn get_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.consumed += 1;
                    return Ok(Some(byte[0]));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }

    fn get_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        self.consumed += filled as u64;
        Ok(filled)
    }

    fn offset(&self) -> i64 {
        self.consumed as i64
    }
}
