//! Byte sinks the formatter can write to.
//!
//! A [`Sink`] accepts single bytes and byte slices. Failures are propagated
//! to the caller; the formatter does not attempt to recover. The library
//! never closes a sink; the host retains ownership of the underlying stream.

use std::io::{self, Write};

/// A stream of bytes produced by the formatter.
pub trait Sink {
    /// Writes one byte.
    fn put_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Writes a slice of bytes.
    fn put_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl Sink for Vec<u8> {
    fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// The formatter emits pure ASCII, so a `String` sink never actually
/// rejects its input; the UTF-8 check only guards direct host writes.
impl Sink for String {
    fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        if byte.is_ascii() {
            self.push(byte as char);
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "non-ASCII byte written to a String sink",
            ))
        }
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        match std::str::from_utf8(bytes) {
            Ok(text) => {
                self.push_str(text);
                Ok(())
            }
            Err(_) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "non-UTF-8 bytes written to a String sink",
            )),
        }
    }
}

/// A sink over any [`std::io::Write`] stream, such as a file handle.
///
/// Writes are unbuffered; wrap slow streams in a [`std::io::BufWriter`].
#[derive(Debug)]
pub struct WriteSink<W> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    /// Wraps a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte])
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }
}
