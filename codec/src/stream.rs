//! Byte sinks and sources that keep track of how many bytes have passed through them.
//!
//! Every [crate::Encode] implementation writes into an [Encoder] and every [crate::Decode]
//! implementation reads from a [Decoder]. Both wrap a standard [io::Write] / [io::Read] and
//! count the bytes produced or consumed, so a failure can always be reported with the exact
//! offset at which it occurred (see [crate::Failure]).

use crate::{bounded, varint, Config, Error};
use bytes::BufMut;
use std::io;
use tracing::debug;

/// Sink for encoded bytes.
#[derive(Debug)]
pub struct Encoder<W> {
    writer: W,
    written: usize,
}

impl<W: io::Write> Encoder<W> {
    /// Creates an encoder writing into `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of bytes written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes all of `buf`, counting every byte accepted by the writer (even if a later write
    /// fails).
    pub fn write_all(&mut self, mut buf: &[u8]) -> Result<(), Error> {
        while !buf.is_empty() {
            match self.writer.write(buf) {
                Ok(0) => return Err(Error::Io(io::ErrorKind::WriteZero.into())),
                Ok(n) => {
                    self.written += n;
                    buf = &buf[n..];
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::Io(err)),
            }
        }
        Ok(())
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.write_all(&[value])
    }

    /// Writes `value` as a canonical ULEB128 varint.
    ///
    /// Fails with [Error::OutOfRange] if `value` does not fit in a `u32`.
    pub fn write_varint(&mut self, value: u64) -> Result<(), Error> {
        let value = varint::check(value)?;
        let mut scratch = [0u8; varint::MAX_LEN];
        let mut buf = &mut scratch[..];
        varint::write(value, &mut buf);
        let len = varint::MAX_LEN - buf.remaining_mut();
        self.write_all(&scratch[..len])
    }

    /// Writes a length (or element count) prefix.
    pub fn write_length(&mut self, len: usize) -> Result<(), Error> {
        let len = u64::try_from(len).map_err(|_| Error::OutOfRange(u64::MAX))?;
        self.write_varint(len)
    }

    /// Writes a length-prefixed byte payload.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_length(bytes.len())?;
        self.write_all(bytes)
    }

    /// Writes the discriminant of a tagged union.
    pub fn write_variant(&mut self, index: u32) -> Result<(), Error> {
        self.write_varint(u64::from(index))
    }

    /// Writes the presence byte of an optional value.
    pub fn write_presence(&mut self, present: bool) -> Result<(), Error> {
        self.write_u8(u8::from(present))
    }
}

/// Source of encoded bytes.
///
/// The source is treated as sequential and non-seekable: bytes are pulled only as they are
/// needed, so a [Decoder] can be placed directly on top of a socket or file.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    consumed: usize,
    depth: usize,
    config: Config,
}

impl<R: io::Read> Decoder<R> {
    /// Creates a decoder over `reader` with the default [Config].
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, Config::default())
    }

    /// Creates a decoder over `reader` with the given [Config].
    pub fn with_config(reader: R, config: Config) -> Self {
        Self {
            reader,
            consumed: 0,
            depth: 0,
            config,
        }
    }

    /// Number of bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The configuration in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Fills `buf` from the source.
    ///
    /// Fails with [Error::Truncated] if the source ends first. Bytes read before the failure
    /// are still counted.
    pub fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<(), Error> {
        while !buf.is_empty() {
            match self.reader.read(buf) {
                Ok(0) => return Err(Error::Truncated),
                Ok(n) => {
                    self.consumed += n;
                    buf = &mut std::mem::take(&mut buf)[n..];
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(Error::Truncated)
                }
                Err(err) => return Err(Error::Io(err)),
            }
        }
        Ok(())
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads exactly `N` bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut dst = [0u8; N];
        self.read_exact(&mut dst)?;
        Ok(dst)
    }

    /// Reads a canonical ULEB128 varint.
    pub fn read_varint(&mut self) -> Result<u32, Error> {
        varint::read(self)
    }

    /// Reads a length (or element count) prefix, enforcing [Config::max_length].
    pub fn read_length(&mut self) -> Result<usize, Error> {
        let len = usize::try_from(self.read_varint()?).map_err(|_| Error::Overflow)?;
        if len > self.config.max_length {
            return Err(Error::LengthExceeded(len, self.config.max_length));
        }
        Ok(len)
    }

    /// Reads `len` bytes in bounded chunks (see [crate::bounded]).
    pub fn read_payload(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        bounded::read_payload(self, len)
    }

    /// Reads a length-prefixed byte payload.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let len = self.read_length()?;
        self.read_payload(len)
    }

    /// Reads the discriminant of a tagged union with `count` variants.
    ///
    /// Fails with [Error::VariantOutOfRange] (after consuming only the discriminant) if the
    /// index names no variant.
    pub fn read_variant(&mut self, count: u32) -> Result<u32, Error> {
        let index = self.read_varint()?;
        if index >= count {
            return Err(Error::VariantOutOfRange(index, count));
        }
        Ok(index)
    }

    /// Reads the presence byte of an optional value.
    pub fn read_presence(&mut self) -> Result<bool, Error> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidPresence(other)),
        }
    }

    /// Runs `f` one nesting level deeper, failing with [Error::DepthExceeded] if that would
    /// exceed [Config::max_depth].
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= self.config.max_depth {
            debug!(max_depth = self.config.max_depth, "depth limit reached");
            return Err(Error::DepthExceeded(self.config.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Reads `len` elements with `read`.
    ///
    /// `len` usually comes from the input, so the initial allocation is capped at one chunk's
    /// worth of elements and the vector only grows as elements are decoded. Elements that
    /// occupy no input would let a short prefix claim unbounded memory, so once the vector
    /// outgrows that cap an element that consumed nothing fails with
    /// [Error::LengthExceeded].
    pub fn read_elements<T>(
        &mut self,
        len: usize,
        mut read: impl FnMut(&mut Self) -> Result<T, Error>,
    ) -> Result<Vec<T>, Error> {
        let element = std::mem::size_of::<T>().max(1);
        let capacity = self.config.chunk_size / element;
        let mut items = Vec::with_capacity(len.min(capacity));
        for _ in 0..len {
            let start = self.consumed;
            items.push(read(self)?);
            if items.len() > capacity && self.consumed == start {
                debug!(len, capacity, "zero-width elements exceed one chunk");
                return Err(Error::LengthExceeded(len, capacity));
            }
        }
        Ok(items)
    }
}

// Custom decode hooks read through the decoder so the bytes they consume are counted.
impl<R: io::Read> io::Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.consumed += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A source that yields at most one byte per read and fails once exhausted.
    struct Trickle<'a> {
        data: &'a [u8],
        fail: bool,
    }

    impl io::Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                if self.fail {
                    return Err(io::Error::other("connection reset"));
                }
                return Ok(0);
            }
            buf[0] = self.data[0];
            self.data = &self.data[1..];
            Ok(1)
        }
    }

    /// A sink that accepts `capacity` bytes and then refuses.
    struct Limited {
        capacity: usize,
        data: Vec<u8>,
    }

    impl io::Write for Limited {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.data.len() == self.capacity {
                return Err(io::Error::other("disk full"));
            }
            let n = buf.len().min(self.capacity - self.data.len()).min(2);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_exact_counts_partial_reads() {
        let mut decoder = Decoder::new(Trickle {
            data: &[1, 2, 3],
            fail: false,
        });
        let mut buf = [0u8; 5];
        assert!(matches!(decoder.read_exact(&mut buf), Err(Error::Truncated)));
        assert_eq!(decoder.consumed(), 3);
    }

    #[test]
    fn test_read_exact_propagates_io_error() {
        let mut decoder = Decoder::new(Trickle {
            data: &[1, 2],
            fail: true,
        });
        let mut buf = [0u8; 4];
        assert!(matches!(decoder.read_exact(&mut buf), Err(Error::Io(_))));
        assert_eq!(decoder.consumed(), 2);
    }

    #[test]
    fn test_write_all_counts_partial_writes() {
        let mut encoder = Encoder::new(Limited {
            capacity: 3,
            data: Vec::new(),
        });
        assert!(matches!(encoder.write_all(&[1, 2, 3, 4]), Err(Error::Io(_))));
        assert_eq!(encoder.written(), 3);
    }

    #[test]
    fn test_presence() {
        let mut decoder = Decoder::new(&[0u8, 1, 2][..]);
        assert!(!decoder.read_presence().unwrap());
        assert!(decoder.read_presence().unwrap());
        assert!(matches!(
            decoder.read_presence(),
            Err(Error::InvalidPresence(2))
        ));
        assert_eq!(decoder.consumed(), 3);
    }

    #[test]
    fn test_read_length_limit() {
        let cfg = Config::default().with_max_length(4);
        let mut decoder = Decoder::with_config(&[5u8][..], cfg);
        assert!(matches!(
            decoder.read_length(),
            Err(Error::LengthExceeded(5, 4))
        ));
    }

    #[test]
    fn test_read_variant() {
        let mut decoder = Decoder::new(&[5u8, 42][..]);
        assert!(matches!(
            decoder.read_variant(4),
            Err(Error::VariantOutOfRange(5, 4))
        ));
        assert_eq!(decoder.consumed(), 1);
    }

    #[test]
    fn test_nested_depth() {
        let cfg = Config::default().with_max_depth(2);
        let mut decoder = Decoder::with_config(io::empty(), cfg);
        let result = decoder.nested(|d| d.nested(|d| d.nested(|_| Ok(()))));
        assert!(matches!(result, Err(Error::DepthExceeded(2))));

        // Depth is restored after a failure.
        assert!(decoder.nested(|d| d.nested(|_| Ok(()))).is_ok());
    }

    #[test]
    fn test_read_elements_zero_width() {
        // 16 `u64`s fill a 128-byte chunk.
        let cfg = Config::default().with_chunk_size(128);
        let mut decoder = Decoder::with_config(io::empty(), cfg);
        let items = decoder.read_elements(16, |_| Ok(0u64)).unwrap();
        assert_eq!(items.len(), 16);

        let err = decoder.read_elements(17, |_| Ok(0u64)).unwrap_err();
        assert!(matches!(err, Error::LengthExceeded(17, 16)));
    }

    #[test]
    fn test_read_elements_past_capacity() {
        let cfg = Config::default().with_chunk_size(2);
        let mut decoder = Decoder::with_config(&[1u8, 2, 3, 4][..], cfg);
        let items = decoder.read_elements(4, |d| d.read_u8()).unwrap();
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(decoder.consumed(), 4);
    }

    #[test]
    fn test_write_varint_out_of_range() {
        let mut encoder = Encoder::new(Vec::new());
        assert!(matches!(
            encoder.write_varint(u64::from(u32::MAX) + 1),
            Err(Error::OutOfRange(_))
        ));
        assert_eq!(encoder.written(), 0);
        encoder.write_varint(u64::from(u32::MAX)).unwrap();
        assert_eq!(encoder.into_inner(), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }
}
