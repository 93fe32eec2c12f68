//! Counting reader for tracking bytes streamed out of source files.
//!
//! The tar sink pulls file contents through a `CountingReader` to detect
//! files that shrink between `stat` and read.

use std::io::Read;

/// Wrapper reader that tracks total bytes read.
///
/// # Examples
///
/// ```
/// use packit_core::io::CountingReader;
/// use std::io::Read;
///
/// let mut reader = CountingReader::new(&b"Hello, World!"[..]);
/// let mut out = String::new();
/// reader.read_to_string(&mut out)?;
///
/// assert_eq!(reader.total_bytes(), 13);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CountingReader<R> {
    inner: R,
    bytes_read: u64,
}

impl<R> CountingReader<R> {
    /// Creates a new counting reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Returns the total number of bytes successfully read.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes = self.inner.read(buf)?;
        self.bytes_read += bytes as u64;
        Ok(bytes)
    }
}
