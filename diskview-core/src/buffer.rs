//! Capacity-checked read buffer
//!
//! Holds the most recently read file contents. Writers never get more
//! than `N - 1` bytes of room; the last byte is kept as a terminator so
//! the storage is always a valid C-style string for text renderers.

/// Read buffer capacity used by the firmware
pub const READ_BUFFER_SIZE: usize = 100;

/// Result of a buffer write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fill {
    /// Bytes now held by the buffer
    pub written: usize,
    /// The source offered more than the buffer accepts
    pub truncated: bool,
}

/// Fixed-capacity byte buffer
#[derive(Debug, Clone)]
pub struct ReadBuffer<const N: usize> {
    data: [u8; N],
    len: usize,
}

impl<const N: usize> Default for ReadBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadBuffer<N> {
    /// Largest number of bytes a single write may store
    ///
    /// Fails to compile for a zero-capacity buffer.
    pub const LIMIT: usize = N - 1;

    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            len: 0,
        }
    }

    /// Total storage, including the terminator byte
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Largest request that may be issued against this buffer
    pub const fn read_limit(&self) -> usize {
        Self::LIMIT
    }

    /// Number of valid bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer holds no data
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Valid bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Contents as text
    ///
    /// Stops at the first NUL byte and at the first invalid UTF-8
    /// sequence, the way a C string renderer would stop.
    pub fn as_text(&self) -> &str {
        let bytes = self.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let bytes = &bytes[..end];
        match core::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    /// Drop all contents
    pub fn clear(&mut self) {
        self.set_len(0);
    }

    /// Replace the contents with `src`, truncating to [`Self::LIMIT`]
    pub fn write(&mut self, src: &[u8]) -> Fill {
        let n = src.len().min(Self::LIMIT);
        self.data[..n].copy_from_slice(&src[..n]);
        self.set_len(n);
        Fill {
            written: n,
            truncated: src.len() > Self::LIMIT,
        }
    }

    /// Let `reader` produce new contents
    ///
    /// `reader` receives exactly [`Self::LIMIT`] bytes of scratch room and
    /// returns how many it wrote. A count larger than the room it was
    /// given is clamped and reported as truncation. The buffer is only
    /// replaced when `reader` succeeds; on error it keeps its previous
    /// contents, whatever the reader had stored by then.
    pub fn fill_with<E>(
        &mut self,
        reader: impl FnOnce(&mut [u8]) -> Result<usize, E>,
    ) -> Result<Fill, E> {
        let mut staged = [0u8; N];
        let reported = reader(&mut staged[..Self::LIMIT])?;
        let n = reported.min(Self::LIMIT);
        self.data[..n].copy_from_slice(&staged[..n]);
        self.set_len(n);
        Ok(Fill {
            written: n,
            truncated: reported > Self::LIMIT,
        })
    }

    fn set_len(&mut self, len: usize) {
        self.len = len;
        self.data[len] = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_leaves_terminator() {
        let buf = ReadBuffer::<READ_BUFFER_SIZE>::new();
        assert_eq!(buf.capacity(), 100);
        assert_eq!(buf.read_limit(), 99);
    }

    #[test]
    fn test_write_fits() {
        let mut buf = ReadBuffer::<8>::new();
        let fill = buf.write(b"HELLO");
        assert_eq!(
            fill,
            Fill {
                written: 5,
                truncated: false
            }
        );
        assert_eq!(buf.as_text(), "HELLO");
    }

    #[test]
    fn test_write_truncates() {
        let mut buf = ReadBuffer::<4>::new();
        let fill = buf.write(b"ABCDEFG");
        assert_eq!(fill.written, 3);
        assert!(fill.truncated);
        assert_eq!(buf.as_bytes(), b"ABC");
    }

    #[test]
    fn test_exact_limit_is_not_truncation() {
        let mut buf = ReadBuffer::<4>::new();
        let fill = buf.write(b"ABC");
        assert_eq!(fill.written, 3);
        assert!(!fill.truncated);
    }

    #[test]
    fn test_fill_with_offers_limit() {
        let mut buf = ReadBuffer::<16>::new();
        let mut offered = 0;
        let fill = buf
            .fill_with(|dst| {
                offered = dst.len();
                dst[..2].copy_from_slice(b"hi");
                Ok::<_, ()>(2)
            })
            .unwrap();
        assert_eq!(offered, 15);
        assert_eq!(fill.written, 2);
        assert_eq!(buf.as_text(), "hi");
    }

    #[test]
    fn test_fill_with_clamps_overreport() {
        let mut buf = ReadBuffer::<8>::new();
        let fill = buf.fill_with(|_| Ok::<_, ()>(500)).unwrap();
        assert_eq!(fill.written, 7);
        assert!(fill.truncated);
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_fill_with_error_keeps_length() {
        let mut buf = ReadBuffer::<8>::new();
        buf.write(b"old");
        let result = buf.fill_with(|_| Err::<usize, _>("boom"));
        assert_eq!(result, Err("boom"));
        assert_eq!(buf.as_text(), "old");
    }

    #[test]
    fn test_fill_with_partial_then_error_keeps_old_contents() {
        let mut buf = ReadBuffer::<16>::new();
        buf.write(b"OLD CONTENT");
        let result = buf.fill_with(|dst| {
            dst[..3].copy_from_slice(b"NEW");
            Err::<usize, _>("disk")
        });
        assert_eq!(result, Err("disk"));
        assert_eq!(buf.as_bytes(), b"OLD CONTENT");
        assert_eq!(buf.len(), 11);
    }

    #[test]
    fn test_text_stops_at_nul_and_invalid_utf8() {
        let mut buf = ReadBuffer::<16>::new();
        buf.write(b"ab\0cd");
        assert_eq!(buf.as_text(), "ab");

        buf.write(&[b'o', b'k', 0xFF, b'x']);
        assert_eq!(buf.as_text(), "ok");
    }

    #[test]
    fn test_clear() {
        let mut buf = ReadBuffer::<8>::new();
        buf.write(b"data");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.as_text(), "");
    }
}
