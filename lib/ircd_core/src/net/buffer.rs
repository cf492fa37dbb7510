use ircd_support::NetResult;
use slice_deque::SliceDeque;
use std::io;

/// A growable FIFO byte queue: data is appended at the tail and consumed from
/// the head. Capacity is caller-supplied rather than fixed, since a
/// connection needs two differently-capped buffers (inbound hard cap,
/// outbound soft cap) rather than one shared size.
pub struct Buffer {
    data: SliceDeque<u8>,
}

impl Buffer {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Buffer {
        let mut data = SliceDeque::new();
        data.reserve(capacity);
        Buffer { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Appends raw bytes to the tail of the buffer.
    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Drops `count` bytes from the head of the buffer (e.g. a line that was
    /// just framed and handed to the parser).
    #[inline]
    pub fn consume(&mut self, count: usize) {
        self.data.drain(..count);
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Reads as much as is available from `reader` into the buffer in a single
    /// pass, returning the number of bytes appended. Propagates `WouldBlock` as
    /// [`ircd_support::NetError::Wait`].
    #[inline]
    pub fn ingress<R: io::Read>(&mut self, mut reader: R, scratch: &mut [u8]) -> NetResult<usize> {
        let read = reader.read(scratch)?;

        if read == 0 {
            return Err(ircd_support::NetError::Fatal(
                ircd_support::NetErrorKind::PeerClosed,
            ));
        }

        self.extend(&scratch[..read]);
        Ok(read)
    }

    /// Writes as much of the buffer as the writer will accept, consuming the
    /// bytes actually sent. Returns the number of bytes written.
    #[inline]
    pub fn egress<W: io::Write>(&mut self, mut writer: W) -> NetResult<usize> {
        if self.data.is_empty() {
            return Ok(0);
        }

        let written = writer.write(&self.data)?;

        if written == 0 {
            return Err(ircd_support::NetError::Fatal(
                ircd_support::NetErrorKind::Io(io::ErrorKind::WriteZero),
            ));
        }

        self.consume(written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_then_consume() {
        let mut buf = Buffer::with_capacity(16);
        buf.extend(b"hello");
        assert_eq!(buf.as_slice(), b"hello");
        buf.consume(2);
        assert_eq!(buf.as_slice(), b"llo");
    }

    #[test]
    fn egress_drains_fully_written_bytes() {
        let mut buf = Buffer::with_capacity(16);
        buf.extend(b"ping");
        let mut sink = Vec::new();
        let written = buf.egress(&mut sink).unwrap();
        assert_eq!(written, 4);
        assert!(buf.is_empty());
        assert_eq!(sink, b"ping");
    }

    #[test]
    fn ingress_zero_bytes_is_peer_closed() {
        let mut buf = Buffer::with_capacity(16);
        let mut scratch = [0u8; 16];
        let result = buf.ingress(&[][..], &mut scratch);
        assert_eq!(
            result.unwrap_err(),
            ircd_support::NetError::Fatal(ircd_support::NetErrorKind::PeerClosed)
        );
    }
}
