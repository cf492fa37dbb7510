use crate::net::buffer::Buffer;

/// Splits a byte stream into CRLF- or LF-terminated lines, preserving any
/// trailing partial line across reads. Built directly on top of `Buffer`
/// rather than its own storage, so a partial line surviving one `read()`
/// picks up exactly where it left off on the next.
pub struct Framer;

impl Framer {
    /// Pops the next complete line out of `buffer`, if one is available. The
    /// terminator (`\r\n` or `\n`) is consumed but not included in the result.
    /// Returns `None` if the buffer holds no terminator yet; the unterminated
    /// tail is left in place for the next read.
    pub fn next_line(buffer: &mut Buffer) -> Option<String> {
        let data = buffer.as_slice();
        let newline_at = data.iter().position(|&b| b == b'\n')?;

        let line_end = if newline_at > 0 && data[newline_at - 1] == b'\r' {
            newline_at - 1
        } else {
            newline_at
        };

        let line = String::from_utf8_lossy(&data[..line_end]).into_owned();
        buffer.consume(newline_at + 1);
        Some(line)
    }

    /// Drains every complete line currently buffered, ignoring empty ones, and
    /// hands each non-empty line to `on_line` in arrival order.
    pub fn drain_lines<F: FnMut(String)>(buffer: &mut Buffer, mut on_line: F) {
        while let Some(line) = Self::next_line(buffer) {
            if !line.is_empty() {
                on_line(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_crlf_line() {
        let mut buf = Buffer::with_capacity(64);
        buf.extend(b"NICK alice\r\nUSER a 0 * :A\r\n");
        assert_eq!(Framer::next_line(&mut buf).as_deref(), Some("NICK alice"));
        assert_eq!(Framer::next_line(&mut buf).as_deref(), Some("USER a 0 * :A"));
        assert_eq!(Framer::next_line(&mut buf), None);
    }

    #[test]
    fn splits_bare_lf_line() {
        let mut buf = Buffer::with_capacity(64);
        buf.extend(b"PING tok\n");
        assert_eq!(Framer::next_line(&mut buf).as_deref(), Some("PING tok"));
    }

    #[test]
    fn retains_partial_tail() {
        let mut buf = Buffer::with_capacity(64);
        buf.extend(b"NICK ali");
        assert_eq!(Framer::next_line(&mut buf), None);
        buf.extend(b"ce\r\n");
        assert_eq!(Framer::next_line(&mut buf).as_deref(), Some("NICK alice"));
    }

    #[test]
    fn empty_lines_are_ignored_by_drain() {
        let mut buf = Buffer::with_capacity(64);
        buf.extend(b"\r\nNICK alice\r\n\r\n");
        let mut seen = Vec::new();
        Framer::drain_lines(&mut buf, |line| seen.push(line));
        assert_eq!(seen, vec!["NICK alice".to_string()]);
    }
}
