use std::io;

/// Result alias for fallible network operations.
///
/// A bare `io::Result` conflates "try again later" with "the connection is
/// dead", which every call site would otherwise have to re-derive from the
/// `io::ErrorKind`.
pub type NetResult<T> = Result<T, NetError>;

/// Two-level error: either the operation should be retried once the socket is
/// ready again, or the connection is unrecoverable and must be closed.
#[derive(Debug, Eq, PartialEq)]
pub enum NetError {
    Wait,
    Fatal(NetErrorKind),
}

#[derive(Debug, Eq, PartialEq)]
pub enum NetErrorKind {
    Io(io::ErrorKind),
    /// Inbound buffer exceeded its hard cap before a line terminator arrived.
    LineTooLong,
    /// Outbound buffer exceeded its soft cap; the peer isn't draining fast enough.
    BackPressure,
    /// `read` returned `Ok(0)`.
    PeerClosed,
}

impl From<io::Error> for NetError {
    #[inline]
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock => NetError::Wait,
            kind => NetError::Fatal(NetErrorKind::Io(kind)),
        }
    }
}

/// Convenience for treating `Wait` as non-failure in `?`-free call sites.
pub trait ErrorUtils {
    fn has_failed(&self) -> bool;
}

impl<T> ErrorUtils for NetResult<T> {
    fn has_failed(&self) -> bool {
        !matches!(self, Ok(_) | Err(NetError::Wait))
    }
}
