use crate::net::buffer::Buffer;
use mio::net::TcpStream;
use mio::Token;
use std::time::Instant;

/// Identifies a connection. Backed by the `mio::Token` handed out on accept,
/// treated as an opaque integer key so the rest of the code never has to know
/// it's actually a reactor registration token.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ConnId(pub usize);

impl From<Token> for ConnId {
    fn from(token: Token) -> Self {
        ConnId(token.0)
    }
}

impl From<ConnId> for Token {
    fn from(id: ConnId) -> Self {
        Token(id.0)
    }
}

/// Registration phase of a connection: gates which commands are meaningful
/// before a client has authenticated and picked an identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConnPhase {
    AwaitingPassword,
    AwaitingRegistration,
    Registered,
    Closing,
}

pub const OUTBOUND_SOFT_CAP: usize = 64 * 1024;
const PASSWORD_ATTEMPTS: u8 = 3;

/// Per-client state: socket, non-blocking buffers, registration phase, identity.
pub struct Connection {
    pub id: ConnId,
    pub stream: TcpStream,
    pub phase: ConnPhase,
    pub password_attempts_remaining: u8,

    pub nickname: String,
    pub username: String,
    pub realname: String,

    pub inbound: Buffer,
    pub outbound: Buffer,

    /// Whether the reactor currently needs write-readiness for this socket.
    pub write_interested: bool,

    pub connected_at: Instant,
}

impl Connection {
    /// `max_message_length` sizes the inbound buffer's initial reservation;
    /// the reactor enforces the same value as the hard cap on an unterminated
    /// line before a connection is dropped.
    pub fn new(id: ConnId, stream: TcpStream, max_message_length: usize) -> Connection {
        Connection {
            id,
            stream,
            phase: ConnPhase::AwaitingPassword,
            password_attempts_remaining: PASSWORD_ATTEMPTS,
            nickname: String::new(),
            username: String::new(),
            realname: String::new(),
            inbound: Buffer::with_capacity(max_message_length),
            outbound: Buffer::with_capacity(4096),
            write_interested: false,
            connected_at: Instant::now(),
        }
    }

    /// The `nick!user@localhost` prefix used on relayed user actions, falling
    /// back to the placeholder guest nick before registration completes.
    pub fn prefix(&self) -> String {
        let nick = if self.nickname.is_empty() {
            crate::proto::guest_nick(self.id.0)
        } else {
            self.nickname.clone()
        };
        crate::proto::user_prefix(&nick, &self.username)
    }

    /// Like `prefix`, but for an explicit nick — used when announcing a NICK
    /// change, where the relayed prefix must still carry the pre-change nick.
    pub fn prefix_with(&self, nick: &str) -> String {
        crate::proto::user_prefix(nick, &self.username)
    }

    /// The nick used to address replies to this connection before it has one.
    pub fn display_nick(&self) -> String {
        if self.nickname.is_empty() {
            crate::proto::guest_nick(self.id.0)
        } else {
            self.nickname.clone()
        }
    }

    pub fn is_registered(&self) -> bool {
        self.phase == ConnPhase::Registered
    }

    /// Queues bytes for send and marks the connection as write-interested.
    pub fn enqueue(&mut self, line: &str) {
        self.outbound.extend(line.as_bytes());
        self.outbound.extend(b"\r\n");
        self.write_interested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let id = ConnId(42);
        let token: Token = id.into();
        assert_eq!(ConnId::from(token), id);
    }
}
