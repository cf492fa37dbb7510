use crate::config::ServerConfig;
use crate::handlers::dispatch;
use crate::net::buffer::Buffer;
use crate::net::connection::{ConnId, ConnPhase, Connection, OUTBOUND_SOFT_CAP};
use crate::net::framer::Framer;
use crate::proto::{Command, RawMessage};
use crate::state::ServerState;
use ircd_support::logging::{info, warn, Logger};
use ircd_support::NetError;
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const LISTENER_TOKEN: Token = Token(0);
const POLL_TIMEOUT: Duration = Duration::from_millis(100);
const READ_SCRATCH: usize = 1024;

/// The single-threaded, non-blocking reactor: owns the listening socket,
/// drives the readiness loop, and dispatches per-socket events. A single
/// `mio::Poll` instance is enough since this protocol has no handshake phase
/// that would need a separate poll.
pub struct Reactor {
    poll: Poll,
    events: Events,
    listener: TcpListener,
    next_token: usize,
}

impl Reactor {
    // `mio::net::TcpListener::bind` always sets `SO_REUSEADDR` and the socket
    // non-blocking; it doesn't expose a backlog knob, so this accepts
    // whatever backlog the platform defaults to.
    pub fn bind(port: u16) -> io::Result<Reactor> {
        let addr = format!("0.0.0.0:{}", port).parse().expect("valid bind address");
        let mut listener = TcpListener::bind(addr)?;

        let poll = Poll::new()?;
        poll.registry().register(&mut listener, LISTENER_TOKEN, Interest::READABLE)?;

        Ok(Reactor {
            poll,
            events: Events::with_capacity(1024),
            listener,
            next_token: 1,
        })
    }

    /// The address actually bound, useful when `port` 0 was requested (e.g.
    /// in tests) and the OS picked one.
    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the reactor until `shutdown` is observed set. On return every
    /// client socket, and the listening socket, have been closed.
    pub fn run(mut self, config: ServerConfig, shutdown: Arc<AtomicBool>, log: Logger) -> io::Result<()> {
        let mut state = ServerState::new(config);

        info!(log, "reactor started"; "port" => state.config.port);

        while !shutdown.load(Ordering::Relaxed) {
            match self.poll.poll(&mut self.events, Some(POLL_TIMEOUT)) {
                Ok(()) => {}
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }

            let tokens: Vec<(Token, bool, bool)> = self
                .events
                .iter()
                .map(|event| (event.token(), event.is_readable(), event.is_writable()))
                .collect();

            for (token, readable, writable) in tokens {
                if token == LISTENER_TOKEN {
                    self.accept_all(&mut state, &log);
                    continue;
                }

                let id = ConnId::from(token);

                if readable {
                    self.handle_readable(&mut state, id, &log);
                }
                if writable && state.connections.contains_key(&id) {
                    self.handle_writable(&mut state, id, &log);
                }

                self.reconcile_interest(&mut state, id);
                if matches!(state.connections.get(&id).map(|c| c.phase), Some(ConnPhase::Closing)) {
                    self.close_connection(&mut state, id, &log);
                }
            }
        }

        self.shutdown(&mut state, &log);
        Ok(())
    }

    fn accept_all(&mut self, state: &mut ServerState, log: &Logger) {
        loop {
            match self.listener.accept() {
                Ok((mut stream, addr)) => {
                    if state.connections.len() >= state.config.options.max_connections {
                        warn!(log, "connection limit reached, rejecting"; "addr" => %addr);
                        // Dropping `stream` here closes the socket with no reply.
                        continue;
                    }

                    let token = Token(self.next_token);
                    self.next_token += 1;

                    if let Err(e) = self.poll.registry().register(&mut stream, token, Interest::READABLE) {
                        warn!(log, "failed to register accepted socket"; "error" => %e);
                        continue;
                    }

                    let id = ConnId::from(token);
                    let max_message_length = state.config.options.max_message_length;
                    state.connections.insert(id, Connection::new(id, stream, max_message_length));
                    info!(log, "accepted connection"; "conn" => id.0, "addr" => %addr);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    warn!(log, "accept failed"; "error" => %e);
                    break;
                }
            }
        }
    }

    fn handle_readable(&mut self, state: &mut ServerState, id: ConnId, log: &Logger) {
        let mut scratch = [0u8; READ_SCRATCH];

        let ingress_result = {
            let conn = match state.connections.get_mut(&id) {
                Some(c) => c,
                None => return,
            };
            conn.inbound.ingress(&mut conn.stream, &mut scratch)
        };

        match ingress_result {
            Ok(_) => {}
            Err(NetError::Wait) => {}
            Err(NetError::Fatal(_)) => {
                if let Some(conn) = state.connections.get_mut(&id) {
                    conn.phase = ConnPhase::Closing;
                }
                return;
            }
        }

        let max_message_length = state.config.options.max_message_length;
        if state.connections.get(&id).map_or(false, |c| c.inbound.len() > max_message_length) {
            if let Some(conn) = state.connections.get_mut(&id) {
                conn.phase = ConnPhase::Closing;
            }
            return;
        }

        let lines = {
            let conn = state.connections.get_mut(&id).expect("connection exists");
            let mut lines = Vec::new();
            Framer::drain_lines(&mut conn.inbound, |line| lines.push(line));
            lines
        };

        for line in lines {
            if !state.connections.contains_key(&id) {
                break;
            }
            let cmd: Command = RawMessage::parse(&line).into();
            dispatch(state, id, cmd, log);
        }
    }

    fn handle_writable(&mut self, state: &mut ServerState, id: ConnId, log: &Logger) {
        let result = {
            let conn = match state.connections.get_mut(&id) {
                Some(c) => c,
                None => return,
            };
            conn.outbound.egress(&mut conn.stream)
        };

        match result {
            Ok(_) => {}
            Err(NetError::Wait) => {}
            Err(NetError::Fatal(_)) => {
                warn!(log, "write failed, closing"; "conn" => id.0);
                if let Some(conn) = state.connections.get_mut(&id) {
                    conn.phase = ConnPhase::Closing;
                }
            }
        }
    }

    /// Recomputes readiness interest: always readable, writable iff the
    /// outbound buffer is non-empty. Also enforces the outbound soft cap by
    /// transitioning a stalled peer to `Closing`.
    fn reconcile_interest(&mut self, state: &mut ServerState, id: ConnId) {
        let conn = match state.connections.get_mut(&id) {
            Some(c) => c,
            None => return,
        };

        if conn.outbound.len() > OUTBOUND_SOFT_CAP {
            conn.phase = ConnPhase::Closing;
            return;
        }

        let want_writable = !conn.outbound.is_empty();
        if want_writable == conn.write_interested {
            return;
        }
        conn.write_interested = want_writable;

        let interest = if want_writable {
            Interest::READABLE | Interest::WRITABLE
        } else {
            Interest::READABLE
        };
        let _ = self.poll.registry().reregister(&mut conn.stream, Token::from(id), interest);
    }

    fn close_connection(&mut self, state: &mut ServerState, id: ConnId, log: &Logger) {
        let (conn, _left) = state.drop_connection(id);
        if let Some(mut conn) = conn {
            let _ = self.poll.registry().deregister(&mut conn.stream);
            info!(log, "connection closed"; "conn" => id.0);
        }
    }

    fn shutdown(&mut self, state: &mut ServerState, log: &Logger) {
        let ids: Vec<ConnId> = state.connections.keys().copied().collect();
        for id in ids {
            self.close_connection(state, id, log);
        }
        let _ = self.poll.registry().deregister(&mut self.listener);
        info!(log, "reactor stopped");
    }
}
