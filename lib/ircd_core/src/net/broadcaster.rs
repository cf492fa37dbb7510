use crate::net::connection::{ConnId, Connection};
use crate::state::channel::Channel;
use hashbrown::HashMap;

/// Fan-out helper. Every function here only appends to outbound buffers and
/// flips write-interest — never performs a socket write — so all actual I/O
/// stays confined to the reactor's writability phase.
pub fn send_to(connections: &mut HashMap<ConnId, Connection>, id: ConnId, line: &str) {
    if let Some(conn) = connections.get_mut(&id) {
        conn.enqueue(line);
    }
}

/// Sends `line` to every member of `channel`, optionally skipping one.
pub fn broadcast_channel(
    connections: &mut HashMap<ConnId, Connection>,
    channel: &Channel,
    line: &str,
    exclude: Option<ConnId>,
) {
    for &member in channel.members.keys() {
        if Some(member) == exclude {
            continue;
        }
        send_to(connections, member, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mio::net::TcpListener;
    use std::net::TcpStream as StdTcpStream;

    fn fresh_connection(id: usize) -> Connection {
        let listener = TcpListener::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = StdTcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        Connection::new(ConnId(id), mio::net::TcpStream::from_std(std_stream), 4096)
    }

    #[test]
    fn send_to_marks_write_interest() {
        let mut connections = HashMap::new();
        connections.insert(ConnId(1), fresh_connection(1));
        send_to(&mut connections, ConnId(1), "hello");
        assert!(connections.get(&ConnId(1)).unwrap().write_interested);
    }

    #[test]
    fn broadcast_skips_excluded_member() {
        let mut connections = HashMap::new();
        connections.insert(ConnId(1), fresh_connection(1));
        connections.insert(ConnId(2), fresh_connection(2));

        let mut channel = Channel::new("#r".into());
        channel.add_member(ConnId(1), true);
        channel.add_member(ConnId(2), false);

        broadcast_channel(&mut connections, &channel, "hi", Some(ConnId(1)));

        assert!(!connections.get(&ConnId(1)).unwrap().write_interested);
        assert!(connections.get(&ConnId(2)).unwrap().write_interested);
    }
}
