//! Drives the reactor over real TCP sockets: connect, register, join,
//! chat, and disconnect, the way a real client would.

use ircd_core::config::ServerConfig;
use ircd_core::net::Reactor;
use ircd_support::logging;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn start_server(password: &str) -> SocketAddr {
    let reactor = Reactor::bind(0).expect("bind");
    let addr = reactor.local_addr().expect("local_addr");
    let config = ServerConfig::new(addr.port(), password.to_string());
    let shutdown = Arc::new(AtomicBool::new(false));
    let log = logging::init(false);

    thread::spawn(move || {
        reactor.run(config, shutdown, log).expect("reactor run");
    });

    // Give the background thread a moment to enter its poll loop.
    thread::sleep(Duration::from_millis(50));
    addr
}

fn connect(addr: SocketAddr) -> (TcpStream, BufReader<TcpStream>) {
    let stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let reader = BufReader::new(stream.try_clone().unwrap());
    (stream, reader)
}

fn send(stream: &mut TcpStream, line: &str) {
    stream.write_all(line.as_bytes()).unwrap();
    stream.write_all(b"\r\n").unwrap();
}

fn recv_line(reader: &mut BufReader<TcpStream>) -> String {
    let mut line = String::new();
    reader.read_line(&mut line).expect("read line");
    line.trim_end().to_string()
}

fn register(addr: SocketAddr, password: &str, nick: &str) -> (TcpStream, BufReader<TcpStream>) {
    let (mut stream, mut reader) = connect(addr);
    send(&mut stream, &format!("PASS :{}", password));
    send(&mut stream, &format!("NICK {}", nick));
    send(&mut stream, &format!("USER {} 0 * :{}", nick, nick));
    let welcome = recv_line(&mut reader);
    assert!(welcome.contains("001"), "expected welcome, got {:?}", welcome);
    (stream, reader)
}

#[test]
fn auth_success_reaches_welcome() {
    let addr = start_server("secret");
    let (_stream, _reader) = register(addr, "secret", "alice");
}

#[test]
fn auth_exhaustion_closes_after_three_wrong_passwords() {
    let addr = start_server("secret");
    let (mut stream, mut reader) = connect(addr);

    for attempt in (0..3).rev() {
        send(&mut stream, "PASS :wrong");
        let line = recv_line(&mut reader);
        assert!(line.contains("464"), "expected 464, got {:?}", line);
        assert!(line.contains(&attempt.to_string()) || attempt == 0);
    }

    let mut buf = [0u8; 16];
    use std::io::Read;
    let n = stream.read(&mut buf).unwrap_or(0);
    assert_eq!(n, 0, "connection should be closed after password exhaustion");
}

#[test]
fn join_then_privmsg_is_relayed_without_self_echo() {
    let addr = start_server("secret");
    let (mut a, mut a_reader) = register(addr, "secret", "alice");
    let (mut b, mut b_reader) = register(addr, "secret", "bob");

    send(&mut a, "JOIN #r");
    recv_line(&mut a_reader); // JOIN echo
    recv_line(&mut a_reader); // 353 names
    recv_line(&mut a_reader); // 366 end of names

    send(&mut b, "JOIN #r");
    let join_echo = recv_line(&mut a_reader);
    assert!(join_echo.contains("JOIN #r"));
    recv_line(&mut b_reader);
    recv_line(&mut b_reader);
    recv_line(&mut b_reader);

    send(&mut b, "PRIVMSG #r :hi");
    let relayed = recv_line(&mut a_reader);
    assert!(relayed.contains("PRIVMSG #r :hi"), "got {:?}", relayed);

    b.set_read_timeout(Some(Duration::from_millis(200))).unwrap();
    let mut buf = [0u8; 64];
    use std::io::Read;
    let result = b_reader.get_mut().read(&mut buf);
    assert!(result.is_err() || result.unwrap() == 0, "bob should not see his own privmsg echoed");
}

#[test]
fn invite_only_channel_gates_join_until_invited() {
    let addr = start_server("secret");
    let (mut a, mut a_reader) = register(addr, "secret", "carol");
    let (mut b, mut b_reader) = register(addr, "secret", "dave");

    send(&mut a, "JOIN #priv");
    recv_line(&mut a_reader);
    recv_line(&mut a_reader);
    recv_line(&mut a_reader);

    send(&mut a, "MODE #priv +i");
    recv_line(&mut a_reader);

    send(&mut b, "JOIN #priv");
    let denied = recv_line(&mut b_reader);
    assert!(denied.contains("473"), "got {:?}", denied);

    send(&mut a, "INVITE dave #priv");
    recv_line(&mut a_reader); // 341 confirmation
    let invite_notice = recv_line(&mut b_reader);
    assert!(invite_notice.contains("INVITE"), "got {:?}", invite_notice);

    send(&mut b, "JOIN #priv");
    let join_echo = recv_line(&mut b_reader);
    assert!(join_echo.contains("JOIN #priv"), "got {:?}", join_echo);
}

#[test]
fn kick_removes_member_and_notifies_both_parties() {
    let addr = start_server("secret");
    let (mut a, mut a_reader) = register(addr, "secret", "erin");
    let (mut b, mut b_reader) = register(addr, "secret", "frank");

    send(&mut a, "JOIN #r");
    recv_line(&mut a_reader);
    recv_line(&mut a_reader);
    recv_line(&mut a_reader);

    send(&mut b, "JOIN #r");
    recv_line(&mut a_reader);
    recv_line(&mut b_reader);
    recv_line(&mut b_reader);
    recv_line(&mut b_reader);

    send(&mut a, "KICK #r frank :bye");
    let a_kick = recv_line(&mut a_reader);
    let b_kick = recv_line(&mut b_reader);
    assert!(a_kick.contains("KICK #r frank :bye"));
    assert!(b_kick.contains("KICK #r frank :bye"));
}

#[test]
fn channel_key_gates_join_until_correct_key_supplied() {
    let addr = start_server("secret");
    let (mut a, mut a_reader) = register(addr, "secret", "gina");
    send(&mut a, "JOIN #r");
    recv_line(&mut a_reader);
    recv_line(&mut a_reader);
    recv_line(&mut a_reader);

    send(&mut a, "MODE #r +k hunter2");
    recv_line(&mut a_reader);

    let (mut c, mut c_reader) = register(addr, "secret", "hank");
    send(&mut c, "JOIN #r wrong");
    let denied = recv_line(&mut c_reader);
    assert!(denied.contains("475"), "got {:?}", denied);

    send(&mut c, "JOIN #r hunter2");
    let accepted = recv_line(&mut c_reader);
    assert!(accepted.contains("JOIN #r"), "got {:?}", accepted);
}
