use crate::net::broadcaster::send_to;
use crate::net::connection::{ConnId, ConnPhase};
use crate::proto::Reply;
use crate::state::ServerState;
use ircd_support::logging::{info, warn, Logger};

fn maybe_complete_registration(state: &mut ServerState, id: ConnId) {
    let ready = {
        let conn = match state.connections.get(&id) {
            Some(c) => c,
            None => return,
        };
        conn.phase == ConnPhase::AwaitingRegistration
            && !conn.nickname.is_empty()
            && !conn.username.is_empty()
    };
    if !ready {
        return;
    }

    let nick = state.connections[&id].nickname.clone();
    if let Some(conn) = state.connections.get_mut(&id) {
        conn.phase = ConnPhase::Registered;
    }
    let line = Reply::Welcome { nick: nick.clone() }.format(state.server_name());
    send_to(&mut state.connections, id, &line);
}

/// `PASS <password>`, only meaningful in `AwaitingPassword`.
pub fn handle_pass(state: &mut ServerState, id: ConnId, password: Option<String>, log: &Logger) {
    let password = password.unwrap_or_default();
    let matches = password == state.config.password;

    if matches {
        if let Some(conn) = state.connections.get_mut(&id) {
            conn.phase = ConnPhase::AwaitingRegistration;
        }
        return;
    }

    let (attempts_left, display_nick) = {
        let conn = state.connections.get_mut(&id).expect("connection exists");
        conn.password_attempts_remaining = conn.password_attempts_remaining.saturating_sub(1);
        (conn.password_attempts_remaining, conn.display_nick())
    };

    if attempts_left == 0 {
        let line = Reply::ErrPasswordExhausted { nick: display_nick.clone() }.format(state.server_name());
        send_to(&mut state.connections, id, &line);
        if let Some(conn) = state.connections.get_mut(&id) {
            conn.phase = ConnPhase::Closing;
        }
        warn!(log, "password exhausted"; "conn" => id.0);
    } else {
        let line = Reply::ErrPasswordMismatch { nick: display_nick, attempts_left }.format(state.server_name());
        send_to(&mut state.connections, id, &line);
    }
}

/// `NICK <nickname>`.
pub fn handle_nick(state: &mut ServerState, id: ConnId, nickname: Option<String>, log: &Logger) {
    let wanted = match nickname {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => {
            let display_nick = state.connections[&id].display_nick();
            let line = Reply::ErrNoNicknameGiven { nick: display_nick }.format(state.server_name());
            send_to(&mut state.connections, id, &line);
            return;
        }
    };

    let taken_by_other = state
        .registry
        .lookup(&wanted)
        .map_or(false, |holder| holder != id);
    if taken_by_other {
        let display_nick = state.connections[&id].display_nick();
        let line = Reply::ErrNicknameInUse { nick: display_nick, wanted }.format(state.server_name());
        send_to(&mut state.connections, id, &line);
        return;
    }

    let (old_nick, was_registered) = {
        let conn = state.connections.get(&id).expect("connection exists");
        (conn.nickname.clone(), conn.phase == ConnPhase::Registered)
    };

    if old_nick.is_empty() {
        state.registry.insert(&wanted, id);
    } else {
        state.registry.rename(&old_nick, &wanted, id);
    }

    if let Some(conn) = state.connections.get_mut(&id) {
        conn.nickname = wanted.clone();
    }

    if was_registered {
        let prefix = state.connections[&id].prefix_with(&old_nick);
        let line = Reply::Nick { prefix, new_nick: wanted.clone() }.format(state.server_name());
        let channels = state.channels.names_containing(id);
        for channel_name in &channels {
            if let Some(channel) = state.channels.get(channel_name) {
                crate::net::broadcaster::broadcast_channel(&mut state.connections, channel, &line, None);
            }
        }
    }

    info!(log, "nick set"; "conn" => id.0, "nick" => wanted.as_str());
    maybe_complete_registration(state, id);
}

/// `USER <username> <mode> <unused> :<realname>`.
pub fn handle_user(
    state: &mut ServerState,
    id: ConnId,
    username: Option<String>,
    mode: Option<String>,
    realname: Option<String>,
) {
    let (username, realname) = match (username, realname) {
        (Some(u), Some(r)) if !u.is_empty() => (u, r),
        _ => {
            let display_nick = state.connections[&id].display_nick();
            let line = Reply::ErrNeedMoreParams { nick: display_nick, command: "USER".to_string() }
                .format(state.server_name());
            send_to(&mut state.connections, id, &line);
            return;
        }
    };
    let _ = mode;

    if let Some(conn) = state.connections.get_mut(&id) {
        conn.username = username;
        conn.realname = realname;
    }

    maybe_complete_registration(state, id);
}

/// `CAP ...`. Clients probe capability negotiation before registering; this
/// server supports none, so it always replies with an empty capability list
/// rather than rejecting the command outright.
pub fn handle_cap(state: &mut ServerState, id: ConnId) {
    let line = format!(":{} CAP * LS :", state.server_name());
    send_to(&mut state.connections, id, &line);
}
