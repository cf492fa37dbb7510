use crate::net::broadcaster::send_to;
use crate::net::connection::{ConnId, ConnPhase};
use crate::proto::Reply;
use crate::state::ServerState;

/// `PING <token>`.
pub fn handle_ping(state: &mut ServerState, id: ConnId, token: Option<String>) {
    let token = token.unwrap_or_default();
    let line = Reply::Pong { token }.format(state.server_name());
    send_to(&mut state.connections, id, &line);
}

/// `WHOIS <nick>`.
pub fn handle_whois(state: &mut ServerState, id: ConnId, target_nick: Option<String>) {
    if !state.connections[&id].is_registered() {
        let nick = state.connections[&id].display_nick();
        let line = Reply::ErrNotRegistered { nick }.format(state.server_name());
        return send_to(&mut state.connections, id, &line);
    }
    let nick = state.connections[&id].display_nick();
    let target_nick = match target_nick {
        Some(n) => n,
        None => {
            let line = Reply::ErrNoSuchNick { nick, target: String::new() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    let target_id = match state.registry.lookup(&target_nick) {
        Some(t) => t,
        None => {
            let line = Reply::ErrNoSuchNick { nick, target: target_nick }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    let (target_user, realname) = {
        let target = &state.connections[&target_id];
        (target.username.clone(), target.realname.clone())
    };

    let whois_line = Reply::Whois {
        nick: nick.clone(),
        target_nick: target_nick.clone(),
        target_user,
        realname,
    }
    .format(state.server_name());
    send_to(&mut state.connections, id, &whois_line);

    let eow_line = Reply::EndOfWhois { nick, target_nick }.format(state.server_name());
    send_to(&mut state.connections, id, &eow_line);
}

/// `QUIT [:<message>]`. The departure is not announced to shared channels;
/// the connection simply closes and membership cleanup happens when the
/// reactor tears it down.
pub fn handle_quit(state: &mut ServerState, id: ConnId, message: Option<String>) {
    let _ = message;
    if let Some(conn) = state.connections.get_mut(&id) {
        conn.phase = ConnPhase::Closing;
    }
}
