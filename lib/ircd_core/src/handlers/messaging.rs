use crate::net::broadcaster::{broadcast_channel, send_to};
use crate::net::connection::ConnId;
use crate::proto::Reply;
use crate::state::ServerState;

fn not_registered(state: &mut ServerState, id: ConnId) {
    let nick = state.connections[&id].display_nick();
    let line = Reply::ErrNotRegistered { nick }.format(state.server_name());
    send_to(&mut state.connections, id, &line);
}

fn route(state: &mut ServerState, id: ConnId, target: Option<String>, text: Option<String>, to_reply: fn(String, String, String) -> Reply) {
    if !state.connections[&id].is_registered() {
        return not_registered(state, id);
    }
    let nick = state.connections[&id].display_nick();
    let target = match target {
        Some(t) => t,
        None => {
            let line = Reply::ErrNoSuchNick { nick, target: String::new() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };
    let text = text.unwrap_or_default();
    let prefix = state.connections[&id].prefix();

    if let Some(stripped) = target.strip_prefix('#') {
        let channel_name = format!("#{}", stripped);
        let is_member = state.channels.get(&channel_name).map_or(false, |c| c.is_member(id));
        if !is_member {
            let line = Reply::ErrCannotSendToChan { nick, channel: channel_name }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
        let line = to_reply(prefix, channel_name.clone(), text).format(state.server_name());
        if let Some(chan) = state.channels.get(&channel_name) {
            broadcast_channel(&mut state.connections, chan, &line, Some(id));
        }
        return;
    }

    let target_id = match state.registry.lookup(&target) {
        Some(t) => t,
        None => {
            let line = Reply::ErrNoSuchNick { nick, target }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };
    let line = to_reply(prefix, target, text).format(state.server_name());
    send_to(&mut state.connections, target_id, &line);
}

/// `PRIVMSG <target> :<text>`.
pub fn handle_privmsg(state: &mut ServerState, id: ConnId, target: Option<String>, text: Option<String>) {
    route(state, id, target, text, |prefix, target, text| Reply::Privmsg { prefix, target, text });
}

/// `NOTICE <target> :<text>`; same routing as PRIVMSG but never elicits an
/// error reply back to the sender, per IRC convention (`original_source`
/// never implements NOTICE at all — this command is a supplemental addition,
/// so it inherits PRIVMSG's routing and is silently dropped on any failure).
pub fn handle_notice(state: &mut ServerState, id: ConnId, target: Option<String>, text: Option<String>) {
    if !state.connections[&id].is_registered() {
        return;
    }
    let target = match target {
        Some(t) => t,
        None => return,
    };
    let text = text.unwrap_or_default();
    let prefix = state.connections[&id].prefix();

    if let Some(stripped) = target.strip_prefix('#') {
        let channel_name = format!("#{}", stripped);
        let is_member = state.channels.get(&channel_name).map_or(false, |c| c.is_member(id));
        if !is_member {
            return;
        }
        let line = Reply::Notice { prefix, target: channel_name.clone(), text }.format(state.server_name());
        if let Some(chan) = state.channels.get(&channel_name) {
            broadcast_channel(&mut state.connections, chan, &line, Some(id));
        }
        return;
    }

    if let Some(target_id) = state.registry.lookup(&target) {
        let line = Reply::Notice { prefix, target, text }.format(state.server_name());
        send_to(&mut state.connections, target_id, &line);
    }
}
