use crate::net::broadcaster::{broadcast_channel, send_to};
use crate::net::connection::ConnId;
use crate::proto::Reply;
use crate::state::ServerState;

fn not_registered(state: &mut ServerState, id: ConnId) {
    let nick = state.connections[&id].display_nick();
    let line = Reply::ErrNotRegistered { nick }.format(state.server_name());
    send_to(&mut state.connections, id, &line);
}

fn require_channel_name(channel: &Option<String>) -> Option<&str> {
    channel.as_deref().filter(|c| c.starts_with('#'))
}

/// `JOIN #chan [key]`. Gates are checked in order — invite-only, then key,
/// then user limit — so the first applicable reason wins when more than one
/// would otherwise deny the join.
pub fn handle_join(state: &mut ServerState, id: ConnId, channel: Option<String>, key: Option<String>) {
    if !state.connections[&id].is_registered() {
        return not_registered(state, id);
    }
    let nick = state.connections[&id].display_nick();

    let channel_name = match require_channel_name(&channel) {
        Some(name) => name.to_string(),
        None => {
            let raw = channel.unwrap_or_default();
            let line = Reply::ErrNoSuchChannel { nick, channel: raw }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    if let Some(existing) = state.channels.get(&channel_name) {
        if existing.is_member(id) {
            return;
        }
    }

    {
        let (chan, created) = state.channels.get_or_create(&channel_name);

        if !created {
            if chan.modes.invite_only && !chan.is_operator(id) && !chan.invited.contains(&id) {
                let line = Reply::ErrInviteOnlyChan { nick, channel: channel_name }.format(state.server_name());
                return send_to(&mut state.connections, id, &line);
            }
            if let Some(required) = chan.modes.key.as_ref() {
                if key.as_deref() != Some(required.as_str()) {
                    let line = Reply::ErrBadChannelKey { nick, channel: channel_name }.format(state.server_name());
                    return send_to(&mut state.connections, id, &line);
                }
            }
            if let Some(limit) = chan.modes.user_limit {
                if limit > 0 && chan.members.len() >= limit {
                    let line = Reply::ErrChannelIsFull { nick, channel: channel_name }.format(state.server_name());
                    return send_to(&mut state.connections, id, &line);
                }
            }
        }

        chan.add_member(id, created);
    }

    let prefix = state.connections[&id].prefix();
    let join_line = Reply::Join { prefix, channel: channel_name.clone() }.format(state.server_name());
    if let Some(chan) = state.channels.get(&channel_name) {
        broadcast_channel(&mut state.connections, chan, &join_line, None);
    }

    let (members, topic) = {
        let chan = state.channels.get(&channel_name).expect("just joined");
        let names: Vec<String> = chan
            .members
            .keys()
            .map(|m| state.connections.get(m).map(|c| c.display_nick()).unwrap_or_default())
            .collect();
        (names, chan.topic.clone())
    };

    let names_line = Reply::Names { nick: nick.clone(), channel: channel_name.clone(), members }.format(state.server_name());
    send_to(&mut state.connections, id, &names_line);
    let eon_line = Reply::EndOfNames { nick: nick.clone(), channel: channel_name.clone() }.format(state.server_name());
    send_to(&mut state.connections, id, &eon_line);
    let _ = topic;
}

/// `TOPIC #chan [:<newtopic>]`.
pub fn handle_topic(
    state: &mut ServerState,
    id: ConnId,
    channel: Option<String>,
    has_trailing: bool,
    new_topic: Option<String>,
) {
    if !state.connections[&id].is_registered() {
        return not_registered(state, id);
    }
    let nick = state.connections[&id].display_nick();
    let channel_name = match channel {
        Some(c) => c,
        None => {
            let line = Reply::ErrNeedMoreParams { nick, command: "TOPIC".to_string() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    let is_member = state.channels.get(&channel_name).map_or(false, |c| c.is_member(id));
    if !is_member {
        let line = Reply::ErrNotOnChannel { nick, channel: channel_name }.format(state.server_name());
        return send_to(&mut state.connections, id, &line);
    }

    if !has_trailing {
        let topic = state.channels.get(&channel_name).map(|c| c.topic.clone()).unwrap_or_default();
        let line = if topic.is_empty() {
            Reply::NoTopic { nick, channel: channel_name }.format(state.server_name())
        } else {
            Reply::TopicIs { nick, channel: channel_name, topic }.format(state.server_name())
        };
        return send_to(&mut state.connections, id, &line);
    }

    let restricted = state.channels.get(&channel_name).map_or(false, |c| c.modes.topic_restricted);
    let is_op = state.channels.get(&channel_name).map_or(false, |c| c.is_operator(id));
    if restricted && !is_op {
        let line = Reply::ErrChanOpPrivsNeeded { nick, channel: channel_name }.format(state.server_name());
        return send_to(&mut state.connections, id, &line);
    }

    let topic = new_topic.unwrap_or_default();
    if let Some(chan) = state.channels.get_mut(&channel_name) {
        chan.topic = topic.clone();
    }

    let prefix = state.connections[&id].prefix();
    let line = Reply::TopicChanged { prefix, channel: channel_name.clone(), topic }.format(state.server_name());
    if let Some(chan) = state.channels.get(&channel_name) {
        broadcast_channel(&mut state.connections, chan, &line, None);
    }
}

/// `MODE #chan <modestring> [arg]`.
pub fn handle_mode(state: &mut ServerState, id: ConnId, channel: Option<String>, modestring: Option<String>, arg: Option<String>) {
    if !state.connections[&id].is_registered() {
        return not_registered(state, id);
    }
    let nick = state.connections[&id].display_nick();
    let channel_name = match channel {
        Some(c) => c,
        None => {
            let line = Reply::ErrNeedMoreParams { nick, command: "MODE".to_string() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    let is_op = state.channels.get(&channel_name).map_or(false, |c| c.is_operator(id));
    if !is_op {
        let line = Reply::ErrChanOpPrivsNeeded { nick, channel: channel_name }.format(state.server_name());
        return send_to(&mut state.connections, id, &line);
    }

    let modestring = modestring.unwrap_or_default();
    let mut chars = modestring.chars();
    let sign = match chars.next() {
        Some('+') => true,
        Some('-') => false,
        _ => return,
    };
    let letter = match chars.next() {
        Some(c) => c,
        None => return,
    };

    let mut effective_arg: Option<String> = None;

    match letter {
        'i' => {
            if let Some(chan) = state.channels.get_mut(&channel_name) {
                chan.modes.invite_only = sign;
            }
        }
        't' => {
            if let Some(chan) = state.channels.get_mut(&channel_name) {
                chan.modes.topic_restricted = sign;
            }
        }
        'k' => {
            if sign && arg.is_none() {
                let line = Reply::ErrNeedMoreParams { nick, command: "MODE".to_string() }.format(state.server_name());
                return send_to(&mut state.connections, id, &line);
            }
            if let Some(chan) = state.channels.get_mut(&channel_name) {
                chan.modes.key = if sign { arg.clone() } else { None };
            }
            effective_arg = if sign { arg.clone() } else { None };
        }
        'l' => {
            if sign {
                let limit: usize = match arg.as_deref().and_then(|a| a.parse().ok()) {
                    Some(n) => n,
                    None => {
                        let line = Reply::ErrNeedMoreParams { nick, command: "MODE".to_string() }.format(state.server_name());
                        return send_to(&mut state.connections, id, &line);
                    }
                };
                if let Some(chan) = state.channels.get_mut(&channel_name) {
                    chan.modes.user_limit = Some(limit);
                }
                effective_arg = Some(limit.to_string());
            } else if let Some(chan) = state.channels.get_mut(&channel_name) {
                chan.modes.user_limit = None;
            }
        }
        'o' => {
            let target_nick = match arg.as_deref() {
                Some(n) => n.to_string(),
                None => {
                    let line = Reply::ErrNeedMoreParams { nick, command: "MODE".to_string() }.format(state.server_name());
                    return send_to(&mut state.connections, id, &line);
                }
            };
            let target_id = state.registry.lookup(&target_nick);
            let is_target_member = target_id
                .map(|t| state.channels.get(&channel_name).map_or(false, |c| c.is_member(t)))
                .unwrap_or(false);
            if !is_target_member {
                let line = Reply::ErrNotOnChannel { nick, channel: channel_name }.format(state.server_name());
                return send_to(&mut state.connections, id, &line);
            }
            if let (Some(chan), Some(t)) = (state.channels.get_mut(&channel_name), target_id) {
                chan.set_operator(t, sign);
            }
            effective_arg = Some(target_nick);
        }
        other => {
            let line = Reply::ErrUnknownMode { nick, letter: other }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    }

    let prefix = state.connections[&id].prefix();
    let modestring = format!("{}{}", if sign { '+' } else { '-' }, letter);
    let line = Reply::Mode { prefix, channel: channel_name.clone(), modestring, arg: effective_arg }.format(state.server_name());
    if let Some(chan) = state.channels.get(&channel_name) {
        broadcast_channel(&mut state.connections, chan, &line, None);
    }
}

/// `KICK #chan <nick> [:<reason>]`.
pub fn handle_kick(state: &mut ServerState, id: ConnId, channel: Option<String>, target_nick: Option<String>, reason: Option<String>) {
    if !state.connections[&id].is_registered() {
        return not_registered(state, id);
    }
    let nick = state.connections[&id].display_nick();
    let channel_name = match channel {
        Some(c) => c,
        None => {
            let line = Reply::ErrNeedMoreParams { nick, command: "KICK".to_string() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };
    let target_nick = match target_nick {
        Some(n) => n,
        None => {
            let line = Reply::ErrNeedMoreParams { nick, command: "KICK".to_string() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    let is_op = state.channels.get(&channel_name).map_or(false, |c| c.is_operator(id));
    if !is_op {
        let line = Reply::ErrChanOpPrivsNeeded { nick, channel: channel_name }.format(state.server_name());
        return send_to(&mut state.connections, id, &line);
    }

    let target_id = match state.registry.lookup(&target_nick) {
        Some(t) => t,
        None => {
            let line = Reply::ErrNoSuchNick { nick, target: target_nick }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    let is_target_member = state.channels.get(&channel_name).map_or(false, |c| c.is_member(target_id));
    if !is_target_member {
        let line = Reply::ErrNotOnChannel { nick, channel: channel_name }.format(state.server_name());
        return send_to(&mut state.connections, id, &line);
    }

    let prefix = state.connections[&id].prefix();
    let reason = reason.unwrap_or_else(|| "Kicked by operator".to_string());
    let line = Reply::Kick { prefix, channel: channel_name.clone(), nick: target_nick, reason }.format(state.server_name());

    if let Some(chan) = state.channels.get(&channel_name) {
        broadcast_channel(&mut state.connections, chan, &line, Some(target_id));
    }
    send_to(&mut state.connections, target_id, &line);

    if let Some(chan) = state.channels.get_mut(&channel_name) {
        chan.remove_member(target_id);
    }
    state.channels.gc_if_empty(&channel_name);
}

/// `INVITE <nick> #chan`.
pub fn handle_invite(state: &mut ServerState, id: ConnId, target_nick: Option<String>, channel: Option<String>) {
    if !state.connections[&id].is_registered() {
        return not_registered(state, id);
    }
    let nick = state.connections[&id].display_nick();
    let channel_name = match channel {
        Some(c) => c,
        None => {
            let line = Reply::ErrNeedMoreParams { nick, command: "INVITE".to_string() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };
    let target_nick = match target_nick {
        Some(n) => n,
        None => {
            let line = Reply::ErrNeedMoreParams { nick, command: "INVITE".to_string() }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    let is_op = state.channels.get(&channel_name).map_or(false, |c| c.is_operator(id));
    if !is_op {
        let line = Reply::ErrChanOpPrivsNeeded { nick, channel: channel_name }.format(state.server_name());
        return send_to(&mut state.connections, id, &line);
    }

    let target_id = match state.registry.lookup(&target_nick) {
        Some(t) => t,
        None => {
            let line = Reply::ErrNoSuchNick { nick, target: target_nick }.format(state.server_name());
            return send_to(&mut state.connections, id, &line);
        }
    };

    if let Some(chan) = state.channels.get_mut(&channel_name) {
        chan.invited.insert(target_id);
    }

    let prefix = state.connections[&id].prefix();
    let invite_line = Reply::InviteNotice { prefix, target: target_nick.clone(), channel: channel_name.clone() }.format(state.server_name());
    send_to(&mut state.connections, target_id, &invite_line);

    let confirm_line = Reply::InviteConfirm { nick, target: target_nick, channel: channel_name }.format(state.server_name());
    send_to(&mut state.connections, id, &confirm_line);
}
