pub mod channels;
pub mod messaging;
pub mod misc;
pub mod registration;

use crate::net::broadcaster::send_to;
use crate::net::connection::{ConnId, ConnPhase};
use crate::proto::{Command, Reply};
use crate::state::ServerState;
use ircd_support::logging::{trace, Logger};

/// Routes one parsed command to its handler according to the connection's
/// current registration phase: only PASS/CAP are meaningful before the
/// password is accepted, and everything else waits until then.
pub fn dispatch(state: &mut ServerState, id: ConnId, cmd: Command, log: &Logger) {
    let phase = match state.connections.get(&id) {
        Some(conn) => conn.phase,
        None => return,
    };

    trace!(log, "dispatching command"; "conn" => id.0, "phase" => ?phase, "cmd" => ?cmd);

    match phase {
        ConnPhase::Closing => {}

        ConnPhase::AwaitingPassword => match cmd {
            Command::Pass { password } => registration::handle_pass(state, id, password, log),
            Command::Cap => registration::handle_cap(state, id),
            _ => {}
        },

        ConnPhase::AwaitingRegistration | ConnPhase::Registered => match cmd {
            Command::Pass { .. } => {}
            Command::Nick { nickname } => registration::handle_nick(state, id, nickname, log),
            Command::User { username, mode, realname } => {
                registration::handle_user(state, id, username, mode, realname)
            }
            Command::Cap => registration::handle_cap(state, id),
            Command::Join { channel, key } => channels::handle_join(state, id, channel, key),
            Command::Topic { channel, has_trailing, new_topic } => {
                channels::handle_topic(state, id, channel, has_trailing, new_topic)
            }
            Command::Mode { channel, modestring, arg } => channels::handle_mode(state, id, channel, modestring, arg),
            Command::Kick { channel, nick, reason } => channels::handle_kick(state, id, channel, nick, reason),
            Command::Invite { nick, channel } => channels::handle_invite(state, id, nick, channel),
            Command::Privmsg { target, text } => messaging::handle_privmsg(state, id, target, text),
            Command::Notice { target, text } => messaging::handle_notice(state, id, target, text),
            Command::Ping { token } => misc::handle_ping(state, id, token),
            Command::Whois { nick } => misc::handle_whois(state, id, nick),
            Command::Quit { message } => misc::handle_quit(state, id, message),
            Command::Unknown(raw) => {
                let nick = state.connections[&id].display_nick();
                let line = Reply::ErrUnknownCommand { nick, command: raw }.format(state.server_name());
                send_to(&mut state.connections, id, &line);
            }
        },
    }
}
