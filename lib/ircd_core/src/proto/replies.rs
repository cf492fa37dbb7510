//! Numeric and relayed-message formatting.
//!
//! Shaped after the sibling IRC example's `replies::IrcReply` enum-plus-`format`
//! approach (enrichment grounded on `manuelpont94-irc`'s `replies.rs`): every
//! wire reply is a variant here rather than `format!` calls scattered across
//! handler code.

/// A server-originated reply, either a numeric or a relayed user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Welcome { nick: String },
    Pong { token: String },
    Join { prefix: String, channel: String },
    Names { nick: String, channel: String, members: Vec<String> },
    EndOfNames { nick: String, channel: String },
    NoTopic { nick: String, channel: String },
    TopicIs { nick: String, channel: String, topic: String },
    TopicChanged { prefix: String, channel: String, topic: String },
    InviteConfirm { nick: String, target: String, channel: String },
    InviteNotice { prefix: String, target: String, channel: String },
    Mode { prefix: String, channel: String, modestring: String, arg: Option<String> },
    Kick { prefix: String, channel: String, nick: String, reason: String },
    Privmsg { prefix: String, target: String, text: String },
    Notice { prefix: String, target: String, text: String },
    Nick { prefix: String, new_nick: String },
    Whois { nick: String, target_nick: String, target_user: String, realname: String },
    EndOfWhois { nick: String, target_nick: String },

    ErrNoSuchNick { nick: String, target: String },
    ErrNoSuchChannel { nick: String, channel: String },
    ErrCannotSendToChan { nick: String, channel: String },
    ErrUnknownCommand { nick: String, command: String },
    ErrNoNicknameGiven { nick: String },
    ErrNicknameInUse { nick: String, wanted: String },
    ErrNotOnChannel { nick: String, channel: String },
    ErrNotRegistered { nick: String },
    ErrNeedMoreParams { nick: String, command: String },
    ErrPasswordMismatch { nick: String, attempts_left: u8 },
    ErrPasswordExhausted { nick: String },
    ErrChannelIsFull { nick: String, channel: String },
    ErrInviteOnlyChan { nick: String, channel: String },
    ErrBadChannelKey { nick: String, channel: String },
    ErrUnknownMode { nick: String, letter: char },
    ErrChanOpPrivsNeeded { nick: String, channel: String },
}

/// Placeholder nick used before registration completes, matching the
/// `"guest" + fd` convention in `examples/original_source` (`CommandHandler::handlePassword`).
pub fn guest_nick(conn_id: usize) -> String {
    format!("guest{}", conn_id)
}

impl Reply {
    pub fn format(&self, server_name: &str) -> String {
        match self {
            Reply::Welcome { nick } => format!(
                ":{server} 001 {nick} :Welcome to {server}, {nick}",
                server = server_name,
                nick = nick
            ),
            Reply::Pong { token } => format!(":{} PONG {} :{}", server_name, server_name, token),
            Reply::Join { prefix, channel } => format!(":{} JOIN {}", prefix, channel),
            Reply::Names { nick, channel, members } => format!(
                ":{server} 353 {nick} = {channel} :{names}",
                server = server_name,
                nick = nick,
                channel = channel,
                names = members.join(" ")
            ),
            Reply::EndOfNames { nick, channel } => format!(
                ":{server} 366 {nick} {channel} :End of /NAMES list",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::NoTopic { nick, channel } => format!(
                ":{server} 331 {nick} {channel} :No topic is set",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::TopicIs { nick, channel, topic } => format!(
                ":{server} 332 {nick} {channel} :{topic}",
                server = server_name,
                nick = nick,
                channel = channel,
                topic = topic
            ),
            Reply::TopicChanged { prefix, channel, topic } => {
                format!(":{} TOPIC {} :{}", prefix, channel, topic)
            }
            Reply::InviteConfirm { nick, target, channel } => format!(
                ":{server} 341 {nick} {target} {channel}",
                server = server_name,
                nick = nick,
                target = target,
                channel = channel
            ),
            Reply::InviteNotice { prefix, target, channel } => {
                format!(":{} INVITE {} :{}", prefix, target, channel)
            }
            Reply::Mode { prefix, channel, modestring, arg } => match arg {
                Some(arg) => format!(":{} MODE {} {} {}", prefix, channel, modestring, arg),
                None => format!(":{} MODE {} {}", prefix, channel, modestring),
            },
            Reply::Kick { prefix, channel, nick, reason } => {
                format!(":{} KICK {} {} :{}", prefix, channel, nick, reason)
            }
            Reply::Privmsg { prefix, target, text } => format!(":{} PRIVMSG {} :{}", prefix, target, text),
            Reply::Notice { prefix, target, text } => format!(":{} NOTICE {} :{}", prefix, target, text),
            Reply::Nick { prefix, new_nick } => format!(":{} NICK :{}", prefix, new_nick),
            Reply::Whois { nick, target_nick, target_user, realname } => format!(
                ":{server} 311 {nick} {target_nick} {target_user} localhost * :{realname}",
                server = server_name,
                nick = nick,
                target_nick = target_nick,
                target_user = target_user,
                realname = realname
            ),
            Reply::EndOfWhois { nick, target_nick } => format!(
                ":{server} 318 {nick} {target_nick} :End of /WHOIS list",
                server = server_name,
                nick = nick,
                target_nick = target_nick
            ),

            Reply::ErrNoSuchNick { nick, target } => format!(
                ":{server} 401 {nick} {target} :No such nick/channel",
                server = server_name,
                nick = nick,
                target = target
            ),
            Reply::ErrNoSuchChannel { nick, channel } => format!(
                ":{server} 403 {nick} {channel} :No such channel",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::ErrCannotSendToChan { nick, channel } => format!(
                ":{server} 404 {nick} {channel} :Cannot send to channel",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::ErrUnknownCommand { nick, command } => format!(
                ":{server} 421 {nick} {command} :Unknown command",
                server = server_name,
                nick = nick,
                command = command
            ),
            Reply::ErrNoNicknameGiven { nick } => format!(
                ":{server} 431 {nick} :No nickname given",
                server = server_name,
                nick = nick
            ),
            Reply::ErrNicknameInUse { nick, wanted } => format!(
                ":{server} 433 {nick} {wanted} :Nickname is already in use",
                server = server_name,
                nick = nick,
                wanted = wanted
            ),
            Reply::ErrNotOnChannel { nick, channel } => format!(
                ":{server} 441 {nick} {channel} :You're not on that channel",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::ErrNotRegistered { nick } => format!(
                ":{server} 451 {nick} :You have not registered",
                server = server_name,
                nick = nick
            ),
            Reply::ErrNeedMoreParams { nick, command } => format!(
                ":{server} 461 {nick} {command} :Not enough parameters",
                server = server_name,
                nick = nick,
                command = command
            ),
            Reply::ErrPasswordMismatch { nick, attempts_left } => format!(
                ":{server} 464 {nick} :Password incorrect, {attempts_left} attempt(s) remaining",
                server = server_name,
                nick = nick,
                attempts_left = attempts_left
            ),
            Reply::ErrPasswordExhausted { nick } => format!(
                ":{server} 464 {nick} :Password incorrect, closing connection",
                server = server_name,
                nick = nick
            ),
            Reply::ErrChannelIsFull { nick, channel } => format!(
                ":{server} 471 {nick} {channel} :Cannot join channel (+l)",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::ErrInviteOnlyChan { nick, channel } => format!(
                ":{server} 473 {nick} {channel} :Cannot join channel (+i)",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::ErrBadChannelKey { nick, channel } => format!(
                ":{server} 475 {nick} {channel} :Cannot join channel (+k)",
                server = server_name,
                nick = nick,
                channel = channel
            ),
            Reply::ErrUnknownMode { nick, letter } => format!(
                ":{server} 472 {nick} {letter} :is unknown mode char to me",
                server = server_name,
                nick = nick,
                letter = letter
            ),
            Reply::ErrChanOpPrivsNeeded { nick, channel } => format!(
                ":{server} 482 {nick} {channel} :You're not channel operator",
                server = server_name,
                nick = nick,
                channel = channel
            ),
        }
    }
}

/// Builds the `nick!user@host` source prefix used on relayed user actions.
pub fn user_prefix(nick: &str, user: &str) -> String {
    format!("{}!{}@localhost", nick, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_mentions_nick() {
        let reply = Reply::Welcome { nick: "alice".into() };
        assert_eq!(reply.format("ircd"), ":ircd 001 alice :Welcome to ircd, alice");
    }

    #[test]
    fn user_prefix_format() {
        assert_eq!(user_prefix("bob", "b"), "bob!b@localhost");
    }

    #[test]
    fn mode_without_arg_omits_trailing_space() {
        let reply = Reply::Mode {
            prefix: "a!a@localhost".into(),
            channel: "#r".into(),
            modestring: "+i".into(),
            arg: None,
        };
        assert_eq!(reply.format("ircd"), ":a!a@localhost MODE #r +i");
    }
}
