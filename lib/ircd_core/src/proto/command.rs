use crate::proto::message::RawMessage;

/// The exhaustive, tagged union the parser produces, consumed by a total
/// match in the dispatcher instead of string-matching on the command name.
/// Fields are deliberately `Option`s rather than required — arity checking
/// (and the matching numeric reply for a missing argument) is a handler
/// concern, not a parser concern, since the correct numeric differs per
/// command (`431`, `461`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pass {
        password: Option<String>,
    },
    Nick {
        nickname: Option<String>,
    },
    User {
        username: Option<String>,
        mode: Option<String>,
        realname: Option<String>,
    },
    Join {
        channel: Option<String>,
        key: Option<String>,
    },
    Privmsg {
        target: Option<String>,
        text: Option<String>,
    },
    Notice {
        target: Option<String>,
        text: Option<String>,
    },
    Topic {
        channel: Option<String>,
        has_trailing: bool,
        new_topic: Option<String>,
    },
    Mode {
        channel: Option<String>,
        modestring: Option<String>,
        arg: Option<String>,
    },
    Kick {
        channel: Option<String>,
        nick: Option<String>,
        reason: Option<String>,
    },
    Invite {
        nick: Option<String>,
        channel: Option<String>,
    },
    Ping {
        token: Option<String>,
    },
    Whois {
        nick: Option<String>,
    },
    Quit {
        message: Option<String>,
    },
    Cap,
    /// Preserves the raw, unrecognised command token for the `421` reply.
    Unknown(String),
}

fn first(raw: &RawMessage) -> Option<String> {
    raw.params.get(0).cloned().or_else(|| raw.trailing.clone())
}

impl From<RawMessage> for Command {
    fn from(raw: RawMessage) -> Command {
        match raw.command.as_str() {
            "PASS" => Command::Pass { password: first(&raw) },
            "NICK" => Command::Nick { nickname: first(&raw) },
            "USER" => Command::User {
                username: raw.arg(0).map(str::to_string),
                mode: raw.arg(1).map(str::to_string),
                realname: raw.trailing.clone(),
            },
            "JOIN" => Command::Join {
                channel: raw.arg(0).map(str::to_string),
                key: raw.arg(1).map(str::to_string).or_else(|| raw.trailing.clone()),
            },
            "PRIVMSG" => Command::Privmsg {
                target: raw.arg(0).map(str::to_string),
                text: raw.trailing.clone(),
            },
            "NOTICE" => Command::Notice {
                target: raw.arg(0).map(str::to_string),
                text: raw.trailing.clone(),
            },
            "TOPIC" => Command::Topic {
                channel: raw.arg(0).map(str::to_string),
                has_trailing: raw.trailing.is_some(),
                new_topic: raw.trailing.clone(),
            },
            "MODE" => Command::Mode {
                channel: raw.arg(0).map(str::to_string),
                modestring: raw.arg(1).map(str::to_string),
                arg: raw.arg(2).map(str::to_string).or_else(|| raw.trailing.clone()),
            },
            "KICK" => Command::Kick {
                channel: raw.arg(0).map(str::to_string),
                nick: raw.arg(1).map(str::to_string),
                reason: raw.trailing.clone(),
            },
            "INVITE" => Command::Invite {
                nick: raw.arg(0).map(str::to_string),
                channel: raw.arg(1).map(str::to_string),
            },
            "PING" => Command::Ping {
                token: raw.trailing.clone().or_else(|| raw.arg(0).map(str::to_string)),
            },
            "WHOIS" => Command::Whois {
                nick: raw.arg(0).map(str::to_string).or_else(|| raw.trailing.clone()),
            },
            "QUIT" => Command::Quit { message: raw.trailing.clone() },
            "CAP" => Command::Cap,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_takes_key_from_positional_param() {
        let cmd: Command = RawMessage::parse("JOIN #r s3cr3t").into();
        assert_eq!(
            cmd,
            Command::Join {
                channel: Some("#r".into()),
                key: Some("s3cr3t".into()),
            }
        );
    }

    #[test]
    fn topic_distinguishes_query_from_clear() {
        let query: Command = RawMessage::parse("TOPIC #r").into();
        assert_eq!(
            query,
            Command::Topic {
                channel: Some("#r".into()),
                has_trailing: false,
                new_topic: None,
            }
        );

        let clear: Command = RawMessage::parse("TOPIC #r :").into();
        assert_eq!(
            clear,
            Command::Topic {
                channel: Some("#r".into()),
                has_trailing: true,
                new_topic: Some("".into()),
            }
        );
    }

    #[test]
    fn unrecognised_command_is_preserved() {
        let cmd: Command = RawMessage::parse("FROBNICATE arg").into();
        assert_eq!(cmd, Command::Unknown("FROBNICATE".into()));
    }
}
