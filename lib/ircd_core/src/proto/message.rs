/// A tokenised but not yet interpreted client line: `COMMAND params... [:trailing]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

impl RawMessage {
    /// Parses one already-framed line (terminator already stripped) into a
    /// `RawMessage`. The command token is upper-cased for matching; parameters
    /// are individually trimmed; the trailing parameter — introduced by the
    /// first `" :"` — preserves internal spaces verbatim.
    pub fn parse(line: &str) -> RawMessage {
        let (head, trailing) = match line.find(" :") {
            Some(idx) => (&line[..idx], Some(line[idx + 2..].to_string())),
            None => (line, None),
        };

        let mut tokens = head.split_whitespace();
        let command = tokens.next().unwrap_or("").to_ascii_uppercase();
        let params = tokens.map(|tok| tok.trim().to_string()).collect();

        RawMessage {
            command,
            params,
            trailing,
        }
    }

    /// Returns the parameter at `idx`, falling back to the trailing parameter
    /// when it is the next logical argument (the common IRC idiom of the last
    /// parameter being either a bare word or a `:`-prefixed trailing string).
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_and_trailing() {
        let msg = RawMessage::parse("privmsg #chan :hello there");
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#chan".to_string()]);
        assert_eq!(msg.trailing.as_deref(), Some("hello there"));
    }

    #[test]
    fn parses_command_with_no_params() {
        let msg = RawMessage::parse("CAP LS");
        assert_eq!(msg.command, "CAP");
        assert_eq!(msg.params, vec!["LS".to_string()]);
        assert_eq!(msg.trailing, None);
    }

    #[test]
    fn trailing_preserves_internal_spaces() {
        let msg = RawMessage::parse("TOPIC #chan :  lots   of   spaces  ");
        assert_eq!(msg.trailing.as_deref(), Some("  lots   of   spaces  "));
    }

    #[test]
    fn empty_line_yields_empty_command() {
        let msg = RawMessage::parse("");
        assert_eq!(msg.command, "");
        assert!(msg.params.is_empty());
    }
}
