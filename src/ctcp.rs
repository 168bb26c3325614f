//! Client-To-Client Protocol framing.
//!
//! A CTCP payload rides inside a PRIVMSG or NOTICE body wrapped in `\x01`
//! delimiters: `\x01COMMAND [argument]\x01`.

use crate::message::Message;

const DELIM: char = '\x01';

/// A decoded CTCP request borrowing from the message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// Command word, as sent.
    pub command: &'a str,
    /// Everything after the first space, empty when absent.
    pub argument: &'a str,
}

impl<'a> Ctcp<'a> {
    /// Decode `text` when it is fully wrapped in CTCP delimiters.
    pub fn decode(text: &'a str) -> Option<Ctcp<'a>> {
        let inner = text.strip_prefix(DELIM)?.strip_suffix(DELIM)?;
        let (command, argument) = inner.split_once(' ').unwrap_or((inner, ""));
        Some(Ctcp { command, argument })
    }

    /// The command word compared case-insensitively.
    pub fn is(&self, command: &str) -> bool {
        self.command.eq_ignore_ascii_case(command)
    }
}

/// Wrap `command` and an optional argument in CTCP delimiters.
pub fn encode(command: &str, argument: &str) -> String {
    if argument.is_empty() {
        format!("{DELIM}{command}{DELIM}")
    } else {
        format!("{DELIM}{command} {argument}{DELIM}")
    }
}

/// `PRIVMSG <target> :\x01ACTION <text>\x01`
pub fn action(target: &str, text: &str) -> Message {
    Message::privmsg(target, &encode("ACTION", text))
}

/// A CTCP reply, sent as a NOTICE.
pub fn reply(target: &str, command: &str, argument: &str) -> Message {
    Message::notice(target, &encode(command, argument))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_action() {
        let ctcp = Ctcp::decode("\x01ACTION waves\x01").unwrap();
        assert_eq!(ctcp.command, "ACTION");
        assert_eq!(ctcp.argument, "waves");
        assert!(ctcp.is("action"));
    }

    #[test]
    fn test_decode_without_argument() {
        let ctcp = Ctcp::decode("\x01VERSION\x01").unwrap();
        assert_eq!(ctcp.command, "VERSION");
        assert_eq!(ctcp.argument, "");
    }

    #[test]
    fn test_decode_requires_both_delimiters() {
        assert_eq!(Ctcp::decode("\x01ACTION waves"), None);
        assert_eq!(Ctcp::decode("plain text"), None);
        assert_eq!(Ctcp::decode("\x01"), None);
    }

    #[test]
    fn test_encode_messages() {
        assert_eq!(
            action("#c", "waves").to_string(),
            "PRIVMSG #c :\x01ACTION waves\x01"
        );
        assert_eq!(
            reply("bob", "PING", "123").to_string(),
            "NOTICE bob :\x01PING 123\x01"
        );
        assert_eq!(encode("VERSION", ""), "\x01VERSION\x01");
    }
}
