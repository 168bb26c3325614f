//! IRC message type: one structured value per wire line.

mod parser;
mod serialize;

use std::str::FromStr;

use crate::error::MessageParseError;
use crate::prefix::Prefix;

use self::parser::ParsedLine;

/// A parsed IRC line.
///
/// `params` holds the middle parameters followed by the trailing parameter,
/// if one was present, as its final element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Raw prefix, e.g. `nick!user@host` or a server hostname.
    pub source: Option<String>,
    /// Command word or three digit numeric.
    pub command: String,
    /// Middle parameters, then the trailing parameter.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message without a source.
    pub fn new<C, I, P>(command: C, params: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Message {
            source: None,
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse one wire line.
    ///
    /// An IRCv3 tag block is discarded when a `:prefix` follows it; on its
    /// own, the `@` token is taken as the source.
    pub fn parse(line: &str) -> Result<Message, MessageParseError> {
        let parsed = ParsedLine::parse(line)?;
        let source = parsed.prefix.or(parsed.tags).filter(|s| !s.is_empty());

        Ok(Message {
            source: source.map(str::to_owned),
            command: parsed.command.to_owned(),
            params: parsed.params.into_iter().map(str::to_owned).collect(),
        })
    }

    /// Attach a source to this message.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The parsed source, if any.
    pub fn prefix(&self) -> Option<Prefix> {
        self.source.as_deref().map(Prefix::parse)
    }

    /// Nickname part of the source (or the server name), empty when absent.
    pub fn source_nick(&self) -> &str {
        self.source.as_deref().map(Prefix::nick_of).unwrap_or("")
    }

    /// The numeric code when the command is a three digit reply.
    pub fn numeric(&self) -> Option<u16> {
        if self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit()) {
            self.command.parse().ok()
        } else {
            None
        }
    }

    /// Command name compared case-insensitively.
    pub fn is_command(&self, command: &str) -> bool {
        self.command.eq_ignore_ascii_case(command)
    }

    /// The `PONG` answering this message, when it is a server `PING`.
    pub fn pong_reply(&self) -> Option<Message> {
        if !self.is_command("PING") {
            return None;
        }
        Some(Message::pong(self.param(0).unwrap_or("")))
    }

    // Outbound constructors.

    pub fn pass(password: &str) -> Self {
        Message::new("PASS", [password])
    }

    pub fn nick(nick: &str) -> Self {
        Message::new("NICK", [nick])
    }

    /// `USER <username> 0 * :<realname>`
    pub fn user(username: &str, realname: &str) -> Self {
        Message::new("USER", [username, "0", "*", realname])
    }

    pub fn join(channel: &str, key: Option<&str>) -> Self {
        match key.filter(|k| !k.is_empty()) {
            Some(key) => Message::new("JOIN", [channel, key]),
            None => Message::new("JOIN", [channel]),
        }
    }

    pub fn part(channel: &str, reason: Option<&str>) -> Self {
        match reason.filter(|r| !r.is_empty()) {
            Some(reason) => Message::new("PART", [channel, reason]),
            None => Message::new("PART", [channel]),
        }
    }

    pub fn privmsg(target: &str, text: &str) -> Self {
        Message::new("PRIVMSG", [target, text])
    }

    pub fn notice(target: &str, text: &str) -> Self {
        Message::new("NOTICE", [target, text])
    }

    pub fn mode(target: &str, modes: &str) -> Self {
        let mut params = vec![target.to_string()];
        params.extend(modes.split_whitespace().map(str::to_owned));
        Message::new("MODE", params)
    }

    pub fn topic(channel: &str, topic: Option<&str>) -> Self {
        match topic {
            Some(topic) => Message::new("TOPIC", [channel, topic]),
            None => Message::new("TOPIC", [channel]),
        }
    }

    pub fn whois(nick: &str) -> Self {
        Message::new("WHOIS", [nick])
    }

    pub fn names(channel: &str) -> Self {
        Message::new("NAMES", [channel])
    }

    /// `AWAY :<message>`, or a bare `AWAY` to come back.
    pub fn away(message: Option<&str>) -> Self {
        match message.filter(|m| !m.is_empty()) {
            Some(message) => Message::new("AWAY", [message]),
            None => Message::new("AWAY", Vec::<String>::new()),
        }
    }

    pub fn ping(token: &str) -> Self {
        Message::new("PING", [token])
    }

    pub fn pong(token: &str) -> Self {
        Message::new("PONG", [token])
    }

    pub fn quit(reason: &str) -> Self {
        Message::new("QUIT", [reason])
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s)
    }
}
