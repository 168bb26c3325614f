//! IRC message prefix (source) types.

use std::fmt;

/// The source of a message: a server or a user mask.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prefix {
    /// `irc.example.net`
    ServerName(String),
    /// `nick!user@host`; `user` and `host` may be empty for short forms.
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a raw prefix (without the leading `:`).
    ///
    /// A source with `!` or `@` is a user; a bare token containing a dot is
    /// a server; anything else is taken as a bare nickname.
    pub fn parse(raw: &str) -> Prefix {
        match raw.split_once('!') {
            Some((nick, mask)) => {
                let (user, host) = mask.split_once('@').unwrap_or((mask, ""));
                Prefix::Nickname(nick.to_string(), user.to_string(), host.to_string())
            }
            None => match raw.split_once('@') {
                Some((nick, host)) => {
                    Prefix::Nickname(nick.to_string(), String::new(), host.to_string())
                }
                None if raw.contains('.') => Prefix::ServerName(raw.to_string()),
                None => Prefix::Nickname(raw.to_string(), String::new(), String::new()),
            },
        }
    }

    /// Nickname part of a raw prefix without allocating; the whole prefix
    /// when it carries no `!`.
    pub fn nick_of(raw: &str) -> &str {
        match raw.find('!') {
            Some(i) if i > 0 => &raw[..i],
            _ => raw,
        }
    }

    /// Nickname, or the server name for server prefixes.
    pub fn name(&self) -> &str {
        match self {
            Prefix::ServerName(name) => name,
            Prefix::Nickname(nick, _, _) => nick,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{}", user)?;
                }
                if !host.is_empty() {
                    write!(f, "@{}", host)?;
                }
                Ok(())
            }
        }
    }
}
