//! Typed events published by the client engine.
//!
//! Every variant can also be viewed through the common accessors
//! [`Event::source`], [`Event::target`], [`Event::text`] and
//! [`Event::auxiliary`].

use chrono::{DateTime, Utc};

/// The discriminant of an [`Event`], for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Connect,
    Disconnect,
    Registered,
    Message,
    Action,
    Join,
    Part,
    Quit,
    NickChange,
    Kick,
    Notice,
    ServerNotice,
    ChannelMode,
    UserMode,
    Topic,
    TopicInfo,
    Names,
    NickInUse,
    JoinFailed,
    Whois,
    Error,
}

/// An event produced by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Event {
    /// Socket (and TLS) established; registration is under way.
    Connect,
    /// The connection is gone. Fired exactly once per connection.
    Disconnect,
    /// The server accepted registration (numeric 001).
    Registered,
    /// A PRIVMSG. `target` is the channel, or the sender for private messages.
    Message {
        source: String,
        target: String,
        text: String,
    },
    /// A CTCP ACTION (`/me`), addressed like [`Event::Message`].
    Action {
        source: String,
        target: String,
        text: String,
    },
    Join {
        nick: String,
        channel: String,
    },
    /// Another user left a channel. Self-parts are not reported.
    Part {
        nick: String,
        channel: String,
        reason: String,
    },
    /// `channels` lists where the user was a member before quitting.
    Quit {
        nick: String,
        reason: String,
        channels: Vec<String>,
    },
    /// `channels` lists where the renamed user was a member.
    NickChange {
        old: String,
        new: String,
        channels: Vec<String>,
    },
    Kick {
        source: String,
        channel: String,
        kicked: String,
        reason: String,
    },
    /// NOTICE from a `nick!user@host` source.
    Notice {
        source: String,
        target: String,
        text: String,
    },
    /// NOTICE from a server.
    ServerNotice {
        source: String,
        text: String,
    },
    ChannelMode {
        source: String,
        channel: String,
        modes: String,
    },
    UserMode {
        source: String,
        target: String,
        modes: String,
    },
    Topic {
        source: String,
        channel: String,
        topic: String,
    },
    TopicInfo {
        channel: String,
        setter: String,
        set_at: Option<DateTime<Utc>>,
    },
    /// One NAMES reply; `names` has mode prefixes stripped.
    Names {
        channel: String,
        names: Vec<String>,
    },
    /// The server rejected `nick`; a replacement has been requested.
    NickInUse {
        nick: String,
    },
    /// The server refused to let us join `channel`.
    JoinFailed {
        channel: String,
        code: u16,
        reason: String,
    },
    /// One WHOIS reply line.
    Whois {
        text: String,
    },
    Error {
        message: String,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Connect => EventKind::Connect,
            Event::Disconnect => EventKind::Disconnect,
            Event::Registered => EventKind::Registered,
            Event::Message { .. } => EventKind::Message,
            Event::Action { .. } => EventKind::Action,
            Event::Join { .. } => EventKind::Join,
            Event::Part { .. } => EventKind::Part,
            Event::Quit { .. } => EventKind::Quit,
            Event::NickChange { .. } => EventKind::NickChange,
            Event::Kick { .. } => EventKind::Kick,
            Event::Notice { .. } => EventKind::Notice,
            Event::ServerNotice { .. } => EventKind::ServerNotice,
            Event::ChannelMode { .. } => EventKind::ChannelMode,
            Event::UserMode { .. } => EventKind::UserMode,
            Event::Topic { .. } => EventKind::Topic,
            Event::TopicInfo { .. } => EventKind::TopicInfo,
            Event::Names { .. } => EventKind::Names,
            Event::NickInUse { .. } => EventKind::NickInUse,
            Event::JoinFailed { .. } => EventKind::JoinFailed,
            Event::Whois { .. } => EventKind::Whois,
            Event::Error { .. } => EventKind::Error,
        }
    }

    /// The acting nick or server.
    pub fn source(&self) -> Option<&str> {
        match self {
            Event::Message { source, .. }
            | Event::Action { source, .. }
            | Event::Kick { source, .. }
            | Event::Notice { source, .. }
            | Event::ServerNotice { source, .. }
            | Event::ChannelMode { source, .. }
            | Event::UserMode { source, .. }
            | Event::Topic { source, .. } => Some(source),
            Event::Join { nick, .. } | Event::Part { nick, .. } | Event::Quit { nick, .. } => {
                Some(nick)
            }
            Event::NickChange { old, .. } => Some(old),
            Event::TopicInfo { setter, .. } => Some(setter),
            _ => None,
        }
    }

    /// The channel or nick the event is scoped to.
    pub fn target(&self) -> Option<&str> {
        match self {
            Event::Message { target, .. }
            | Event::Action { target, .. }
            | Event::Notice { target, .. }
            | Event::UserMode { target, .. } => Some(target),
            Event::Join { channel, .. }
            | Event::Part { channel, .. }
            | Event::Kick { channel, .. }
            | Event::ChannelMode { channel, .. }
            | Event::Topic { channel, .. }
            | Event::TopicInfo { channel, .. }
            | Event::Names { channel, .. }
            | Event::JoinFailed { channel, .. } => Some(channel),
            _ => None,
        }
    }

    /// The payload text.
    ///
    /// For kicks this is the kicked nick followed by the reason; for
    /// [`Event::Names`] the space-joined member list.
    pub fn text(&self) -> Option<String> {
        match self {
            Event::Message { text, .. }
            | Event::Action { text, .. }
            | Event::Notice { text, .. }
            | Event::ServerNotice { text, .. }
            | Event::Whois { text } => Some(text.clone()),
            Event::Part { reason, .. }
            | Event::Quit { reason, .. }
            | Event::JoinFailed { reason, .. } => Some(reason.clone()),
            Event::NickChange { new, .. } => Some(new.clone()),
            Event::Kick { kicked, reason, .. } => Some(format!("{} {}", kicked, reason)),
            Event::ChannelMode { modes, .. } | Event::UserMode { modes, .. } => {
                Some(modes.clone())
            }
            Event::Topic { topic, .. } => Some(topic.clone()),
            Event::TopicInfo { set_at, .. } => set_at.map(|t| t.to_rfc3339()),
            Event::Names { names, .. } => Some(names.join(" ")),
            Event::NickInUse { nick } => Some(nick.clone()),
            Event::Error { message } => Some(message.clone()),
            Event::Join { .. } | Event::Connect | Event::Disconnect | Event::Registered => None,
        }
    }

    /// Side-channel data: the comma-joined channel list of quits and renames.
    pub fn auxiliary(&self) -> Option<String> {
        match self {
            Event::Quit { channels, .. } | Event::NickChange { channels, .. } => {
                Some(channels.join(","))
            }
            _ => None,
        }
    }
}
