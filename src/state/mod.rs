//! Sans-IO connection state for the client engine.
//!
//! Nothing in this module performs I/O. Each piece consumes parsed
//! messages or clock readings and reports what the caller should do:
//!
//! - [`ChannelTracker`]: joined channels and their members.
//! - [`Registration`]: the PASS/NICK/USER handshake and the queue of
//!   commands deferred until the welcome numeric.
//! - [`NickCollisionResolver`]: alternate nicknames after `433`.
//! - [`KeepAlive`]: idle tracking and ping timeout detection.
//!
//! # Example
//!
//! ```
//! use slirc_engine::state::{ChannelTracker, Identity};
//!
//! let me = Identity::new("engine", "engine", "Engine", None);
//! let mut channels = ChannelTracker::new();
//! channels.join("#rust");
//! channels.add_member("#rust", &me.nick);
//! assert_eq!(channels.channels(), vec!["#rust".to_string()]);
//! ```

pub mod channels;
pub mod keepalive;
pub mod nick;
pub mod registration;

pub use self::channels::{strip_mode_prefix, ChannelTracker};
pub use self::keepalive::{KeepAlive, KeepAliveAction};
pub use self::nick::NickCollisionResolver;
pub use self::registration::Registration;

use std::fmt;

use crate::casemap::irc_eq;

/// Lifecycle of one connection attempt.
///
/// `Disconnected -> Connecting -> Connected -> Registered`, then back to
/// `Disconnected`, through `ShuttingDown` when the caller closes the link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// No live connection.
    #[default]
    Disconnected,
    /// Dialing the server (DNS, TCP, TLS).
    Connecting,
    /// Socket is up; registration has been sent.
    Connected,
    /// Received 001.
    Registered,
    /// `disconnect()` is tearing the link down.
    ShuttingDown,
}

impl ConnectionState {
    /// Whether a socket is currently usable for writing.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Connected | Self::Registered)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Registered => "registered",
            Self::ShuttingDown => "shutting down",
        };
        f.write_str(name)
    }
}

/// Who we are on the network.
///
/// Only `nick` changes after construction, through NICK echoes and nick
/// collision recovery.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identity {
    /// Current nickname.
    pub nick: String,
    /// Username (ident).
    pub username: String,
    /// Real name / GECOS.
    pub realname: String,
    /// Server password, if required.
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub password: Option<String>,
}

impl Identity {
    pub fn new(
        nick: impl Into<String>,
        username: impl Into<String>,
        realname: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            username: username.into(),
            realname: realname.into(),
            password,
        }
    }

    /// Whether `nick` refers to us under IRC case mapping.
    pub fn is_me(&self, nick: &str) -> bool {
        irc_eq(&self.nick, nick)
    }
}
