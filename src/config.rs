//! Client configuration.

use std::time::Duration;

use crate::state::Identity;

/// Default TLS port.
pub const DEFAULT_TLS_PORT: u16 = 6697;
/// Default plaintext port.
pub const DEFAULT_PLAIN_PORT: u16 = 6667;

/// Connection and identity settings for a [`Client`](crate::Client).
///
/// ```
/// use slirc_engine::ClientConfig;
///
/// let config = ClientConfig::new("irc.libera.chat", "engine")
///     .with_realname("Engine Bot")
///     .secure(false);
/// assert_eq!(config.port, 6667);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Wrap the socket in TLS.
    pub secure: bool,
    pub nick: String,
    pub username: String,
    pub realname: String,
    /// Sent as `PASS` during registration.
    pub password: Option<String>,
    /// Quiet period after which [`Client::ping_check`](crate::Client::ping_check)
    /// sends a `PING`.
    pub idle_timeout: Duration,
    /// Socket read timeout. Expiry is logged and reading continues.
    pub read_timeout: Duration,
    /// Appended to a nick the server reports as in use.
    pub nick_suffix: String,
    /// Give up resending `NICK` after this many collisions. `None` retries forever.
    pub max_nick_attempts: Option<u32>,
    /// Answer to CTCP VERSION.
    pub version_reply: String,
    /// Default `QUIT` reason.
    pub quit_message: String,
    /// Enable TCP keepalive probes on the socket.
    pub tcp_keepalive: bool,
    /// After registration, identify to NickServ with `password`.
    pub identify_with_nickserv: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    port_overridden: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_TLS_PORT,
            secure: true,
            nick: String::new(),
            username: String::new(),
            realname: String::new(),
            password: None,
            idle_timeout: Duration::from_secs(60),
            read_timeout: Duration::from_secs(120),
            nick_suffix: "_".to_string(),
            max_nick_attempts: Some(5),
            version_reply: concat!("slirc-engine ", env!("CARGO_PKG_VERSION")).to_string(),
            quit_message: "Disconnecting".to_string(),
            tcp_keepalive: true,
            identify_with_nickserv: false,
            port_overridden: false,
        }
    }
}

impl ClientConfig {
    /// A TLS config for `host` on port 6697; username and realname default to `nick`.
    pub fn new(host: impl Into<String>, nick: impl Into<String>) -> Self {
        let nick = nick.into();
        Self {
            host: host.into(),
            username: nick.clone(),
            realname: nick.clone(),
            nick,
            ..Self::default()
        }
    }

    /// Toggle TLS. Moves the port between 6697 and 6667 unless it was set
    /// with [`with_port`](Self::with_port).
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        if !self.port_overridden {
            self.port = if secure {
                DEFAULT_TLS_PORT
            } else {
                DEFAULT_PLAIN_PORT
            };
        }
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self.port_overridden = true;
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    #[must_use]
    pub fn with_realname(mut self, realname: impl Into<String>) -> Self {
        self.realname = realname.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_nick_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.nick_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_max_nick_attempts(mut self, max: Option<u32>) -> Self {
        self.max_nick_attempts = max;
        self
    }

    #[must_use]
    pub fn with_version_reply(mut self, reply: impl Into<String>) -> Self {
        self.version_reply = reply.into();
        self
    }

    #[must_use]
    pub fn with_quit_message(mut self, message: impl Into<String>) -> Self {
        self.quit_message = message.into();
        self
    }

    #[must_use]
    pub fn with_tcp_keepalive(mut self, enabled: bool) -> Self {
        self.tcp_keepalive = enabled;
        self
    }

    #[must_use]
    pub fn with_nickserv_identify(mut self, enabled: bool) -> Self {
        self.identify_with_nickserv = enabled;
        self
    }

    /// `host:port` for dialing.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The identity registered with.
    pub fn identity(&self) -> Identity {
        Identity::new(
            &self.nick,
            &self.username,
            &self.realname,
            self.password.clone(),
        )
    }
}
