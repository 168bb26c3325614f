//! Command dispatch: one parsed line in, at most one event out.
//!
//! [`Session`] owns the per-connection state the dispatcher reads and
//! mutates. It performs no I/O; lines that must be sent in response
//! (CTCP replies, a replacement `NICK`) come back in [`Dispatch::replies`].

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::ctcp::{self, Ctcp};
use crate::event::Event;
use crate::message::Message;
use crate::prefix::Prefix;
use crate::response::Response;
use crate::state::{ChannelTracker, Identity, NickCollisionResolver};

/// Whether `target` names a channel rather than a nick.
pub fn is_channel_name(target: &str) -> bool {
    target.starts_with(&['#', '&'][..])
}

/// Outcome of dispatching one message.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Event to publish, if the command was recognized.
    pub event: Option<Event>,
    /// Lines to send back to the server.
    pub replies: Vec<Message>,
    /// The welcome numeric arrived; registration is complete.
    pub registered: bool,
}

impl Dispatch {
    fn event(event: Event) -> Self {
        Self {
            event: Some(event),
            ..Self::default()
        }
    }

    fn none() -> Self {
        Self::default()
    }
}

/// Per-connection state mutated by dispatched messages.
#[derive(Debug)]
pub struct Session {
    pub identity: Identity,
    pub channels: ChannelTracker,
    nick: NickCollisionResolver,
    version_reply: String,
    /// 001 has arrived on this connection.
    registered: bool,
}

impl Session {
    pub fn new(identity: Identity, nick: NickCollisionResolver, version_reply: String) -> Self {
        Self {
            identity,
            channels: ChannelTracker::new(),
            nick,
            version_reply,
            registered: false,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.identity(),
            NickCollisionResolver::new(&config.nick_suffix, config.max_nick_attempts),
            config.version_reply.clone(),
        )
    }

    /// Drop connection-scoped state. The identity, including any nick
    /// changes, is kept.
    pub fn reset(&mut self) {
        self.channels.clear();
        self.nick.reset();
        self.registered = false;
    }

    /// Whether the welcome numeric has been seen since the last reset.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Classify `msg`, updating channel state and identity.
    pub fn dispatch(&mut self, msg: &Message) -> Dispatch {
        if let Some(code) = msg.numeric() {
            return self.numeric(code, msg);
        }

        match msg.command.to_ascii_uppercase().as_str() {
            "PRIVMSG" => self.privmsg(msg),
            "JOIN" => self.join(msg),
            "PART" => self.part(msg),
            "QUIT" => self.quit(msg),
            "NICK" => self.nick_change(msg),
            "KICK" => self.kick(msg),
            "NOTICE" => self.notice(msg),
            "MODE" => self.mode(msg),
            "TOPIC" => self.topic(msg),
            "ERROR" => Dispatch::event(Event::Error {
                message: last_param(msg).to_string(),
            }),
            _ => {
                trace!(command = %msg.command, "unhandled command");
                Dispatch::none()
            }
        }
    }

    fn privmsg(&mut self, msg: &Message) -> Dispatch {
        let sender = msg.source_nick().to_string();
        let declared = msg.param(0).unwrap_or_default();
        let text = msg.param(1).unwrap_or_default();
        let target = if is_channel_name(declared) {
            declared.to_string()
        } else {
            sender.clone()
        };

        let Some(request) = Ctcp::decode(text) else {
            return Dispatch::event(Event::Message {
                source: sender,
                target,
                text: text.to_string(),
            });
        };

        if request.is("ACTION") {
            Dispatch::event(Event::Action {
                source: sender,
                target,
                text: request.argument.to_string(),
            })
        } else if request.is("VERSION") {
            Dispatch {
                replies: vec![ctcp::reply(&sender, "VERSION", &self.version_reply)],
                ..Dispatch::none()
            }
        } else if request.is("PING") {
            Dispatch {
                replies: vec![ctcp::reply(&sender, "PING", request.argument)],
                ..Dispatch::none()
            }
        } else {
            debug!(from = %sender, command = request.command, "ignoring CTCP request");
            Dispatch::none()
        }
    }

    fn join(&mut self, msg: &Message) -> Dispatch {
        let nick = msg.source_nick().to_string();
        let channel = msg.param(0).unwrap_or_default().to_string();
        if self.identity.is_me(&nick) {
            self.channels.join(&channel);
        }
        self.channels.add_member(&channel, &nick);
        Dispatch::event(Event::Join { nick, channel })
    }

    fn part(&mut self, msg: &Message) -> Dispatch {
        let nick = msg.source_nick().to_string();
        let channel = msg.param(0).unwrap_or_default().to_string();
        if self.identity.is_me(&nick) {
            self.channels.remove(&channel);
            return Dispatch::none();
        }
        self.channels.remove_member(&channel, &nick);
        Dispatch::event(Event::Part {
            nick,
            channel,
            reason: msg.param(1).unwrap_or_default().to_string(),
        })
    }

    fn quit(&mut self, msg: &Message) -> Dispatch {
        let nick = msg.source_nick().to_string();
        let channels = self.channels.quit(&nick);
        Dispatch::event(Event::Quit {
            nick,
            reason: msg.param(0).unwrap_or_default().to_string(),
            channels,
        })
    }

    fn nick_change(&mut self, msg: &Message) -> Dispatch {
        let old = msg.source_nick().to_string();
        let new = msg.param(0).unwrap_or_default().to_string();
        if self.identity.is_me(&old) {
            debug!(%old, %new, "own nick changed");
            self.identity.nick = new.clone();
            self.nick.reset();
        }
        let channels = self.channels.rename(&old, &new);
        Dispatch::event(Event::NickChange { old, new, channels })
    }

    fn kick(&mut self, msg: &Message) -> Dispatch {
        let channel = msg.param(0).unwrap_or_default().to_string();
        let kicked = msg.param(1).unwrap_or_default().to_string();
        if self.identity.is_me(&kicked) {
            self.channels.remove(&channel);
        } else {
            self.channels.remove_member(&channel, &kicked);
        }
        Dispatch::event(Event::Kick {
            source: msg.source_nick().to_string(),
            channel,
            kicked,
            reason: msg.param(2).unwrap_or_default().to_string(),
        })
    }

    fn notice(&mut self, msg: &Message) -> Dispatch {
        let text = last_param(msg).to_string();
        match msg.prefix() {
            Some(Prefix::Nickname(nick, user, _)) if !user.is_empty() => {
                Dispatch::event(Event::Notice {
                    source: nick,
                    target: msg.param(0).unwrap_or_default().to_string(),
                    text,
                })
            }
            other => Dispatch::event(Event::ServerNotice {
                source: other.map(|p| p.to_string()).unwrap_or_default(),
                text,
            }),
        }
    }

    fn mode(&mut self, msg: &Message) -> Dispatch {
        let source = msg.source_nick().to_string();
        let target = msg.param(0).unwrap_or_default().to_string();
        let modes = params_from(msg, 1);
        if is_channel_name(&target) {
            Dispatch::event(Event::ChannelMode {
                source,
                channel: target,
                modes,
            })
        } else {
            Dispatch::event(Event::UserMode {
                source,
                target,
                modes,
            })
        }
    }

    fn topic(&mut self, msg: &Message) -> Dispatch {
        Dispatch::event(Event::Topic {
            source: msg.source_nick().to_string(),
            channel: msg.param(0).unwrap_or_default().to_string(),
            topic: msg.param(1).unwrap_or_default().to_string(),
        })
    }

    fn numeric(&mut self, code: u16, msg: &Message) -> Dispatch {
        let Some(response) = Response::from_code(code) else {
            trace!(code, "unhandled numeric");
            return Dispatch::none();
        };
        let server = msg
            .prefix()
            .map(|p| p.name().to_string())
            .unwrap_or_default();

        match response {
            Response::RPL_WELCOME => {
                if let Some(nick) = msg.param(0).filter(|n| !n.is_empty() && *n != "*") {
                    self.identity.nick = nick.to_string();
                }
                self.nick.reset();
                self.registered = true;
                Dispatch {
                    event: Some(Event::Registered),
                    registered: true,
                    ..Dispatch::none()
                }
            }
            Response::RPL_UMODEIS => Dispatch::event(Event::UserMode {
                source: server,
                target: msg.param(0).unwrap_or_default().to_string(),
                modes: params_from(msg, 1),
            }),
            Response::RPL_CHANNELMODEIS => Dispatch::event(Event::ChannelMode {
                source: server,
                channel: msg.param(1).unwrap_or_default().to_string(),
                modes: params_from(msg, 2),
            }),
            Response::RPL_TOPIC => Dispatch::event(Event::Topic {
                source: server,
                channel: msg.param(1).unwrap_or_default().to_string(),
                topic: msg.param(2).unwrap_or_default().to_string(),
            }),
            Response::RPL_TOPICWHOTIME => Dispatch::event(Event::TopicInfo {
                channel: msg.param(1).unwrap_or_default().to_string(),
                setter: Prefix::nick_of(msg.param(2).unwrap_or_default()).to_string(),
                set_at: msg.param(3).and_then(parse_timestamp),
            }),
            Response::RPL_NAMREPLY => {
                // 353 <me> <type> <channel> :<names>
                let channel = msg.param(2).unwrap_or_default().to_string();
                let listing = if msg.params.len() > 3 {
                    last_param(msg)
                } else {
                    ""
                };
                let names = self
                    .channels
                    .merge_names(&channel, listing.split_whitespace());
                Dispatch::event(Event::Names { channel, names })
            }
            Response::ERR_NICKNAMEINUSE => self.nick_in_use(msg),
            r if r.is_whois_related() => Dispatch::event(Event::Whois {
                text: params_from(msg, 1),
            }),
            r if r.is_join_failure() => Dispatch::event(Event::JoinFailed {
                channel: msg.param(1).unwrap_or_default().to_string(),
                code,
                reason: last_param(msg).to_string(),
            }),
            _ => Dispatch::none(),
        }
    }

    fn nick_in_use(&mut self, msg: &Message) -> Dispatch {
        // 433 <me or *> <nick> :Nickname is already in use
        let rejected = msg
            .param(1)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.identity.nick.as_str())
            .to_string();
        let mut dispatch = Dispatch::event(Event::NickInUse {
            nick: rejected.clone(),
        });
        if let Some(alternate) = self.nick.resolve(&rejected) {
            debug!(%rejected, %alternate, "nick in use, retrying");
            dispatch.replies.push(Message::nick(&alternate));
            // Once registered the nick is ours only after the server echoes it.
            if !self.registered {
                self.identity.nick = alternate;
            }
        }
        dispatch
    }
}

fn last_param(msg: &Message) -> &str {
    msg.params.last().map(String::as_str).unwrap_or_default()
}

fn params_from(msg: &Message, start: usize) -> String {
    msg.params.get(start..).unwrap_or_default().join(" ")
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
