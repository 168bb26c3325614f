//! # slirc-engine
//!
//! An embeddable IRC client engine: it owns one (optionally TLS) connection,
//! registers with the server, tracks channel membership, and republishes
//! everything it hears as typed [`Event`]s.
//!
//! ## Features
//!
//! - Line parsing into [`Message`] (prefix, command, params, trailing)
//! - Command and numeric dispatch into [`Event`]s, including CTCP
//! - Channel and member tracking driven only by server traffic
//! - Commands deferred until registration completes
//! - Automatic nick collision recovery
//! - Caller-driven keepalive with ping timeout detection
//! - Optional Tokio networking (default `tokio` feature)

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing IRC Messages
//!
//! ```rust
//! use slirc_engine::Message;
//!
//! let message: Message = ":alice!a@host PRIVMSG #rust :Hello!".parse().expect("valid line");
//! assert_eq!(message.source_nick(), "alice");
//! assert_eq!(message.params, vec!["#rust", "Hello!"]);
//! ```
//!
//! ### Dispatching Without a Socket
//!
//! ```rust
//! use slirc_engine::{ClientConfig, Event, Message, Session};
//!
//! let mut session = Session::from_config(&ClientConfig::new("irc.example.net", "me"));
//! let line = Message::parse(":me!m@host JOIN #rust").expect("valid line");
//! let out = session.dispatch(&line);
//! assert!(matches!(out.event, Some(Event::Join { .. })));
//! assert_eq!(session.channels.channels(), vec!["#rust".to_string()]);
//! ```
//!
//! ### Connecting
//!
//! ```rust,no_run
//! # #[cfg(feature = "tokio")]
//! # async fn run() -> slirc_engine::Result<()> {
//! use slirc_engine::{Client, ClientConfig, Event};
//!
//! let client = Client::new(ClientConfig::new("irc.libera.chat", "engine"));
//! let mut events = client.subscribe();
//! client.execute_when_registered(|client| {
//!     let _ = client.join_channel("#rust", None);
//! });
//! client.connect().await?;
//! while let Some(event) = events.recv().await {
//!     if let Event::Message { source, text, .. } = event {
//!         println!("<{}> {}", source, text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod casemap;
pub mod config;
pub mod ctcp;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod message;
pub mod prefix;
pub mod response;
pub mod state;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::bus::{EventBus, EventListener, ListenerId};
pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::config::ClientConfig;
pub use self::ctcp::Ctcp;
pub use self::dispatch::{Dispatch, Session};
pub use self::error::{ClientError, MessageParseError, ProtocolError, Result};
pub use self::event::{Event, EventKind};
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::response::Response;
pub use self::state::{ConnectionState, Identity, KeepAliveAction};

#[cfg(feature = "tokio")]
pub use self::client::{Client, Thunk};
#[cfg(feature = "tokio")]
pub use self::transport::{LineCodec, Transport, MAX_IRC_LINE_LEN};
