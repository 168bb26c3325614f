//! Error types for the IRC client engine.
//!
//! This module defines error types for wire-level codec failures,
//! message parsing failures, and failures of the public client API.

use thiserror::Error;

/// Convenience type alias for Results using [`ClientError`].
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Wire-level errors raised by the line codec.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Message exceeded maximum allowed length.
    #[error("message too long: {0} bytes")]
    MessageTooLong(usize),

    /// Illegal control character in message.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),
}

/// Errors encountered when parsing IRC messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// A prefix was present but no command followed it.
    #[error("missing command")]
    MissingCommand,

    /// Command token contained characters outside the grammar.
    #[error("invalid command")]
    InvalidCommand,

    /// Invalid message prefix.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Parsing error with position information.
    #[error("parsing failed at position {position}: {context}")]
    ParseContext {
        /// Byte position where parsing failed.
        position: usize,
        /// Description of what was being parsed.
        context: String,
    },
}

/// Errors returned by the public [`Client`](crate::Client) API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// DNS resolution or TCP connect failed.
    #[error("connect to {addr} failed: {source}")]
    Connect {
        /// `host:port` that was dialed.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// TLS handshake failed.
    #[error("tls handshake with {host} failed: {source}")]
    Tls {
        /// Server name presented for SNI.
        host: String,
        /// Underlying handshake error.
        #[source]
        source: std::io::Error,
    },

    /// The host is not a valid TLS server name.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    /// `connect()` was called while a previous connection is still live.
    #[error("already connected")]
    AlreadyConnected,

    /// No live connection to write to.
    #[error("not connected")]
    NotConnected,

    /// The local client is not a member of the channel.
    #[error("not on channel: {0}")]
    NotOnChannel(String),

    /// An outbound line contained CR, LF or NUL.
    #[error("invalid outbound line: {0:?}")]
    InvalidLine(String),

    /// I/O error on the write path.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
