//! Socket transport: plain TCP or TLS, framed into lines.

mod codec;
mod dial;

pub use self::codec::{LineCodec, MAX_IRC_LINE_LEN};
pub use self::dial::dial;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_util::codec::Framed;

/// Any duplex byte stream the engine can speak IRC over.
pub trait IrcStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> IrcStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

type FramedLines = Framed<Box<dyn IrcStream>, LineCodec>;

/// Write half of a split transport.
pub type LineSink = SplitSink<FramedLines, String>;
/// Read half of a split transport.
pub type LineStream = SplitStream<FramedLines>;

/// An established connection, framed into lines.
pub struct Transport {
    framed: FramedLines,
    tls: bool,
}

impl Transport {
    pub fn tcp(stream: TcpStream) -> Self {
        Self::from_stream(stream, false)
    }

    pub fn tls(stream: TlsStream<TcpStream>) -> Self {
        Self::from_stream(stream, true)
    }

    /// Wrap an arbitrary stream, e.g. an in-memory duplex in tests.
    pub fn from_stream<S>(stream: S, tls: bool) -> Self
    where
        S: IrcStream + 'static,
    {
        let stream: Box<dyn IrcStream> = Box::new(stream);
        Self {
            framed: Framed::new(stream, LineCodec::new()),
            tls,
        }
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// Split into independently owned write and read halves.
    pub fn split(self) -> (LineSink, LineStream) {
        self.framed.split()
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").field("tls", &self.tls).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_split_halves_frame_lines() {
        let (local, mut remote) = tokio::io::duplex(1024);
        let transport = Transport::from_stream(local, false);
        assert!(!transport.is_tls());
        let (mut sink, mut stream) = transport.split();

        sink.send("NICK engine".to_string()).await.unwrap();
        let mut buf = [0u8; 13];
        remote.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"NICK engine\r\n");

        remote.write_all(b"PING :abc\r\n").await.unwrap();
        let line = stream.next().await.unwrap().unwrap();
        assert_eq!(line, "PING :abc");
    }
}
