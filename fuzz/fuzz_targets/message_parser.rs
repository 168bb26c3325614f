//! Fuzz target for inbound line handling
//!
//! Feeds arbitrary bytes through the line codec, the parser and a session's
//! dispatch; none of them may panic.

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use slirc_engine::{ClientConfig, LineCodec, Message, Session};
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut codec = LineCodec::new();
    let mut buf = BytesMut::from(data);
    let mut session = Session::from_config(&ClientConfig::new("irc.example.net", "me"));

    // Any line the codec yields goes through the parser and dispatch
    while let Ok(Some(line)) = codec.decode_eof(&mut buf) {
        if let Ok(message) = line.parse::<Message>() {
            let _ = message.to_string();
            let _ = session.dispatch(&message);
        }
    }
});
