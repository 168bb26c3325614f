//! Integration tests for message parsing and serialization
//!
//! These tests verify that messages can be parsed from strings and then
//! serialized back to equivalent strings, ensuring round-trip compatibility.

use slirc_engine::{Message, MessageParseError, Prefix};

fn assert_round_trip(original: &str) -> Message {
    let message: Message = original.parse().expect("Failed to parse message");
    let serialized = message.to_string();
    let reparsed: Message = serialized.parse().expect("Failed to reparse message");
    assert_eq!(message, reparsed, "round trip of {:?} via {:?}", original, serialized);
    message
}

#[test]
fn test_message_round_trip_simple() {
    let message = assert_round_trip("PING :irc.example.com");
    assert_eq!(message.command, "PING");
    assert_eq!(message.params, vec!["irc.example.com"]);
}

#[test]
fn test_message_round_trip_with_prefix() {
    let message = assert_round_trip(":nick!user@host PRIVMSG #channel :Hello, world!");
    assert_eq!(
        message.prefix(),
        Some(Prefix::Nickname("nick".into(), "user".into(), "host".into()))
    );
    assert_eq!(message.to_string(), ":nick!user@host PRIVMSG #channel :Hello, world!");
}

#[test]
fn test_message_round_trip_numeric_response() {
    let message = assert_round_trip(":server 001 nickname :Welcome to the IRC Network");
    assert_eq!(message.numeric(), Some(1));
    assert_eq!(message.params.len(), 2);
}

#[test]
fn test_message_round_trip_names_reply() {
    let message = assert_round_trip(":irc.example.net 353 me = #test :alice @bob +carol\r\n");
    assert_eq!(message.params, vec!["me", "=", "#test", "alice @bob +carol"]);
}

#[test]
fn test_message_round_trip_ctcp_payload() {
    let message = assert_round_trip(":alice!a@h PRIVMSG #test :\x01ACTION waves\x01");
    assert_eq!(message.param(1), Some("\x01ACTION waves\x01"));
}

#[test]
fn test_message_round_trip_empty_trailing() {
    let message = assert_round_trip(":bob!b@h PART #test :");
    assert_eq!(message.params, vec!["#test", ""]);
}

#[test]
fn test_tags_are_dropped_when_prefix_present() {
    let message = assert_round_trip(
        "@time=2023-01-01T00:00:00.000Z;msgid=abc123 :nick!user@host PRIVMSG #channel :Tagged message",
    );
    assert_eq!(message.source.as_deref(), Some("nick!user@host"));
}

#[test]
fn test_at_token_without_prefix_is_source() {
    let message = assert_round_trip("@irc.example.net NOTICE * :*** Looking up your hostname");
    assert_eq!(message.source.as_deref(), Some("irc.example.net"));
    assert_eq!(
        message.to_string(),
        ":irc.example.net NOTICE * :*** Looking up your hostname"
    );
}

#[test]
fn test_message_construction_and_parsing() {
    let message = Message::privmsg("#test", "Integration test message")
        .with_source("testbot!test@example.com");

    let serialized = message.to_string();
    assert_eq!(
        serialized,
        ":testbot!test@example.com PRIVMSG #test :Integration test message"
    );

    let parsed: Message = serialized
        .parse()
        .expect("Failed to parse constructed message");
    assert_eq!(message, parsed);
}

#[test]
fn test_outbound_constructors_wire_format() {
    let cases = [
        (Message::pass("secret"), "PASS secret"),
        (Message::nick("engine"), "NICK engine"),
        (Message::user("engine", "Engine Bot"), "USER engine 0 * :Engine Bot"),
        (Message::join("#rust", None), "JOIN #rust"),
        (Message::join("#rust", Some("key")), "JOIN #rust key"),
        (Message::part("#rust", Some("bye now")), "PART #rust :bye now"),
        (Message::notice("bob", "hi"), "NOTICE bob :hi"),
        (Message::mode("#rust", "+o alice"), "MODE #rust +o alice"),
        (Message::topic("#rust", Some("new topic")), "TOPIC #rust :new topic"),
        (Message::topic("#rust", None), "TOPIC #rust"),
        (Message::whois("bob"), "WHOIS bob"),
        (Message::names("#rust"), "NAMES #rust"),
        (Message::away(Some("lunch")), "AWAY lunch"),
        (Message::away(None), "AWAY"),
        (Message::pong("abc"), "PONG abc"),
        (Message::quit("Disconnecting"), "QUIT Disconnecting"),
    ];

    for (message, expected) in cases {
        assert_eq!(message.to_string(), expected);
        assert_eq!(Message::parse(expected).unwrap(), message);
    }
}

#[test]
fn test_malformed_lines_are_rejected() {
    assert_eq!(Message::parse(""), Err(MessageParseError::EmptyMessage));
    assert_eq!(Message::parse("\r\n"), Err(MessageParseError::EmptyMessage));
    assert!(Message::parse(":prefix.only").is_err());
    assert!(Message::parse("PRIV$MSG #a :x").is_err());
}

#[test]
fn test_multiple_spaces_between_params() {
    let message: Message = "MODE  #rust   +o   alice".parse().unwrap();
    assert_eq!(message.params, vec!["#rust", "+o", "alice"]);
}
