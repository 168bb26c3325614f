//! Property-based tests for IRC message parsing.
//!
//! Uses proptest to generate random IRC components and verify that:
//! 1. Parsing never panics, on any input
//! 2. Serialized messages can be re-parsed (roundtrip)
//! 3. Dispatch holds its channel-state invariants across random traffic

use proptest::prelude::*;
use slirc_engine::{ClientConfig, Message, Prefix, Session};

// =============================================================================
// STRATEGIES - Generators for valid IRC components
// =============================================================================

/// Valid IRC nickname: starts with letter or special char, followed by
/// letters, digits, or special chars. Max 9 chars per RFC 2812.
fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

/// Valid IRC username (ident): alphanumeric, no spaces or @ or !
fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

/// Valid hostname: simplified version
fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

/// Valid IRC channel name: starts with # or &, followed by valid chars
fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#&][a-zA-Z0-9_\\-]{1,49}").expect("valid regex")
}

/// Message text that doesn't contain CR/LF (which would break IRC protocol)
fn message_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n\0]{0,400}").expect("valid regex")
}

/// Generate a valid Prefix
fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        // Server name (contains dot)
        prop::string::string_regex("[a-z]+\\.[a-z]+\\.[a-z]+")
            .expect("valid regex")
            .prop_map(Prefix::ServerName),
        // User prefix: nick!user@host
        (
            nickname_strategy(),
            username_strategy(),
            hostname_strategy()
        )
            .prop_map(|(nick, user, host)| Prefix::Nickname(nick, user, host)),
    ]
}

/// Generate outbound messages through the public constructors
fn command_strategy() -> impl Strategy<Value = Message> {
    prop_oneof![
        (channel_strategy(), message_text_strategy())
            .prop_map(|(target, text)| Message::privmsg(&target, &text)),
        (channel_strategy(), message_text_strategy())
            .prop_map(|(target, text)| Message::notice(&target, &text)),
        nickname_strategy().prop_map(|nick| Message::nick(&nick)),
        channel_strategy().prop_map(|chan| Message::join(&chan, None)),
        (
            channel_strategy(),
            prop::option::of(message_text_strategy())
        )
            .prop_map(|(chan, msg)| Message::part(&chan, msg.as_deref())),
        hostname_strategy().prop_map(|server| Message::ping(&server)),
        hostname_strategy().prop_map(|server| Message::pong(&server)),
        message_text_strategy().prop_map(|reason| Message::quit(&reason)),
        prop::option::of(message_text_strategy()).prop_map(|msg| Message::away(msg.as_deref())),
        (
            channel_strategy(),
            prop::option::of(message_text_strategy())
        )
            .prop_map(|(chan, topic)| Message::topic(&chan, topic.as_deref())),
        (
            channel_strategy(),
            nickname_strategy(),
            message_text_strategy()
        )
            .prop_map(|(chan, nick, reason)| Message::new("KICK", [chan, nick, reason])),
        nickname_strategy().prop_map(|nick| Message::whois(&nick)),
    ]
}

/// Generate a complete valid Message
fn message_strategy() -> impl Strategy<Value = Message> {
    (prop::option::of(prefix_strategy()), command_strategy()).prop_map(|(prefix, msg)| {
        match prefix {
            Some(prefix) => msg.with_source(prefix.to_string()),
            None => msg,
        }
    })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The fundamental roundtrip property: parse → serialize → parse = identity
    #[test]
    fn message_roundtrip(msg in message_strategy()) {
        let serialized = msg.to_string();

        let parsed: Message = serialized.parse()
            .expect("Serialized message should be parseable");

        prop_assert_eq!(&msg, &parsed,
            "Roundtrip failed for serialized: {}", serialized);
    }

    /// Prefix roundtrip: any valid prefix can be parsed and re-serialized
    #[test]
    fn prefix_roundtrip(prefix in prefix_strategy()) {
        let serialized = prefix.to_string();
        let parsed = Prefix::parse(&serialized);
        prop_assert_eq!(&prefix, &parsed,
            "Prefix roundtrip failed for: {}", serialized);
    }

    /// PRIVMSG with arbitrary (valid) content should roundtrip
    #[test]
    fn privmsg_roundtrip(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy(),
        target in channel_strategy(),
        text in message_text_strategy()
    ) {
        let msg = Message::privmsg(&target, &text)
            .with_source(format!("{}!{}@{}", nick, user, host));

        let serialized = msg.to_string();
        let parsed: Message = serialized.parse()
            .expect("PRIVMSG should parse");

        prop_assert_eq!(parsed.param(1), Some(text.as_str()));
        prop_assert_eq!(msg, parsed);
    }

    /// Parsing should never panic, whatever the input
    #[test]
    fn parse_never_panics(input in "\\PC{0,600}") {
        let _ = input.parse::<Message>();
    }

    /// Nickname parser extracts correct nick from full prefix
    #[test]
    fn source_nickname_extraction(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy()
    ) {
        let msg = Message::ping("test").with_source(format!("{}!{}@{}", nick, user, host));
        prop_assert_eq!(msg.source_nick(), nick.as_str());
    }

    /// Channel membership never refers to a channel that was not joined
    #[test]
    fn dispatch_keeps_members_inside_joined_channels(
        lines in prop::collection::vec(message_strategy(), 0..40)
    ) {
        let mut session = Session::from_config(&ClientConfig::new("irc.example.net", "me"));
        session.dispatch(&Message::join("#home", None).with_source("me!m@h"));

        for line in &lines {
            let _ = session.dispatch(line);
        }

        let joined = session.channels.channels();
        for channel in &joined {
            prop_assert!(session.channels.members(channel).is_some());
        }
        prop_assert!(session.channels.members("#never-joined-here").is_none());
    }
}

// =============================================================================
// EDGE CASE TESTS
// =============================================================================

proptest! {
    /// Empty message text should be handled correctly
    #[test]
    fn empty_message_text_roundtrip(target in channel_strategy()) {
        let msg = Message::privmsg(&target, "");

        let serialized = msg.to_string();
        let parsed: Message = serialized.parse().expect("Should parse");
        prop_assert_eq!(msg, parsed);
    }

    /// NAMES replies never leave a mode prefix on a stored nick
    #[test]
    fn names_reply_strips_prefixes(
        nicks in prop::collection::vec((prop::sample::select(vec!["", "@", "+", "%", "~", "&"]), nickname_strategy()), 1..10)
    ) {
        let mut session = Session::from_config(&ClientConfig::new("irc.example.net", "me"));
        session.dispatch(&Message::join("#test", None).with_source("me!m@h"));

        let listing: Vec<String> = nicks.iter().map(|(p, n)| format!("{}{}", p, n)).collect();
        let reply = Message::new("353", ["me".to_string(), "=".to_string(), "#test".to_string(), listing.join(" ")])
            .with_source("irc.example.net");
        session.dispatch(&reply);

        for member in session.channels.members("#test").unwrap() {
            prop_assert!(!member.starts_with(&['@', '+', '%', '~', '&'][..]), "prefix left on {}", member);
        }
    }
}
