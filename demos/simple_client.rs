//! Simple IRC client example
//!
//! Connects to a server, joins a channel once registered, greets anyone who
//! says hello and prints everything else it sees. Ctrl+C quits.
//!
//! ```text
//! RUST_LOG=slirc_engine=debug cargo run --example simple_client -- irc.libera.chat '#example'
//! ```

use std::time::Duration;

use anyhow::Context;
use slirc_engine::{Client, ClientConfig, Event, KeepAliveAction};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "irc.libera.chat".to_string());
    let channel = args.next().unwrap_or_else(|| "#example".to_string());

    let config = ClientConfig::new(host, "example_bot").with_realname("slirc-engine example");
    let client = Client::new(config);
    let mut events = client.subscribe();

    let join = channel.clone();
    client.execute_when_registered(move |client| {
        if let Err(e) = client.join_channel(&join, None) {
            eprintln!("join failed: {}", e);
        }
    });

    client.connect().await.context("connecting")?;

    let mut keepalive = tokio::time::interval(Duration::from_secs(30));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                client.disconnect(Some("Goodbye!")).await?;
                break;
            }
            _ = keepalive.tick() => {
                if client.ping_check() == KeepAliveAction::TimedOut {
                    eprintln!("server stopped answering");
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match &event {
                    Event::Registered => println!("✓ registered as {}", client.nick()),
                    Event::Join { nick, channel } => println!("→ {} joined {}", nick, channel),
                    Event::Message { source, target, text } => {
                        println!("<{}:{}> {}", source, target, text);
                        if text.contains("hello") {
                            let reply_to = if target.starts_with('#') { target } else { source };
                            client.send_message(reply_to, "Hello there! 👋")?;
                        }
                    }
                    Event::Action { source, text, .. } => println!("* {} {}", source, text),
                    Event::Error { message } => eprintln!("error: {}", message),
                    Event::Disconnect => {
                        println!("Connection closed");
                        break;
                    }
                    other => println!("{:?}", other),
                }
            }
        }
    }

    Ok(())
}
