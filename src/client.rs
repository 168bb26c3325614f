//! The connection-owning IRC client.
//!
//! A [`Client`] is a cheap, cloneable handle. Each live connection runs two
//! tasks: a reader that parses and dispatches every inbound line and
//! invokes listeners inline, and a writer that owns the socket's write
//! half and drains a FIFO of complete lines. Public send methods only
//! enqueue, so they are plain synchronous functions and lines from
//! concurrent callers never interleave.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bus::{EventBus, EventListener, ListenerId};
use crate::config::ClientConfig;
use crate::ctcp;
use crate::dispatch::Session;
use crate::error::{ClientError, Result};
use crate::event::Event;
use crate::message::Message;
use crate::state::registration::handshake;
use crate::state::{ConnectionState, KeepAlive, KeepAliveAction, Registration};
use crate::transport::{self, LineSink, LineStream};

/// Deferred work run once registration completes.
pub type Thunk = Box<dyn FnOnce(&Client) + Send + 'static>;

/// How long `disconnect` waits for the connection tasks to wind down.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

enum Outbound {
    Line(String),
    Close,
}

/// Flags shared by the tasks of one connection.
struct LinkShared {
    /// Set by `disconnect`; the reader then exits quietly.
    planned: AtomicBool,
    /// `Disconnect` has been published for this connection.
    closed: AtomicBool,
    /// Reason for a forced close (writer failure, ping timeout).
    fault: Mutex<Option<String>>,
    shutdown: watch::Sender<bool>,
}

impl LinkShared {
    fn new() -> (Arc<Self>, watch::Receiver<bool>) {
        let (shutdown, rx) = watch::channel(false);
        let shared = Arc::new(Self {
            planned: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            fault: Mutex::new(None),
            shutdown,
        });
        (shared, rx)
    }

    /// Stop the reader as an unplanned failure.
    fn fail(&self, reason: impl Into<String>) {
        self.fault.lock().get_or_insert_with(|| reason.into());
        let _ = self.shutdown.send(true);
    }

    fn stop(&self) {
        self.planned.store(true, Ordering::SeqCst);
        let _ = self.shutdown.send(true);
    }
}

struct Link {
    id: u64,
    outbound: mpsc::UnboundedSender<Outbound>,
    shared: Arc<LinkShared>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

struct Inner {
    config: ClientConfig,
    bus: EventBus,
    state: Mutex<ConnectionState>,
    session: Mutex<Session>,
    registration: Mutex<Registration<Thunk>>,
    keepalive: Mutex<KeepAlive>,
    link: Mutex<Option<Link>>,
    next_link: AtomicU64,
}

/// Handle to one IRC connection.
///
/// ```no_run
/// use slirc_engine::{Client, ClientConfig, Event};
///
/// # async fn run() -> slirc_engine::Result<()> {
/// let client = Client::new(ClientConfig::new("irc.libera.chat", "engine"));
/// client.add_event_listener(|event: &Event| println!("{:?}", event));
/// client.execute_when_registered(|client| {
///     let _ = client.join_channel("#rust", None);
/// });
/// client.connect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let session = Session::from_config(&config);
        let keepalive = KeepAlive::new(config.idle_timeout, Instant::now());
        Self {
            inner: Arc::new(Inner {
                config,
                bus: EventBus::new(),
                state: Mutex::new(ConnectionState::Disconnected),
                session: Mutex::new(session),
                registration: Mutex::new(Registration::new()),
                keepalive: Mutex::new(keepalive),
                link: Mutex::new(None),
                next_link: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    /// Whether the socket is up (registered or not).
    pub fn is_connected(&self) -> bool {
        self.state().is_live()
    }

    /// Current nickname.
    pub fn nick(&self) -> String {
        self.inner.session.lock().identity.nick.clone()
    }

    /// Joined channels, in join order.
    pub fn channels(&self) -> Vec<String> {
        self.inner.session.lock().channels.channels()
    }

    /// Known members of a joined channel.
    pub fn members(&self, channel: &str) -> Option<Vec<String>> {
        self.inner.session.lock().channels.members(channel)
    }

    // Listeners

    pub fn add_event_listener<L>(&self, listener: L) -> ListenerId
    where
        L: EventListener + 'static,
    {
        self.inner.bus.add(Arc::new(listener))
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.bus.remove(id)
    }

    /// Receive every subsequent event on a channel.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.add_event_listener(move |event: &Event| {
            let _ = tx.send(event.clone());
        });
        rx
    }

    fn publish(&self, event: Event) {
        self.inner.bus.publish(&event);
    }

    // Lifecycle

    /// Dial the server and start registration.
    ///
    /// Returns once the socket is up and `PASS`/`NICK`/`USER` are queued;
    /// registration completes asynchronously with [`Event::Registered`].
    /// On failure an [`Event::Error`] is also published.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            if *state != ConnectionState::Disconnected {
                return Err(ClientError::AlreadyConnected);
            }
            *state = ConnectionState::Connecting;
        }

        let config = &self.inner.config;
        info!(addr = %config.address(), secure = config.secure, "connecting");
        let transport = match transport::dial(config).await {
            Ok(transport) => transport,
            Err(e) => {
                warn!(error = %e, "connect failed");
                *self.inner.state.lock() = ConnectionState::Disconnected;
                self.publish(Event::Error {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let id = self.inner.next_link.fetch_add(1, Ordering::Relaxed);
        let (sink, stream) = transport.split();
        let (outbound, rx) = mpsc::unbounded_channel();
        let (shared, shutdown) = LinkShared::new();
        let writer = tokio::spawn(write_loop(sink, rx, Arc::clone(&shared)));

        *self.inner.keepalive.lock() = KeepAlive::new(config.idle_timeout, Instant::now());
        *self.inner.link.lock() = Some(Link {
            id,
            outbound,
            shared: Arc::clone(&shared),
            reader: None,
            writer: Some(writer),
        });
        *self.inner.state.lock() = ConnectionState::Connected;
        self.publish(Event::Connect);

        if config.identify_with_nickserv {
            if let Some(password) = config.password.clone() {
                self.execute_when_registered(move |client| {
                    if let Err(e) = client.nickserv(&format!("IDENTIFY {}", password)) {
                        warn!(error = %e, "failed to identify with NickServ");
                    }
                });
            }
        }

        let reader = tokio::spawn(read_loop(self.clone(), stream, shared, shutdown, id));
        if let Some(link) = self.inner.link.lock().as_mut().filter(|l| l.id == id) {
            link.reader = Some(reader);
        }

        let identity = self.inner.session.lock().identity.clone();
        for line in handshake(&identity) {
            self.send(line)?;
        }
        Ok(())
    }

    /// Send `QUIT` and close the connection.
    ///
    /// `reason` defaults to the configured quit message. Publishes
    /// [`Event::Disconnect`] once the connection is down; does nothing when
    /// there is no connection.
    pub async fn disconnect(&self, reason: Option<&str>) -> Result<()> {
        let Some(mut link) = self.inner.link.lock().take() else {
            return Ok(());
        };
        *self.inner.state.lock() = ConnectionState::ShuttingDown;
        info!("disconnecting");

        let reason = reason
            .filter(|r| !r.is_empty())
            .unwrap_or(self.inner.config.quit_message.as_str());
        let quit = Message::quit(reason).to_string();
        debug!(target: "slirc_engine::wire", "-> {}", quit);
        let _ = link.outbound.send(Outbound::Line(quit));
        let _ = link.outbound.send(Outbound::Close);
        link.shared.stop();

        for handle in [link.writer.take(), link.reader.take()].into_iter().flatten() {
            let abort = handle.abort_handle();
            if tokio::time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
                debug!("connection task did not stop in time, aborting");
                abort.abort();
            }
        }

        self.teardown(&link.shared);
        Ok(())
    }

    /// Forget connection-scoped state and publish `Disconnect` once.
    fn teardown(&self, shared: &LinkShared) {
        self.inner.session.lock().reset();
        self.inner.registration.lock().reset();
        *self.inner.state.lock() = ConnectionState::Disconnected;
        if !shared.closed.swap(true, Ordering::SeqCst) {
            info!("disconnected");
            self.publish(Event::Disconnect);
        }
    }

    /// Keepalive tick, to be called periodically (e.g. every 30s).
    ///
    /// Sends a `PING` after the idle timeout; if that ping is still
    /// unanswered at the next tick the connection is closed as failed.
    pub fn ping_check(&self) -> KeepAliveAction {
        let link = self.inner.link.lock();
        let Some(link) = link.as_ref() else {
            return KeepAliveAction::Idle;
        };
        let action = self.inner.keepalive.lock().check(Instant::now());
        match action {
            KeepAliveAction::Idle => {}
            KeepAliveAction::SendPing => {
                let ping = Message::ping(&self.inner.config.host).to_string();
                debug!(target: "slirc_engine::wire", "-> {}", ping);
                if link.outbound.send(Outbound::Line(ping)).is_err() {
                    link.shared.fail("ping failed: connection writer has stopped");
                }
            }
            KeepAliveAction::TimedOut => {
                warn!("ping timeout, closing connection");
                let _ = link.outbound.send(Outbound::Close);
                link.shared.fail("ping timeout");
            }
        }
        action
    }

    // Registration

    /// Run `thunk` once registration completes, or right now if it already
    /// has.
    pub fn execute_when_registered<F>(&self, thunk: F)
    where
        F: FnOnce(&Client) + Send + 'static,
    {
        let ready = self.inner.registration.lock().defer(Box::new(thunk));
        if let Some(thunk) = ready {
            thunk(self);
        }
    }

    fn complete_registration(&self) {
        {
            let mut state = self.inner.state.lock();
            if *state == ConnectionState::Connected {
                *state = ConnectionState::Registered;
            }
        }
        info!(nick = %self.nick(), "registered");
        loop {
            let batch = self.inner.registration.lock().next_batch();
            let Some(batch) = batch else { break };
            for thunk in batch {
                thunk(self);
            }
        }
    }

    // Inbound

    fn handle_line(&self, line: &str) {
        debug!(target: "slirc_engine::wire", "<- {}", line);
        let msg = match Message::parse(line) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, line, "dropping unparseable line");
                return;
            }
        };
        self.inner.keepalive.lock().touch(Instant::now());

        if let Some(pong) = msg.pong_reply() {
            if let Err(e) = self.send(pong) {
                warn!(error = %e, "failed to answer PING");
            }
            return;
        }

        let dispatch = self.inner.session.lock().dispatch(&msg);
        for reply in dispatch.replies {
            if let Err(e) = self.send(reply) {
                warn!(error = %e, "failed to send reply");
            }
        }
        if dispatch.registered {
            self.complete_registration();
        }
        if let Some(event) = dispatch.event {
            self.publish(event);
        }
    }

    // Outbound

    /// Send one raw line. CR, LF and NUL are rejected.
    pub fn send_raw_line(&self, line: &str) -> Result<()> {
        if line.contains(&['\r', '\n', '\0'][..]) {
            return Err(ClientError::InvalidLine(line.to_string()));
        }
        let link = self.inner.link.lock();
        let link = link.as_ref().ok_or(ClientError::NotConnected)?;
        debug!(target: "slirc_engine::wire", "-> {}", line);
        link.outbound
            .send(Outbound::Line(line.to_string()))
            .map_err(|_| {
                ClientError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "connection writer has stopped",
                ))
            })
    }

    /// Send a structured message.
    pub fn send(&self, message: Message) -> Result<()> {
        self.send_raw_line(&message.to_string())
    }

    pub fn join_channel(&self, channel: &str, key: Option<&str>) -> Result<()> {
        self.send(Message::join(channel, key))
    }

    /// Part a joined channel. Fails with [`ClientError::NotOnChannel`]
    /// otherwise.
    pub fn leave_channel(&self, channel: &str, reason: Option<&str>) -> Result<()> {
        if !self.inner.session.lock().channels.contains(channel) {
            return Err(ClientError::NotOnChannel(channel.to_string()));
        }
        self.send(Message::part(channel, reason))
    }

    pub fn send_message(&self, target: &str, text: &str) -> Result<()> {
        self.send(Message::privmsg(target, text))
    }

    /// CTCP ACTION (`/me`).
    pub fn send_action(&self, target: &str, text: &str) -> Result<()> {
        self.send(ctcp::action(target, text))
    }

    pub fn send_notice(&self, target: &str, text: &str) -> Result<()> {
        self.send(Message::notice(target, text))
    }

    /// Request a nick change.
    ///
    /// While registered, the nick only changes once the server echoes the
    /// `NICK`. Before registration it is taken immediately; with no
    /// connection it applies to the next one.
    pub fn set_nick(&self, nick: &str) -> Result<()> {
        if self.inner.link.lock().is_none() {
            self.inner.session.lock().identity.nick = nick.to_string();
            return Ok(());
        }
        self.send(Message::nick(nick))?;
        if self.state() != ConnectionState::Registered {
            self.inner.session.lock().identity.nick = nick.to_string();
        }
        Ok(())
    }

    /// Query (`None`) or set the topic of a channel.
    pub fn set_topic(&self, channel: &str, topic: Option<&str>) -> Result<()> {
        self.send(Message::topic(channel, topic))
    }

    pub fn whois(&self, nick: &str) -> Result<()> {
        self.send(Message::whois(nick))
    }

    pub fn names(&self, channel: &str) -> Result<()> {
        self.send(Message::names(channel))
    }

    /// `modes` may carry arguments, e.g. `"+o alice"`.
    pub fn mode(&self, target: &str, modes: &str) -> Result<()> {
        self.send(Message::mode(target, modes))
    }

    /// Mark away with a message, or back with `None`.
    pub fn away(&self, message: Option<&str>) -> Result<()> {
        self.send(Message::away(message))
    }

    pub fn nickserv(&self, text: &str) -> Result<()> {
        self.send_message("NickServ", text)
    }

    pub fn chanserv(&self, text: &str) -> Result<()> {
        self.send_message("ChanServ", text)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("addr", &self.inner.config.address())
            .field("state", &self.state())
            .field("nick", &self.nick())
            .finish()
    }
}

async fn write_loop(
    mut sink: LineSink,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    shared: Arc<LinkShared>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Outbound::Line(line) => {
                if let Err(e) = sink.send(line).await {
                    warn!(error = %e, "write failed");
                    shared.fail(format!("write failed: {}", e));
                    return;
                }
            }
            Outbound::Close => break,
        }
    }
    if let Err(e) = sink.close().await {
        debug!(error = %e, "error closing connection");
    }
}

async fn read_loop(
    client: Client,
    mut stream: LineStream,
    shared: Arc<LinkShared>,
    mut shutdown: watch::Receiver<bool>,
    id: u64,
) {
    let read_timeout = client.inner.config.read_timeout;
    let failure = loop {
        let next = tokio::select! {
            _ = shutdown.changed() => break None,
            next = tokio::time::timeout(read_timeout, stream.next()) => next,
        };
        match next {
            Err(_) => debug!("read timed out on an idle connection"),
            Ok(None) => {
                info!("server closed the connection");
                break None;
            }
            Ok(Some(Err(e))) => break Some(format!("read failed: {}", e)),
            Ok(Some(Ok(line))) => client.handle_line(&line),
        }
    };

    if shared.planned.load(Ordering::SeqCst) {
        return;
    }

    if let Some(reason) = failure.or_else(|| shared.fault.lock().take()) {
        warn!(%reason, "connection lost");
        client.publish(Event::Error { message: reason });
    }
    let link = {
        let mut link = client.inner.link.lock();
        match link.as_ref() {
            Some(current) if current.id == id => link.take(),
            _ => None,
        }
    };
    if let Some(link) = link {
        let _ = link.outbound.send(Outbound::Close);
    }
    client.teardown(&shared);
}
