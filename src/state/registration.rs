//! Registration handshake and the deferred-command queue.

use std::collections::VecDeque;

use crate::message::Message;
use crate::state::Identity;

/// Lines that open registration: `PASS` (when set), `NICK`, `USER`.
pub fn handshake(identity: &Identity) -> Vec<Message> {
    let mut lines = Vec::with_capacity(3);
    if let Some(password) = identity.password.as_deref().filter(|p| !p.is_empty()) {
        lines.push(Message::pass(password));
    }
    lines.push(Message::nick(&identity.nick));
    lines.push(Message::user(&identity.username, &identity.realname));
    lines
}

/// Registration gate for deferred work.
///
/// Items handed to [`defer`](Self::defer) before registration completes
/// are queued; afterwards they are handed straight back for immediate
/// execution. Completion drains the queue in batches so that work
/// deferred while an earlier batch is running still runs before the gate
/// opens, keeping overall FIFO order.
#[derive(Debug)]
pub struct Registration<T> {
    registered: bool,
    pending: VecDeque<T>,
}

impl<T> Default for Registration<T> {
    fn default() -> Self {
        Self {
            registered: false,
            pending: VecDeque::new(),
        }
    }
}

impl<T> Registration<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queue `item` until registration completes.
    ///
    /// Returns the item back when already registered; the caller runs it
    /// right away.
    #[must_use]
    pub fn defer(&mut self, item: T) -> Option<T> {
        if self.registered {
            Some(item)
        } else {
            self.pending.push_back(item);
            None
        }
    }

    /// Take the next batch of queued items after the welcome numeric.
    ///
    /// Call repeatedly, running each batch, until it returns `None`; the
    /// gate opens when the queue is found empty. Returns `None` at once if
    /// registration already completed, so the queue drains only once.
    pub fn next_batch(&mut self) -> Option<Vec<T>> {
        if self.registered {
            return None;
        }
        if self.pending.is_empty() {
            self.registered = true;
            return None;
        }
        Some(self.pending.drain(..).collect())
    }

    /// Close the gate and drop anything still queued.
    pub fn reset(&mut self) {
        self.registered = false;
        self.pending.clear();
    }
}
