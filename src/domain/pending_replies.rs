//! Correlation table for commands whose HTTP caller waits for the reply.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::RecvError;

use crate::protocol::CommandReply;

#[derive(Debug)]
struct Waiter {
    ticket: u64,
    tx: oneshot::Sender<CommandReply>,
}

/// Maps command ids to the waiter expecting the client's reply.
///
/// Registering an id that is already pending replaces the earlier waiter,
/// whose receiver then observes a closed channel. The table never holds its
/// lock across an `.await`.
#[derive(Debug, Default)]
pub struct PendingReplies {
    waiters: Mutex<HashMap<String, Waiter>>,
    next_ticket: AtomicU64,
}

impl PendingReplies {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest in the reply to command `id`.
    ///
    /// The entry lives as long as the returned [`PendingReply`]; dropping it
    /// (timeout, error, or a cancelled caller) removes the entry.
    pub fn register(&self, id: &str) -> PendingReply<'_> {
        let (tx, rx) = oneshot::channel();
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id.to_string(), Waiter { ticket, tx });
        PendingReply {
            table: self,
            id: id.to_string(),
            ticket,
            rx,
        }
    }

    /// Hands `reply` to its waiter. Returns `false` if nobody was waiting.
    pub fn resolve(&self, reply: CommandReply) -> bool {
        let waiter = self.lock().remove(&reply.id);
        match waiter {
            Some(waiter) => waiter.tx.send(reply).is_ok(),
            None => false,
        }
    }

    /// Returns `true` if no command is awaiting a reply.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes `id` only if it still belongs to the registration `ticket`.
    fn release(&self, id: &str, ticket: u64) {
        let mut waiters = self.lock();
        if waiters.get(id).is_some_and(|w| w.ticket == ticket) {
            waiters.remove(id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Waiter>> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A registered waiter. Unregisters itself on drop.
#[derive(Debug)]
pub struct PendingReply<'a> {
    table: &'a PendingReplies,
    id: String,
    ticket: u64,
    rx: oneshot::Receiver<CommandReply>,
}

impl PendingReply<'_> {
    /// Command id this waiter is registered for.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Waits for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`RecvError`] if a later registration for the same id
    /// superseded this one.
    pub async fn recv(&mut self) -> Result<CommandReply, RecvError> {
        (&mut self.rx).await
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        self.table.release(&self.id, self.ticket);
    }
}
