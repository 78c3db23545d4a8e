//! Pending-message correlation.
//!
//! The host delivers one chat event through two callbacks: an early one that
//! may run on any worker thread, and a finalize one serialized on the main
//! thread. [`PendingMessages`] carries the early context across that gap.
//!
//! Pairing is FIFO: [`PendingMessages::pop`] hands out the oldest push and
//! is only correct if the host delivers finalize callbacks in the order the
//! early callbacks pushed. Early callbacks from different senders may finish
//! in any order, so [`PendingMessages::pop_for`] pairs by sender instead and
//! keeps FIFO order only among one sender's messages.
//!
//! Entries whose finalize callback never arrives are reclaimed by
//! [`PendingMessages::evict_expired`] and by the optional capacity bound.

use chatty_core::{Context, PlayerId};
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};
use tracing::warn;

struct Pending<C> {
    context: C,
    queued_at: Instant,
}

/// Thread-safe queue of contexts waiting for their finalize callback.
///
/// Multi-producer (concurrent early callbacks), single-consumer (the serial
/// finalize callback). Every operation takes the lock once, so push and pop
/// are atomic with respect to each other.
pub struct PendingMessages<C> {
    queue: Mutex<VecDeque<Pending<C>>>,
    capacity: Option<usize>,
}

impl<C: Context> PendingMessages<C> {
    /// An unbounded queue.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            capacity: None,
        }
    }

    /// A queue holding at most `capacity` entries; the oldest entry is dropped
    /// on overflow. A `capacity` of 0 is treated as 1; configuration rejects it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity.max(1)),
        }
    }

    // A panic elsewhere while holding the lock leaves the queue itself intact.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Pending<C>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a context after early processing.
    pub fn push(&self, context: C) {
        let mut queue = self.lock();
        if let Some(capacity) = self.capacity {
            while queue.len() >= capacity {
                if let Some(dropped) = queue.pop_front() {
                    warn!(
                        sender = %dropped.context.sender().id,
                        capacity,
                        "pending queue full, dropping oldest context"
                    );
                }
            }
        }
        queue.push_back(Pending {
            context,
            queued_at: Instant::now(),
        });
    }

    /// Take the oldest pending context.
    pub fn pop(&self) -> Option<C> {
        self.lock().pop_front().map(|pending| pending.context)
    }

    /// Take the oldest pending context only if `accept` agrees; otherwise
    /// leave the queue untouched.
    pub fn pop_if<F>(&self, accept: F) -> Option<C>
    where
        F: FnOnce(&C) -> bool,
    {
        let mut queue = self.lock();
        if !accept(&queue.front()?.context) {
            return None;
        }
        queue.pop_front().map(|pending| pending.context)
    }

    /// Take the oldest pending context pushed for `sender`.
    pub fn pop_for(&self, sender: PlayerId) -> Option<C> {
        let mut queue = self.lock();
        let index = queue
            .iter()
            .position(|pending| pending.context.sender().id == sender)?;
        queue.remove(index).map(|pending| pending.context)
    }

    /// Drop entries queued more than `ttl` ago. Returns how many were dropped.
    pub fn evict_expired(&self, ttl: Duration) -> usize {
        self.evict_expired_at(Instant::now(), ttl)
    }

    /// Drop entries queued more than `ttl` before `now`.
    pub fn evict_expired_at(&self, now: Instant, ttl: Duration) -> usize {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|pending| now.saturating_duration_since(pending.queued_at) <= ttl);
        before - queue.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every pending context, e.g. on plugin unload.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<C: Context> Default for PendingMessages<C> {
    fn default() -> Self {
        Self::new()
    }
}
