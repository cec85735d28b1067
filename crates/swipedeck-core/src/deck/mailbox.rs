//! Completions handed from the animation half of a tick to the UI half.

use heapless::Deque;

use crate::gesture::SwipeDirection;

const MAILBOX_CAPACITY: usize = 8;

/// Identifies the card instance a completion belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct CardTicket {
    pub generation: u32,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Deferred {
    Commit(SwipeDirection),
    OpenDetail,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Posted {
    pub ticket: CardTicket,
    pub event: Deferred,
    pub frame: u64,
}

#[derive(Debug, Default)]
pub(super) struct Mailbox {
    queue: Deque<Posted, MAILBOX_CAPACITY>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `event`; when full the oldest entry is evicted and returned.
    pub fn post(&mut self, ticket: CardTicket, event: Deferred, frame: u64) -> Option<Posted> {
        let posted = Posted {
            ticket,
            event,
            frame,
        };
        let evicted = if self.queue.is_full() {
            self.queue.pop_front()
        } else {
            None
        };
        let _ = self.queue.push_back(posted);
        evicted
    }

    /// Next entry posted before `frame`. Entries from `frame` itself stay
    /// queued for the following tick.
    pub fn pop_ready(&mut self, frame: u64) -> Option<Posted> {
        match self.queue.front() {
            Some(posted) if posted.frame < frame => self.queue.pop_front(),
            _ => None,
        }
    }

    pub fn contains(&self, ticket: CardTicket, event: Deferred) -> bool {
        self.queue
            .iter()
            .any(|posted| posted.ticket == ticket && posted.event == event)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
