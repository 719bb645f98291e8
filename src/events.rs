//! Memory change notifications.
//!
//! Observer list owned by a context manager. Emission never blocks: each
//! subscriber holds an unbounded receiver, and subscribers whose receiver
//! was dropped are pruned on the next emit.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Published after every successful refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryChanged {
    /// Distinct paths in the registry after the refresh
    pub file_count: usize,
}

#[derive(Default)]
pub struct MemoryEvents {
    subscribers: Mutex<Vec<Sender<MemoryChanged>>>,
}

impl MemoryEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Receiver<MemoryChanged> {
        let (sender, receiver) = channel();
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Deliver `event` to every live subscriber; returns how many received it.
    pub fn emit(&self, event: MemoryChanged) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(event).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
