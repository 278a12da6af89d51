//! Work queue with a binary wake signal
//!
//! FIFO queue paired with a collapsing wake signal: redundant raises while
//! already signaled collapse into one, and a raise delivered while no
//! consumer is parked is retained, so a push is never lost between a drain
//! and the following wait.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;

pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
    signal: Notify,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            signal: Notify::new(),
        }
    }

    fn items_lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Push one item and unconditionally raise the wake signal
    pub fn push(&self, item: T) {
        self.items_lock().push_back(item);
        self.signal.notify_one();
    }

    /// Pop the oldest pending item
    pub fn pop(&self) -> Option<T> {
        self.items_lock().pop_front()
    }

    /// Discard all pending items, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut items = self.items_lock();
        let dropped = items.len();
        items.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.items_lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_lock().is_empty()
    }

    /// Raise the wake signal without pushing
    pub fn raise(&self) {
        self.signal.notify_one();
    }

    /// Park until the wake signal is raised
    pub async fn wait(&self) {
        self.signal.notified().await;
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
