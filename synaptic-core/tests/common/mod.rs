//! Test helpers for pipeline integration tests

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use synaptic_core::{ContextAction, ContextDescriptor, ContextTarget, OutputSink};

/// Sink that records every descriptor it receives
#[derive(Default)]
pub struct CollectingSink {
    received: Mutex<Vec<ReceivedDescriptor>>,
}

/// Owned copy of what reached the sink
#[derive(Debug, Clone)]
pub struct ReceivedDescriptor {
    pub action: ContextAction,
    pub target: ContextTarget,
    pub source: String,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<ReceivedDescriptor> {
        self.received.lock().unwrap().clone()
    }

    /// Block until the sink holds at least `count` descriptors
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Vec<ReceivedDescriptor> {
        let deadline = Instant::now() + timeout;
        loop {
            let received = self.received();
            if received.len() >= count {
                return received;
            }
            assert!(
                Instant::now() < deadline,
                "sink received {} of {} expected descriptors before timeout",
                received.len(),
                count
            );
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

impl OutputSink for CollectingSink {
    fn publish(&self, descriptor: &ContextDescriptor) {
        self.received.lock().unwrap().push(ReceivedDescriptor {
            action: descriptor.action,
            target: descriptor.target,
            source: descriptor.data.source().to_string(),
        });
    }
}
