//! Output boundary for finished descriptors

use std::sync::Arc;

use crate::analysis::ContextDescriptor;
use crate::hub::resources;

/// Downstream receiver for descriptors leaving the analysis stage
pub trait OutputSink: Send + Sync {
    fn publish(&self, descriptor: &ContextDescriptor);
}

/// The sink wrapped as a hub resource
#[derive(Clone)]
pub struct OutputChannel {
    inner: Arc<dyn OutputSink>,
}

impl OutputChannel {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self { inner: sink }
    }

    /// Resource name this channel is registered under
    pub fn resource_name() -> &'static str {
        resources::OUTPUT_CHANNEL
    }

    pub fn publish(&self, descriptor: &ContextDescriptor) {
        self.inner.publish(descriptor);
    }
}
