//! Analysis stage
//!
//! Second pipeline stage: receives finished context descriptors and hands
//! each to the output channel. Semantic analysis proper is a later concern;
//! the stage exists so descriptors already flow through the full pipeline
//! shape.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::analysis::ContextDescriptor;
use crate::error::HubError;
use crate::hub::{HubContext, ServiceKind, SynapticService};
use crate::state::{ApplicationState, StateOverwatch, Subscription};
use crate::tasking::TaskingService;

use super::{run_consumer, OutputChannel, WorkQueue};

/// Task agent id owned by this stage
pub const ANALYSIS_AGENT_ID: &str = "analysis-stage";

/// Descriptor-draining service in front of the output channel
pub struct AnalysisService {
    queue: Arc<WorkQueue<ContextDescriptor>>,
    subscription: Arc<Mutex<Option<Subscription>>>,
}

impl AnalysisService {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(WorkQueue::new()),
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// The queue the parse stage feeds
    pub fn queue(&self) -> Arc<WorkQueue<ContextDescriptor>> {
        self.queue.clone()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Register this stage's shutdown observer
    ///
    /// Must be subscribed after the parse stage's observer: by the time
    /// this one clears, the upstream agent is already joined and this queue
    /// receives nothing further.
    pub fn subscribe_shutdown(&self, overwatch: &Arc<StateOverwatch>, tasking: Arc<TaskingService>) {
        let queue = self.queue.clone();
        let slot = self.subscription.clone();
        let subscription = overwatch.subscribe(move |state| {
            if state.application != ApplicationState::Shutdown {
                return;
            }
            let dropped = queue.clear();
            if dropped > 0 {
                debug!(target: "synaptic::analysis", dropped, "discarded pending descriptors");
            }
            tasking.recall_agent(ANALYSIS_AGENT_ID);
            queue.raise();
            if let Ok(mut slot) = slot.lock() {
                if let Some(subscription) = slot.take() {
                    subscription.dispose();
                }
            }
        });
        if let Ok(mut slot) = self.subscription.lock() {
            *slot = Some(subscription);
        }
    }
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

impl SynapticService for AnalysisService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Analysis
    }

    fn on_registered(&self, hub: &HubContext<'_>) -> Result<(), HubError> {
        let tasking = hub.services.get::<TaskingService>(ServiceKind::Tasking)?;
        let channel: OutputChannel = hub.resources.get(OutputChannel::resource_name())?;

        let queue = self.queue.clone();
        tasking.create_agent(ANALYSIS_AGENT_ID, move |cancel| {
            run_consumer(queue, cancel, move |descriptor: ContextDescriptor| {
                debug!(
                    target: "synaptic::analysis",
                    action = %descriptor.action,
                    context = %descriptor.target,
                    "publishing descriptor"
                );
                channel.publish(&descriptor);
            })
        })?;
        tasking.start_agent(ANALYSIS_AGENT_ID)?;
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}
