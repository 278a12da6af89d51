//! Parse stage
//!
//! First pipeline stage: consumes token lists, runs the structural parser,
//! and forwards every resulting descriptor downstream. One task agent owns
//! the consumer loop.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::analysis::{classify, parse_function, ContextAction};
use crate::error::HubError;
use crate::hub::{HubContext, ServiceKind, SynapticService};
use crate::lexer::TokenList;
use crate::state::{ApplicationState, StateOverwatch, Subscription};
use crate::tasking::TaskingService;

use super::{run_consumer, AnalysisService, WorkQueue};

/// Task agent id owned by this stage
pub const PARSE_AGENT_ID: &str = "parse-stage";

/// Queue-fed structural parsing service
pub struct ParsingService {
    queue: Arc<WorkQueue<TokenList>>,
    subscription: Arc<Mutex<Option<Subscription>>>,
}

impl ParsingService {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(WorkQueue::new()),
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue one token list for structural parsing
    pub fn enqueue(&self, tokens: TokenList) {
        self.queue.push(tokens);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Register this stage's shutdown observer
    ///
    /// Subscription order is shutdown order, and this stage must shut down
    /// before the analysis stage: once the parse agent is joined nothing
    /// pushes downstream anymore, so the analysis clear that follows cannot
    /// strand descriptors. On shutdown: discard pending work, stop the
    /// agent, release any parked wait, then drop the subscription itself.
    pub fn subscribe_shutdown(&self, overwatch: &Arc<StateOverwatch>, tasking: Arc<TaskingService>) {
        let queue = self.queue.clone();
        let slot = self.subscription.clone();
        let subscription = overwatch.subscribe(move |state| {
            if state.application != ApplicationState::Shutdown {
                return;
            }
            let dropped = queue.clear();
            if dropped > 0 {
                debug!(target: "synaptic::parser", dropped, "discarded pending statements");
            }
            tasking.recall_agent(PARSE_AGENT_ID);
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

impl Default for ParsingService {
    fn default() -> Self {
        Self::new()
    }
}

impl SynapticService for ParsingService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Parsing
    }

    fn on_registered(&self, hub: &HubContext<'_>) -> Result<(), HubError> {
        let tasking = hub.services.get::<TaskingService>(ServiceKind::Tasking)?;
        let analysis = hub.services.get::<AnalysisService>(ServiceKind::Analysis)?;
        let downstream = analysis.queue();

        let queue = self.queue.clone();
        tasking.create_agent(PARSE_AGENT_ID, move |cancel| {
            run_consumer(queue, cancel, move |tokens: TokenList| {
                let descriptor = classify(&tokens);
                debug!(
                    target: "synaptic::parser",
                    action = %descriptor.action,
                    context = %descriptor.target,
                    "classified statement"
                );
                if descriptor.action == ContextAction::Create {
                    if let Some(function) = parse_function(&descriptor.data) {
                        debug!(
                            target: "synaptic::parser",
                            name = %function.name,
                            parameters = function.parameters.len(),
                            body_tokens = function.body.len(),
                            "recognized function definition"
                        );
                    }
                }
                downstream.push(descriptor);
            })
        })?;
        tasking.start_agent(PARSE_AGENT_ID)?;
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}
