//! Named cancellable worker agents

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The loop body an agent runs: built once, consumed on start
pub type AgentBody =
    Box<dyn FnOnce(CancellationToken) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

enum AgentState {
    Idle(AgentBody),
    Running(JoinHandle<()>),
    Done,
}

/// A named background loop bound to a cancellation token
///
/// The loop is expected to observe cancellation at iteration boundaries;
/// recall cancels and then joins, bounded only by the loop's own
/// responsiveness.
pub struct TaskAgent {
    id: String,
    cancel: CancellationToken,
    state: Mutex<AgentState>,
}

impl TaskAgent {
    pub(crate) fn new(id: String, body: AgentBody) -> Self {
        Self {
            id,
            cancel: CancellationToken::new(),
            state: Mutex::new(AgentState::Idle(body)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn state_lock(&self) -> MutexGuard<'_, AgentState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Whether the loop has been started and has not yet exited
    pub fn is_running(&self) -> bool {
        match &*self.state_lock() {
            AgentState::Running(handle) => !handle.is_finished(),
            _ => false,
        }
    }

    /// Schedule the loop body onto the given runtime
    pub(crate) fn start(&self, handle: &Handle) {
        let mut state = self.state_lock();
        match std::mem::replace(&mut *state, AgentState::Done) {
            AgentState::Idle(body) => {
                debug!(target: "synaptic::tasking", id = %self.id, "starting agent");
                let join = handle.spawn(body(self.cancel.clone()));
                *state = AgentState::Running(join);
            }
            other => {
                //  a body runs at most once
                warn!(target: "synaptic::tasking", id = %self.id, "agent already started");
                *state = other;
            }
        }
    }

    /// Cancel the loop and wait for it to exit
    ///
    /// Must be called from outside the worker runtime. A loop that exits
    /// by panic is logged and otherwise treated as stopped.
    pub(crate) fn recall(&self, handle: &Handle) {
        self.cancel.cancel();
        let previous = std::mem::replace(&mut *self.state_lock(), AgentState::Done);
        if let AgentState::Running(join) = previous {
            if let Err(e) = handle.block_on(join) {
                if e.is_cancelled() {
                    debug!(target: "synaptic::tasking", id = %self.id, "agent task cancelled");
                } else {
                    warn!(target: "synaptic::tasking", id = %self.id, error = %e, "agent loop failed");
                }
            }
        }
        debug!(target: "synaptic::tasking", id = %self.id, "agent recalled");
    }
}
