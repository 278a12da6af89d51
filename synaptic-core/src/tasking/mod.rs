//! Tasking service
//!
//! Owns the worker runtime and a registry of named task agents. Worker
//! pool concurrency is fixed once at [`TaskingService::start`]; agents can
//! only be created while the service is running.

mod agent;

pub use agent::{AgentBody, TaskAgent};

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use synaptic_config::TaskingConfig;

use crate::error::TaskingError;
use crate::hub::{HubContext, ServiceKind, SynapticService};

struct Inner {
    runtime: Option<Runtime>,
    agents: HashMap<String, Arc<TaskAgent>>,
}

/// Worker-pool owner and task-agent registry
pub struct TaskingService {
    config: TaskingConfig,
    inner: Mutex<Inner>,
}

impl TaskingService {
    pub fn new(config: TaskingConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                runtime: None,
                agents: HashMap::new(),
            }),
        }
    }

    fn inner_lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Build the worker runtime; concurrency is fixed here and never changes
    pub fn start(&self) -> Result<(), TaskingError> {
        let mut inner = self.inner_lock();
        if inner.runtime.is_some() {
            return Err(TaskingError::AlreadyRunning);
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.min_workers)
            .max_blocking_threads(self.config.max_workers)
            .thread_name("synaptic-worker")
            .enable_all()
            .build()?;
        inner.runtime = Some(runtime);
        info!(
            target: "synaptic::tasking",
            min_workers = self.config.min_workers,
            max_workers = self.config.max_workers,
            "tasking service started"
        );
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.inner_lock().runtime.is_some()
    }

    /// Register a named agent wrapping the given loop body
    ///
    /// Fails if the service is not running or the id is taken. The body is
    /// not scheduled until [`TaskingService::start_agent`].
    pub fn create_agent<F, Fut>(&self, id: &str, body: F) -> Result<(), TaskingError>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut inner = self.inner_lock();
        if inner.runtime.is_none() {
            return Err(TaskingError::NotRunning);
        }
        if inner.agents.contains_key(id) {
            return Err(TaskingError::DuplicateAgent(id.to_string()));
        }
        let boxed: AgentBody = Box::new(move |cancel| Box::pin(body(cancel)));
        inner
            .agents
            .insert(id.to_string(), Arc::new(TaskAgent::new(id.to_string(), boxed)));
        debug!(target: "synaptic::tasking", id, "agent created");
        Ok(())
    }

    /// Schedule a created agent's loop onto the worker pool
    ///
    /// Starting an id that was never created is a configuration defect.
    pub fn start_agent(&self, id: &str) -> Result<(), TaskingError> {
        let (agent, handle) = {
            let inner = self.inner_lock();
            let handle = inner
                .runtime
                .as_ref()
                .map(Runtime::handle)
                .cloned()
                .ok_or(TaskingError::NotRunning)?;
            let agent = inner
                .agents
                .get(id)
                .cloned()
                .ok_or_else(|| TaskingError::UnknownAgent(id.to_string()))?;
            (agent, handle)
        };
        agent.start(&handle);
        Ok(())
    }

    /// Cancel an agent, wait for its loop to exit, and free its id
    ///
    /// Unknown ids are a no-op; the id may be reused afterwards.
    pub fn recall_agent(&self, id: &str) {
        //  drop the registry lock before joining the loop
        let (agent, handle) = {
            let mut inner = self.inner_lock();
            let handle = match inner.runtime.as_ref() {
                Some(runtime) => runtime.handle().clone(),
                None => return,
            };
            (inner.agents.remove(id), handle)
        };
        if let Some(agent) = agent {
            agent.recall(&handle);
        }
    }

    pub fn has_agent(&self, id: &str) -> bool {
        self.inner_lock().agents.contains_key(id)
    }

    /// Whether the named agent's loop is currently running
    pub fn agent_running(&self, id: &str) -> bool {
        self.inner_lock()
            .agents
            .get(id)
            .is_some_and(|a| a.is_running())
    }

    /// Recall every agent and tear the worker runtime down
    pub fn stop(&self) {
        let ids: Vec<String> = self.inner_lock().agents.keys().cloned().collect();
        for id in ids {
            self.recall_agent(&id);
        }
        let runtime = self.inner_lock().runtime.take();
        if let Some(runtime) = runtime {
            runtime.shutdown_timeout(Duration::from_secs(5));
        }
        info!(target: "synaptic::tasking", "tasking service stopped");
    }
}

impl SynapticService for TaskingService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Tasking
    }

    fn on_registered(&self, _hub: &HubContext<'_>) -> Result<(), crate::error::HubError> {
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}
