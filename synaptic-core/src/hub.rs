//! Composition root
//!
//! The hub owns the service registry, the resource registry, the state
//! overwatch, and wires everything in a fixed order. Registries are written
//! only during construction, on one thread, and are read-only afterwards.
//! There is no process-wide instance: callers construct a hub explicitly
//! and independent hubs do not share state.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use synaptic_config::SynapticConfig;

use crate::error::HubError;
use crate::lexer::LexerService;
use crate::pipeline::{AnalysisService, OutputChannel, OutputSink, ParsingService};
use crate::state::{ApplicationState, RuntimeState, StateOverwatch, SystemState};
use crate::tasking::TaskingService;

/// Capability tags services are registered and looked up under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Tasking,
    Lexer,
    Parsing,
    Analysis,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Tasking => "tasking",
            ServiceKind::Lexer => "lexer",
            ServiceKind::Parsing => "parsing",
            ServiceKind::Analysis => "analysis",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known resource names
pub mod resources {
    pub const OUTPUT_CHANNEL: &str = "output-channel";
}

/// A component registered with the hub
///
/// The registration hook runs immediately at registration time with the
/// hub's partial context, so a service may look up anything registered
/// before it.
pub trait SynapticService: Send + Sync {
    fn kind(&self) -> ServiceKind;

    fn on_registered(&self, hub: &HubContext<'_>) -> Result<(), HubError>;

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// What a service sees of the hub while being registered
pub struct HubContext<'a> {
    pub services: &'a ServiceRegistry,
    pub resources: &'a ResourceRegistry,
    pub overwatch: &'a Arc<StateOverwatch>,
}

/// Capability-keyed service storage
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<ServiceKind, Arc<dyn SynapticService>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, service: Arc<dyn SynapticService>) {
        self.services.insert(service.kind(), service);
    }

    /// Look up a service by capability, downcast to its concrete type
    ///
    /// Absence is a configuration defect, never a recoverable condition.
    pub fn get<T: Any + Send + Sync>(&self, kind: ServiceKind) -> Result<Arc<T>, HubError> {
        let service = self
            .services
            .get(&kind)
            .cloned()
            .ok_or(HubError::ServiceNotFound(kind))?;
        service
            .as_any()
            .downcast::<T>()
            .map_err(|_| HubError::ServiceType(kind))
    }
}

/// Name-keyed storage for shared collaborators that are not services
#[derive(Default)]
pub struct ResourceRegistry {
    entries: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert<T: Any + Send + Sync>(&mut self, name: &'static str, resource: T) {
        self.entries.insert(name, Box::new(resource));
    }

    pub fn get<T: Any + Clone>(&self, name: &'static str) -> Result<T, HubError> {
        self.entries
            .get(name)
            .and_then(|entry| entry.downcast_ref::<T>())
            .cloned()
            .ok_or(HubError::ResourceNotFound(name))
    }
}

/// The application context: registries, state, and the wired pipeline
pub struct SynapticHub {
    services: ServiceRegistry,
    resources: ResourceRegistry,
    overwatch: Arc<StateOverwatch>,
}

impl SynapticHub {
    /// Construct and wire a hub
    ///
    /// The tasking service is started before the pipeline stages register,
    /// since stage registration creates task agents. Stage order matters
    /// too: the parse stage looks up the analysis stage's queue.
    pub fn new(config: SynapticConfig, sink: Arc<dyn OutputSink>) -> Result<Arc<Self>, HubError> {
        let overwatch = Arc::new(StateOverwatch::new());
        let mut service_registry = ServiceRegistry::new();
        let mut resource_registry = ResourceRegistry::new();
        resource_registry.insert(resources::OUTPUT_CHANNEL, OutputChannel::new(sink));

        let tasking = Arc::new(TaskingService::new(config.tasking));
        tasking.start()?;

        Self::install(
            &mut service_registry,
            &resource_registry,
            &overwatch,
            tasking.clone(),
        )?;
        Self::install(
            &mut service_registry,
            &resource_registry,
            &overwatch,
            Arc::new(LexerService::new()),
        )?;
        Self::install(
            &mut service_registry,
            &resource_registry,
            &overwatch,
            Arc::new(AnalysisService::new()),
        )?;
        Self::install(
            &mut service_registry,
            &resource_registry,
            &overwatch,
            Arc::new(ParsingService::new()),
        )?;

        //  shutdown observers fire in subscription order, which must be
        //  upstream before downstream: the parse agent is joined before the
        //  analysis stage clears, so no descriptor lands in a queue whose
        //  consumer is already gone
        let parsing = service_registry.get::<ParsingService>(ServiceKind::Parsing)?;
        let analysis = service_registry.get::<AnalysisService>(ServiceKind::Analysis)?;
        parsing.subscribe_shutdown(&overwatch, tasking.clone());
        analysis.subscribe_shutdown(&overwatch, tasking.clone());

        overwatch.update(|state| {
            state.runtime = RuntimeState::Running;
            state.application = ApplicationState::Running;
        });
        info!(target: "synaptic::hub", "hub ready");

        Ok(Arc::new(Self {
            services: service_registry,
            resources: resource_registry,
            overwatch,
        }))
    }

    fn install(
        services: &mut ServiceRegistry,
        resources: &ResourceRegistry,
        overwatch: &Arc<StateOverwatch>,
        service: Arc<dyn SynapticService>,
    ) -> Result<(), HubError> {
        services.insert(service.clone());
        let context = HubContext {
            services,
            resources,
            overwatch,
        };
        service.on_registered(&context)
    }

    pub fn service<T: Any + Send + Sync>(&self, kind: ServiceKind) -> Result<Arc<T>, HubError> {
        self.services.get(kind)
    }

    pub fn resource<T: Any + Clone>(&self, name: &'static str) -> Result<T, HubError> {
        self.resources.get(name)
    }

    pub fn overwatch(&self) -> &Arc<StateOverwatch> {
        &self.overwatch
    }

    pub fn state(&self) -> SystemState {
        self.overwatch.read()
    }

    /// Run one statement buffer through the pipeline front door
    pub fn process(&self, source: Arc<str>) -> Result<(), HubError> {
        let lexer = self.service::<LexerService>(ServiceKind::Lexer)?;
        let parsing = self.service::<ParsingService>(ServiceKind::Parsing)?;
        parsing.enqueue(lexer.tokenize(source));
        Ok(())
    }

    /// Drive the shutdown protocol
    ///
    /// Flipping ApplicationState to Shutdown runs every stage's shutdown
    /// observer synchronously; stopping tasking afterwards is then cheap
    /// since the stage agents are already recalled.
    pub fn shutdown(&self) -> Result<(), HubError> {
        info!(target: "synaptic::hub", "shutting down");
        self.overwatch.set_application(ApplicationState::Shutdown);
        let tasking = self.service::<TaskingService>(ServiceKind::Tasking)?;
        tasking.stop();
        self.overwatch.set_runtime(RuntimeState::Shutdown);
        Ok(())
    }
}
