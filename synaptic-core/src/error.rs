//! Error types for the hub and tasking service
//!
//! Only configuration faults are errors here. Lexical anomalies are
//! `Invalid` tokens and structural parse failures are `Error` descriptors;
//! neither ever surfaces as an `Err`.

use thiserror::Error;

use crate::hub::ServiceKind;

/// Error type for hub composition and lookup
#[derive(Error, Debug)]
pub enum HubError {
    #[error("service not registered: {0}")]
    ServiceNotFound(ServiceKind),

    #[error("service registered under {0} has an unexpected concrete type")]
    ServiceType(ServiceKind),

    #[error("resource not registered: {0}")]
    ResourceNotFound(&'static str),

    #[error("tasking error: {0}")]
    Tasking(#[from] TaskingError),
}

/// Error type for the tasking service and its agents
#[derive(Error, Debug)]
pub enum TaskingError {
    #[error("tasking service is not running")]
    NotRunning,

    #[error("tasking service is already running")]
    AlreadyRunning,

    #[error("task agent id already registered: {0}")]
    DuplicateAgent(String),

    #[error("no task agent registered as: {0}")]
    UnknownAgent(String),

    #[error("failed to build worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
