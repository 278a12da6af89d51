//! Synaptic core: interactive statement processing
//!
//! A statement buffer flows through a character tokenizer, a structural
//! parse stage, and an analysis stage before reaching an output sink. The
//! two stages are queue-fed background loops hosted by the tasking
//! service; the hub composes everything and its state overwatch drives
//! orderly shutdown.

pub mod analysis;
pub mod error;
pub mod hub;
pub mod lexer;
pub mod pipeline;
pub mod state;
pub mod tasking;

pub use analysis::{ContextAction, ContextDescriptor, ContextTarget};
pub use error::{HubError, TaskingError};
pub use hub::{ServiceKind, SynapticHub, SynapticService};
pub use lexer::{Token, TokenKind, TokenList};
pub use pipeline::{OutputChannel, OutputSink};
pub use state::{ApplicationState, RuntimeState, StateOverwatch, SystemState};
pub use tasking::TaskingService;
