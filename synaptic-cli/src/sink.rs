//! Terminal output sink
//!
//! Renders finished descriptors for the interactive session: the narrowed
//! source text on success, a diagnostic on a structural parse failure.

use synaptic_core::{ContextAction, ContextDescriptor, OutputSink};

pub struct TerminalSink;

impl OutputSink for TerminalSink {
    fn publish(&self, descriptor: &ContextDescriptor) {
        match descriptor.action {
            ContextAction::Error => {
                eprintln!("error: malformed statement, expected `[=proc ... ]`");
            }
            _ => {
                println!(
                    "{} {}: {}",
                    descriptor.action,
                    descriptor.target,
                    descriptor.data.source()
                );
            }
        }
    }
}
