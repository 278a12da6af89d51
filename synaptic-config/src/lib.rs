//! Synaptic Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Synaptic crates.

use serde::Deserialize;

/// Configuration for the tasking service worker pool
///
/// The bounds are fixed once when the tasking service starts; they cannot
/// be changed afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaskingConfig {
    /// Number of worker threads hosting agent loops
    pub min_workers: usize,
    /// Upper bound on additional blocking threads
    pub max_workers: usize,
}

/// Top-level configuration for a Synaptic hub
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SynapticConfig {
    /// Worker pool bounds
    pub tasking: TaskingConfig,
}

/// Processing stage enum for stage-specific configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Analysis,
    Tasking,
    Hub,
}

impl Stage {
    /// Get the string name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Lexer => "lexer",
            Stage::Parser => "parser",
            Stage::Analysis => "analysis",
            Stage::Tasking => "tasking",
            Stage::Hub => "hub",
        }
    }

    /// Get the log target name for this stage
    pub fn target(&self) -> String {
        format!("synaptic::{}", self.as_str())
    }
}

impl Default for TaskingConfig {
    fn default() -> Self {
        Self {
            min_workers: 5,
            max_workers: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tasking_config() {
        let cfg = TaskingConfig::default();
        assert_eq!(cfg.min_workers, 5);
        assert_eq!(cfg.max_workers, 10);
    }

    #[test]
    fn test_stage_as_str() {
        assert_eq!(Stage::Lexer.as_str(), "lexer");
        assert_eq!(Stage::Parser.target(), "synaptic::parser");
    }
}
